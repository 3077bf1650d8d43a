use exprcalc::{
    BigDecimal, Decimal, DefinitionError, Error, EvalError, EvaluationOptions, ParseError, Parser,
    SeparatorStyle,
    ast::Node,
    interpreter::symbols::{SymbolTable, reference},
};

fn eval(src: &str) -> f64 {
    Parser::evaluate(src).unwrap_or_else(|e| panic!("Expression {src:?} failed: {e}"))
}

fn assert_value(src: &str, expected: f64) {
    let value = eval(src);
    assert!((value - expected).abs() < 1e-9,
            "Expression {src:?} evaluated to {value}, expected {expected}");
}

fn assert_parse_failure(parser: &Parser, src: &str) -> ParseError {
    match parser.parse(src) {
        Ok(result) => panic!("Expression {src:?} parsed as {result} but was expected to fail"),
        Err(e) => e,
    }
}

#[test]
fn basic_arithmetic() {
    assert_value("1 + 2", 3.0);
    assert_value("7 * 9", 63.0);
    assert_value("8 - 5", 3.0);
    assert_value("10 / 4", 2.5);
    assert_value("23 % 4", 3.0);
    assert_value("1.5E2", 150.0);
    assert_value(".5 + .25", 0.75);
    assert_value("1 000 + 1", 1001.0);
}

#[test]
fn precedence_and_associativity() {
    assert_value("2 + 3 * 4", 14.0);
    assert_value("(2 + 3) * 4", 20.0);
    assert_value("2 ^ 3 ^ 2", 512.0);
    assert_value("(2 ^ 3) ^ 2", 64.0);
    assert_value("2 - 3 - 4", -5.0);
    assert_value("64 / 4 / 2", 8.0);
    assert_value("1 + 2 < 4", 1.0);
    assert_value("1 < 2 && 3 < 2 || 1 = 1", 1.0);
}

#[test]
fn signs_bind_tightest() {
    assert_value("-2 ^ 2", 4.0);
    assert_value("--5", 5.0);
    assert_value("+-5", -5.0);
    assert_value("+5", 5.0);
    assert_value("3 * -2", -6.0);
    assert_value("2 - -2", 4.0);
    assert_value("-(2 + 3)", -5.0);
    assert_value("neg -23", 23.0);
    assert_value("not false", 1.0);
}

#[test]
fn lone_plus_is_rejected() {
    let parser = Parser::new();
    assert!(matches!(assert_parse_failure(&parser, "+"), ParseError::Syntax { .. }));
    assert!(matches!(assert_parse_failure(&parser, "2 * + * 3"), ParseError::Syntax { .. }));
}

#[test]
fn implicit_multiplication_after_numbers() {
    let mut parser = Parser::new();
    parser.set_variable("x", 3).unwrap();

    assert_eq!(parser.parse("2x").unwrap().evaluate().unwrap(), 6.0);
    assert!((parser.parse("2pi").unwrap().evaluate().unwrap() - 2.0 * std::f64::consts::PI).abs()
            < 1e-12);
    assert_eq!(parser.parse("2x").unwrap().expression().unwrap(), "2*x");
}

#[test]
fn functions_and_constants() {
    assert_value("sqrt(49)", 7.0);
    assert_value("sqrt 16 + 1", 5.0);
    assert_value("log(2, 8)", 3.0);
    assert_value("max(1, 7, 3)", 7.0);
    assert_value("min(4)", 4.0);
    assert_value("avg(1, 2, 3, 4)", 2.5);
    assert_value("if(1 < 2, 10, 20)", 10.0);
    assert_value("fact(5)", 120.0);
    assert_value("sin(pi / 2)", 1.0);
    assert_value("ln(e)", 1.0);
    assert_value("true + true", 2.0);
}

#[test]
fn bitwise_operators() {
    assert_value("6 & 11", 2.0);
    assert_value("6 | 11", 15.0);
    assert_value("6 ^| 11", 13.0);
    assert_value("1 << 4", 16.0);
    assert_value("-24 >> 2", -6.0);
    assert_value("-1 >>> 28", 15.0);
}

#[test]
fn sum_and_prod() {
    assert_value("sum(i, 1, 10, 2^i)", 2046.0);
    assert_value("prod(i, 1, 5, i)", 120.0);
    assert_value("sum(i, 1, 0, i)", 0.0);
    assert_value("prod(i, 1, 0, i)", 1.0);
    assert_value("sum(i, 1, 3, sum(j, 1, i, j))", 10.0);
}

#[test]
fn binder_shadows_variables_but_not_builtins() {
    let mut parser = Parser::new();
    parser.set_variable("i", 100).unwrap();
    assert_eq!(parser.parse("sum(i, 1, 3, i) + i").unwrap().evaluate().unwrap(), 106.0);

    let error = assert_parse_failure(&parser, "sum(pi, 1, 3, pi)");
    assert!(matches!(error, ParseError::Syntax { .. }), "{error:?}");
}

#[test]
fn division_by_zero_per_strategy() {
    let result = Parser::new().parse("1 / 0").unwrap();
    assert!(result.evaluate().unwrap().is_nan());
    assert!(matches!(result.evaluate_decimal(), Err(EvalError::Arithmetic { .. })));
    assert!(matches!(result.evaluate_big_decimal(), Err(EvalError::Arithmetic { .. })));
    assert_eq!(Parser::try_evaluate("1 / 0"), None);
    assert_eq!(Parser::try_evaluate("1 / 4"), Some(0.25));
    assert_eq!(Parser::try_evaluate("1 +"), None);
}

#[test]
fn decimal_evaluation_is_exact() {
    let result = Parser::new().parse("0.1 + 0.2").unwrap();
    assert_eq!(result.evaluate_decimal().unwrap(), Decimal::new(3, 1));
    assert_ne!(result.evaluate().unwrap(), 0.3);

    let sign = Parser::new().parse("sign(-2.5) * 0.5").unwrap();
    assert_eq!(sign.evaluate_decimal_with(EvaluationOptions::default().with_strict_mode(true)),
               Ok(Decimal::new(-5, 1)));

    let equal = Parser::new().parse("0.1 + 0.2 = 0.3").unwrap();
    assert!(equal.evaluate_bool().unwrap());
    assert!(!equal.evaluate_bool_with(EvaluationOptions::default().with_epsilon(0.0))
                  .unwrap());
}

#[test]
fn big_decimal_evaluation() {
    let parser = Parser::new();
    let expected: BigDecimal = "265252859812191058636308480000000".parse().unwrap();
    assert_eq!(parser.parse("fact(30)").unwrap().evaluate_big_decimal().unwrap(), expected);

    let sum: BigDecimal = "100000000000000000000.000000000000000000001".parse().unwrap();
    assert_eq!(parser.parse("100000000000000000000 + 0.000000000000000000001")
                     .unwrap()
                     .evaluate_big_decimal()
                     .unwrap(),
               sum);
}

#[test]
fn oversized_exponents_are_rejected() {
    let parser = Parser::new();
    let big = |src: &str| parser.parse(src).unwrap().evaluate_big_decimal();

    assert_eq!(big("10E2147483647"),
               Err(EvalError::InvalidNumber { text:     "10E2147483647".to_string(),
                                              position: 0, }));
    assert!(matches!(big("1E2000000000 & 1"), Err(EvalError::InvalidNumber { position: 0, .. })));
    assert_eq!(big("1E60000 * 1E60000"), Err(EvalError::Arithmetic { position: 8 }));
    assert_eq!(big("1E99999 * 100"), Err(EvalError::Arithmetic { position: 8 }));
    assert_eq!(big("1E99999 & 1"), Err(EvalError::Arithmetic { position: 8 }));
    assert!(big("1E-99999 - 1E99999").unwrap().is_negative());

    let sum = big("1E90000 + 1").unwrap();
    assert_eq!(sum.digits(), 90_001);
    assert_eq!(sum - BigDecimal::one(), BigDecimal::new(1, 90_000));

    assert!(matches!(parser.parse("1E2000000000 & 1").unwrap().evaluate_decimal(),
                     Err(EvalError::InvalidNumber { .. })));
    assert_eq!(eval("1E2000000000"), f64::INFINITY);
}

#[test]
fn strict_mode_rejects_fallbacks() {
    let result = Parser::new().parse("lg(10) * 2").unwrap();
    let strict = EvaluationOptions::default().with_strict_mode(true);

    assert_eq!(result.evaluate_decimal().unwrap(), Decimal::from(2));
    assert_eq!(result.evaluate_decimal_with(strict),
               Err(EvalError::Unsupported { name:     "lg".to_string(),
                                            position: 0, }));
    assert!(matches!(result.evaluate_big_decimal_with(strict), Err(EvalError::Unsupported { .. })));
    assert_eq!(result.evaluate_with(strict).unwrap(), 2.0);

    let native = Parser::new().parse("max(1, 2.5) * 2").unwrap();
    assert_eq!(native.evaluate_decimal_with(strict).unwrap(), Decimal::from(5));
}

#[test]
fn boolean_evaluation() {
    let parser = Parser::new();
    assert!(parser.parse("3 > 2").unwrap().evaluate_bool().unwrap());
    assert!(!parser.parse("and(true, false)").unwrap().evaluate_bool().unwrap());
    assert_eq!(parser.parse("5").unwrap().evaluate_bool(),
               Err(EvalError::NotBoolean { value: 5.0 }));
}

#[test]
fn blank_input_is_zero() {
    let parser = Parser::new();
    assert_eq!(parser.parse("").unwrap().evaluate().unwrap(), 0.0);
    assert_eq!(parser.parse("   ").unwrap().expression().unwrap(), "0");
}

#[test]
fn unassigned_variables_fail_at_evaluation() {
    let mut parser = Parser::with_variables(&["x"]).unwrap();
    let result = parser.parse("x + 1").unwrap();
    assert_eq!(result.evaluate(),
               Err(EvalError::UnassignedVariable { name:     "x".to_string(),
                                                   position: 0, }));
    assert_eq!(parser.parse("2 * x").unwrap().evaluate_big_decimal(),
               Err(EvalError::UnassignedVariable { name:     "x".to_string(),
                                                   position: 4, }));

    parser.set_variable("x", 41).unwrap();
    assert_eq!(result.evaluate().unwrap(), 42.0);
}

#[test]
fn variable_lifecycle() {
    let mut parser = Parser::new();
    parser.add_variable("b").unwrap();
    parser.set_variable("a", 1.5).unwrap();
    assert_eq!(parser.variables(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(parser.get_variable("a").map(|v| v.as_real()), Some(1.5));
    assert!(parser.get_variable("b").is_none());

    parser.remove_variable("a").unwrap();
    assert_eq!(parser.remove_variable("a"),
               Err(DefinitionError::UnknownVariable { name: "a".to_string() }));
    parser.remove_all_variables();
    assert!(parser.variables().is_empty());
}

#[test]
fn names_are_validated() {
    let mut parser = Parser::new();
    for name in ["sin", "pi", "a1b", "1a", "", "x y"] {
        assert_eq!(parser.add_variable(name),
                   Err(DefinitionError::InvalidName { name: name.to_string() }),
                   "{name:?} should be rejected");
    }
    parser.add_variable("x").unwrap();
    assert!(parser.add_variable("x").is_err());
    assert!(Parser::with_variables(&["y", "y"]).is_err());
}

#[test]
fn longer_user_names_win_over_builtins() {
    let mut parser = Parser::new();
    parser.set_variable("pix", 2).unwrap();
    parser.set_variable("sine", 3).unwrap();
    assert_eq!(parser.parse("pix * sine").unwrap().evaluate().unwrap(), 6.0);
}

#[test]
fn expression_functions() {
    let mut parser = Parser::new();
    parser.add_function("f", "x^2 + 1", &["x"]).unwrap();
    parser.add_function("hyp", "sqrt(a^2 + b^2)", &["a", "b"]).unwrap();

    assert_eq!(parser.parse("f(3)").unwrap().evaluate().unwrap(), 10.0);
    assert_eq!(parser.parse("hyp(6, 8) + f 2").unwrap().evaluate().unwrap(), 15.0);
    assert_eq!(parser.functions(), vec!["f".to_string(), "hyp".to_string()]);

    assert!(matches!(parser.add_function("f", "x", &["x"]),
                     Err(DefinitionError::InvalidName { .. })));
    assert_eq!(parser.add_function("sin", "x", &["x"]),
               Err(DefinitionError::InvalidName { name: "sin".to_string() }));
    assert_eq!(parser.add_one_param_function("sin", f64::cos),
               Err(DefinitionError::InvalidName { name: "sin".to_string() }));
    assert!(matches!(parser.add_function("g", "x + y", &["x"]),
                     Err(DefinitionError::InvalidFunction { .. })));
    assert!(matches!(parser.add_function("g", "x", &["sin"]),
                     Err(DefinitionError::InvalidFunction { .. })));
    assert!(!parser.is_defined("g"));
}

#[test]
fn argument_counts_are_checked() {
    let mut parser = Parser::new();
    parser.add_function("f", "x * y", &["x", "y"]).unwrap();

    let error = assert_parse_failure(&parser, "f(1)");
    assert!(matches!(error, ParseError::ArgumentCount { count: 1, .. }), "{error:?}");
    let error = assert_parse_failure(&parser, "sqrt(1, 2)");
    assert_eq!(error,
               ParseError::ArgumentCount { name:     "sqrt".to_string(),
                                           count:    2,
                                           position: 0, });
    assert!(matches!(assert_parse_failure(&parser, "max()"), ParseError::ArgumentCount { .. }));
}

#[test]
fn redefined_functions_check_argument_counts() {
    let mut parser = Parser::new();
    parser.add_one_param_function("f", |x| x + 1.0).unwrap();
    let result = parser.parse("f(3)").unwrap();
    assert_eq!(result.evaluate().unwrap(), 4.0);

    let mismatch = EvalError::ArgumentCount { expected: 2,
                                              found:    1, };
    parser.remove_function("f").unwrap();
    parser.add_two_param_function("f", |a, b| a * b).unwrap();
    assert_eq!(result.evaluate(), Err(mismatch.clone()));
    assert_eq!(result.compile(&[]).err(), Some(mismatch.clone()));
    assert!(matches!(result.evaluate_decimal(), Err(EvalError::ArgumentCount { .. })));

    parser.remove_function("f").unwrap();
    parser.add_function("f", "a - b", &["a", "b"]).unwrap();
    assert_eq!(result.evaluate(), Err(mismatch));

    parser.remove_function("f").unwrap();
    parser.add_multi_param_function("f", |v| v.iter().sum()).unwrap();
    assert_eq!(result.evaluate().unwrap(), 3.0);
}

#[test]
fn native_functions() {
    let mut parser = Parser::new();
    parser.add_one_param_function("twice", |x| 2.0 * x).unwrap();
    parser.add_two_param_function("hypot", f64::hypot).unwrap();
    parser.add_three_param_function("mad", |a, b, c| a.mul_add(b, c)).unwrap();
    parser.add_multi_param_function("total", |v| v.iter().sum()).unwrap();

    let result = parser.parse("twice(hypot(3, 4)) + mad(2, 3, 4) + total(1, 2, 3, 4)").unwrap();
    assert_eq!(result.evaluate().unwrap(), 30.0);
}

#[test]
fn removed_functions_fail_at_evaluation() {
    let mut parser = Parser::new();
    parser.add_one_param_function("twice", |x| 2.0 * x).unwrap();
    let result = parser.parse("twice(2)").unwrap();

    parser.remove_function("twice").unwrap();
    assert!(matches!(result.evaluate(), Err(EvalError::UnknownFunction { .. })));
    assert_eq!(assert_parse_failure(&parser, "twice(2)"),
               ParseError::UnexpectedCharacter { character: 't',
                                                 position:  0, });
    assert_eq!(parser.remove_function("twice"),
               Err(DefinitionError::UnknownFunction { name: "twice".to_string() }));

    parser.add_one_param_function("a", f64::abs).unwrap();
    parser.remove_all_functions();
    assert!(parser.functions().is_empty());
}

#[test]
fn comma_style() {
    assert_eq!(Parser::evaluate_with_style("1,5 + max(1; 2,5)", SeparatorStyle::Comma).unwrap(),
               4.0);

    let mut parser = Parser::new();
    parser.set_separator_style(SeparatorStyle::Comma);
    let result = parser.parse("sum(i; 1; 3; i / 2)").unwrap();
    assert_eq!(result.evaluate().unwrap(), 3.0);
    assert_eq!(result.expression().unwrap(), "sum(i;1;3;i/2)");
    assert!(parser.is_valid_item(";"));
    assert!(parser.is_valid_item("1,5"));
    assert!(!parser.is_valid_item("1.5"));
}

#[test]
fn literals_survive_style_changes() {
    let mut parser = Parser::new();
    parser.set_separator_style(SeparatorStyle::Comma);
    let result = parser.parse("1,5 + max(2,25; 1)").unwrap();
    assert_eq!(result.evaluate().unwrap(), 3.75);

    parser.set_separator_style(SeparatorStyle::Dot);
    assert_eq!(result.evaluate().unwrap(), 3.75);
    assert_eq!(result.evaluate_decimal().unwrap(), Decimal::new(375, 2));
    assert_eq!(result.evaluate_big_decimal().unwrap(), "3.75".parse::<BigDecimal>().unwrap());
    let text = result.expression().unwrap();
    assert_eq!(text, "1.5+max(2.25,1)");
    assert_eq!(parser.parse(&text).unwrap().evaluate().unwrap(), 3.75);

    parser.set_separator_style(SeparatorStyle::Comma);
    assert_eq!(result.expression().unwrap(), "1,5+max(2,25;1)");
    assert_eq!(result.postfix_expression().unwrap(), "1,5 2,25 1 max +");
}

#[test]
fn evaluate_list_and_range() {
    let mut parser = Parser::with_variables(&["x"]).unwrap();
    let result = parser.parse("x * 2").unwrap();

    let list = result.evaluate_list("x", [3.0, 1.0, 2.0]).unwrap();
    assert_eq!(list.into_iter().map(|(k, v)| (k.0, v)).collect::<Vec<_>>(),
               vec![(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]);
    assert_eq!(parser.get_variable("x").map(|v| v.as_real()), Some(2.0));

    let range = result.evaluate_range("x", -1, 3).unwrap();
    assert_eq!(range.values().copied().collect::<Vec<_>>(), vec![-2.0, 0.0, 2.0]);

    parser.add_one_param_function("f", f64::abs).unwrap();
    assert!(matches!(result.evaluate_list("f", [1.0]), Err(Error::Definition(_))));
}

#[test]
fn compiled_functions_capture_free_variables() {
    let mut parser = Parser::with_variables(&["a", "b"]).unwrap();
    parser.set_variable("c", 10).unwrap();
    let function = parser.parse("a * b + c").unwrap().compile(&["a", "b"]).unwrap();

    parser.set_variable("c", 1000).unwrap();
    assert_eq!(function.call(&[2.0, 3.0]).unwrap(), 16.0);
    assert_eq!(function.parameters(), ["a".to_string(), "b".to_string()]);
    assert_eq!(function.call(&[2.0]),
               Err(EvalError::ArgumentCount { expected: 2,
                                              found:    1, }));

    let unassigned = Parser::with_variables(&["x", "y"]).unwrap().parse("x + y").unwrap();
    assert!(matches!(unassigned.compile(&["x"]), Err(EvalError::UnassignedVariable { .. })));
}

#[test]
fn bracket_errors() {
    let parser = Parser::new();
    assert!(matches!(assert_parse_failure(&parser, "(1 + 2"), ParseError::Bracket { .. }));
    assert!(matches!(assert_parse_failure(&parser, "1 + 2)"), ParseError::Bracket { .. }));
    assert!(matches!(assert_parse_failure(&parser, "max(1, 2"), ParseError::Bracket { .. }));
    assert!(matches!(assert_parse_failure(&parser, "sqrt"), ParseError::Syntax { .. }));
}

#[test]
fn syntax_errors_carry_positions() {
    let parser = Parser::new();
    assert_eq!(assert_parse_failure(&parser, "2 # 3"),
               ParseError::UnexpectedCharacter { character: '#',
                                                 position:  2, });
    assert!(matches!(assert_parse_failure(&parser, "1 +"), ParseError::Syntax { .. }));
    assert!(matches!(assert_parse_failure(&parser, "1 + * 2"), ParseError::Syntax { .. }));
}

#[test]
fn nesting_limit() {
    let mut parser = Parser::new();
    assert!(parser.is_valid("(((1)))"));

    parser.set_max_depth(Some(2));
    assert!(parser.is_valid("((1))"));
    assert!(parser.is_valid("sqrt(sqrt(16))"));
    assert_eq!(assert_parse_failure(&parser, "(((1)))"),
               ParseError::NestingTooDeep { limit:    2,
                                            position: 2, });
    assert!(matches!(assert_parse_failure(&parser, "sqrt(sqrt(sqrt(16)))"),
                     ParseError::NestingTooDeep { .. }));
}

#[test]
fn validation_helpers() {
    let parser = Parser::new();
    assert!(parser.is_valid("sin(pi) + 1"));
    assert!(!parser.is_valid("sin(pi) +"));
    assert!(parser.validate("(1").is_err());
    assert!(parser.is_valid_item(""));
    assert!(parser.is_valid_item(" 1 000 "));
    assert!(parser.is_valid_item(","));
    assert!(parser.is_valid_item("."));
    assert!(!parser.is_valid_item("1e5"));
}

#[test]
fn reference_examples_hold() {
    for info in reference() {
        let Some((example, result)) = info.example else {
            continue;
        };
        let actual = eval(example);
        let expected = eval(result);
        assert!((actual - expected).abs() < 1e-9,
                "{}: {example} gave {actual}, expected {result} = {expected}",
                info.symbol);
    }
}

#[test]
fn reference_lists_every_builtin() {
    let table = SymbolTable::new();
    for info in reference() {
        assert!(table.get(info.symbol).is_some_and(|symbol| symbol.is_builtin()),
                "{} is not a built-in symbol",
                info.symbol);
    }

    let mut parser = Parser::new();
    parser.set_variable("x", 1).unwrap();
    let symbols = parser.environment();
    assert!(symbols.with_symbols(|table| table.get("x").is_some_and(|symbol| !symbol.is_builtin())));
}

#[test]
fn trees_expose_children() {
    let result = Parser::new().parse("max(1, 2 + 3) * sum(i, 1, 2, i)").unwrap();
    let Node::Operator(product) = result.tree() else {
        panic!("expected an operator at the root, found {:?}", result.tree());
    };
    let children = result.tree().children();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].children().len(), 2);
    assert_eq!(product.right.children().len(), 3);
    assert_eq!(result.tree().position(), 14);
}
