use exprcalc::{Parser, SeparatorStyle};
use pretty_assertions::assert_eq;

fn infix(src: &str) -> String {
    Parser::new().parse(src).unwrap().expression().unwrap()
}

fn postfix(src: &str) -> String {
    Parser::new().parse(src).unwrap().postfix_expression().unwrap()
}

fn mathml(parser: &Parser, src: &str) -> String {
    let markup = parser.parse(src).unwrap().mathml().unwrap();
    let body = markup.strip_prefix("<math xmlns=\"http://www.w3.org/1998/Math/MathML\">")
                     .and_then(|rest| rest.strip_suffix("</math>"))
                     .unwrap_or_else(|| panic!("{markup} is not a math element"));
    body.to_string()
}

#[test]
fn infix_drops_redundant_brackets() {
    assert_eq!(infix("((1 + 2)) + 3"), "1+2+3");
    assert_eq!(infix("1 + (2 + 3)"), "1+(2+3)");
    assert_eq!(infix("2 - (3 - 4)"), "2-(3-4)");
    assert_eq!(infix("(2 - 3) - 4"), "2-3-4");
    assert_eq!(infix("2 ^ (3 ^ 2)"), "2^3^2");
    assert_eq!(infix("(2 ^ 3) ^ 2"), "(2^3)^2");
    assert_eq!(infix("(1 + 2) * 3"), "(1+2)*3");
    assert_eq!(infix("1 + 2 * 3"), "1+2*3");
}

#[test]
fn infix_signs_and_calls() {
    assert_eq!(infix("-(1 + 2)"), "-(1+2)");
    assert_eq!(infix("- 5"), "-5");
    assert_eq!(infix("2 - -2"), "2--2");
    assert_eq!(infix("max(1, 2 + 3, sqrt 4)"), "max(1,2+3,sqrt(4))");
    assert_eq!(infix("sum(i, 1, 10, 2^i)"), "sum(i,1,10,2^i)");
    assert_eq!(infix("3pi"), "3*pi");
    assert_eq!(infix("1.5E3 + .5"), "1.5E3+.5");
}

#[test]
fn infix_follows_separator_style() {
    let mut parser = Parser::new();
    parser.set_separator_style(SeparatorStyle::Comma);
    assert_eq!(parser.parse("max(1,5; 2)").unwrap().to_string(), "max(1,5;2)");
}

#[test]
fn numbers_follow_separator_style() {
    let mut parser = Parser::new();
    parser.set_separator_style(SeparatorStyle::Comma);
    let result = parser.parse("2,5 / 0,5").unwrap();
    assert_eq!(mathml(&parser, "2,5 / 0,5"),
               "<mfrac><mrow><mn>2,5</mn></mrow><mrow><mn>0,5</mn></mrow></mfrac>");

    parser.set_separator_style(SeparatorStyle::Dot);
    assert_eq!(result.to_string(), "2.5/0.5");
    assert_eq!(result.postfix_expression().unwrap(), "2.5 0.5 /");
}

#[test]
fn postfix_orders_operands_first() {
    assert_eq!(postfix("1 + 2 * 3"), "1 2 3 * +");
    assert_eq!(postfix("(1 + 2) * 3"), "1 2 + 3 *");
    assert_eq!(postfix("2 ^ 3 ^ 2"), "2 3 2 ^ ^");
    assert_eq!(postfix("-(1 + 2)"), "0 1 2 + -");
    assert_eq!(postfix("max(1, 2, 3)"), "1 2 3 max");
    assert_eq!(postfix("sum(i, 1, 3, i)"), "i 1 3 i sum");
}

#[test]
fn mathml_fractions_and_powers() {
    let parser = Parser::new();
    assert_eq!(mathml(&parser, "1 / 2"),
               "<mfrac><mrow><mn>1</mn></mrow><mrow><mn>2</mn></mrow></mfrac>");
    assert_eq!(mathml(&parser, "(1 + 2) ^ 2"),
               "<msup><mrow><mo>(</mo><mn>1</mn><mo>+</mo><mn>2</mn><mo>)</mo></mrow><mrow><mn>2</mn></mrow></msup>");
    assert_eq!(mathml(&parser, "2pi"), "<mn>2</mn><mo>&sdot;</mo><mi>&pi;</mi>");
}

#[test]
fn mathml_escapes_operators() {
    let parser = Parser::with_variables(&["a", "b"]).unwrap();
    assert_eq!(mathml(&parser, "a < b"), "<mi>a</mi><mo>&lt;</mo><mi>b</mi>");
    assert_eq!(mathml(&parser, "a <= b"), "<mi>a</mi><mo>&le;</mo><mi>b</mi>");
    assert_eq!(mathml(&parser, "a & b"), "<mi>a</mi><mo>&amp;</mo><mi>b</mi>");
    assert_eq!(mathml(&parser, "a >> b"), "<mi>a</mi><mo>&gt;&gt;</mo><mi>b</mi>");
}

#[test]
fn mathml_functions() {
    let parser = Parser::new();
    assert_eq!(mathml(&parser, "sqrt(2)"), "<msqrt><mn>2</mn></msqrt>");
    assert_eq!(mathml(&parser, "abs(-3)"), "<mo>|</mo><mo>-</mo><mn>3</mn><mo>|</mo>");
    assert_eq!(mathml(&parser, "fact(5)"), "<mn>5</mn><mo>!</mo>");
    assert_eq!(mathml(&parser, "lg(100)"),
               "<msub><mi>log</mi><mn>10</mn></msub><mo>(</mo><mn>100</mn><mo>)</mo>");
    assert_eq!(mathml(&parser, "log(2, 8)"),
               "<msub><mi>log</mi><mn>2</mn></msub><mo>(</mo><mn>8</mn><mo>)</mo>");
    assert_eq!(mathml(&parser, "log(1 + 1, 8)"),
               "<msub><mi>log</mi><mo>(</mo><mn>1</mn><mo>+</mo><mn>1</mn><mo>)</mo></msub><mo>(</mo><mn>8</mn><mo>)</mo>");
    assert_eq!(mathml(&parser, "cbrt(27)"), "<mroot><mrow><mn>27</mn></mrow><mn>3</mn></mroot>");
    assert_eq!(mathml(&parser, "max(1, 2)"),
               "<mi>max</mi><mfenced separators=\",\"><mrow><mn>1</mn></mrow><mrow><mn>2</mn></mrow></mfenced>");
    assert_eq!(mathml(&parser, "sum(i, 1, 3, i)"),
               "<munderover><mo>&sum;</mo><mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow><mrow><mn>3</mn></mrow></munderover><mrow><mi>i</mi></mrow>");
}
