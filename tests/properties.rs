use exprcalc::{BigDecimal, Parser};
use proptest::prelude::*;

/// Fully bracketed expressions over small integers and the arithmetic
/// operators.
fn expression() -> impl Strategy<Value = String> {
    let leaf = (0u32..100).prop_map(|n| n.to_string());
    leaf.prop_recursive(4, 32, 2, |inner| {
            let operator = prop::sample::select(vec!['+', '-', '*', '/', '^', '%']);
            prop_oneof![(inner.clone(), operator, inner.clone()).prop_map(|(l, op, r)| format!("({l}{op}{r})")),
                        inner.prop_map(|e| format!("-{e}")),]
        })
}

fn decimal_text() -> impl Strategy<Value = String> {
    (any::<i64>(), 0i32..30).prop_map(|(mantissa, scale)| BigDecimal::new(mantissa, -scale).to_string())
}

fn same(left: f64, right: f64) -> bool {
    (left.is_nan() && right.is_nan()) || left == right
}

/// Evaluates postfix output with plain floating point operations.
fn eval_postfix(text: &str) -> f64 {
    let mut stack: Vec<f64> = Vec::new();
    for item in text.split(' ') {
        if let Ok(number) = item.parse::<f64>() {
            stack.push(number);
            continue;
        }
        let right = stack.pop().unwrap();
        let left = stack.pop().unwrap();
        stack.push(match item {
                       "+" => left + right,
                       "-" => left - right,
                       "*" => left * right,
                       "/" if right == 0.0 => f64::NAN,
                       "/" => left / right,
                       "^" => left.powf(right),
                       "%" => left % right,
                       other => panic!("unexpected postfix item {other:?}"),
                   });
    }
    assert_eq!(stack.len(), 1, "{text}");
    stack[0]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn infix_rendering_is_idempotent(src in expression()) {
        let parser = Parser::new();
        let first = parser.parse(&src).unwrap();
        let rendered = first.expression().unwrap();
        let second = parser.parse(&rendered).unwrap();

        prop_assert_eq!(second.expression().unwrap(), rendered.clone());
        let (a, b) = (first.evaluate().unwrap(), second.evaluate().unwrap());
        prop_assert!(same(a, b), "{} = {} but {} = {}", src, a, rendered, b);
    }

    #[test]
    fn postfix_agrees_with_evaluation(src in expression()) {
        let result = Parser::new().parse(&src).unwrap();
        let expected = result.evaluate().unwrap();
        let actual = eval_postfix(&result.postfix_expression().unwrap());
        prop_assert!(same(expected, actual), "{}: {} vs {}", src, expected, actual);
    }

    #[test]
    fn decimal_division_agrees_with_floating_point(a in -10_000i64..10_000, b in 1i64..10_000) {
        let src = format!("{a} / {b}");
        let result = Parser::new().parse(&src).unwrap();
        #[allow(clippy::cast_precision_loss)]
        let expected = a as f64 / b as f64;

        let decimal: f64 = result.evaluate_decimal().unwrap().to_string().parse().unwrap();
        let big = result.evaluate_big_decimal().unwrap().to_f64();
        prop_assert!((decimal - expected).abs() < 1e-12);
        prop_assert!((big - expected).abs() < 1e-12);
    }

    #[test]
    fn big_decimal_integer_arithmetic_is_exact(a in any::<i64>(), b in any::<i64>()) {
        let parser = Parser::new();
        let (x, y) = (BigDecimal::from(a), BigDecimal::from(b));

        let sum = parser.parse(&format!("{a} + {b}")).unwrap().evaluate_big_decimal().unwrap();
        let product = parser.parse(&format!("{a} * {b}")).unwrap().evaluate_big_decimal().unwrap();
        prop_assert_eq!(sum, &x + &y);
        prop_assert_eq!(product, &x * &y);
    }

    #[test]
    fn big_decimal_addition_is_reversible(x in decimal_text(), y in decimal_text()) {
        let (x, y): (BigDecimal, BigDecimal) = (x.parse().unwrap(), y.parse().unwrap());
        prop_assert_eq!(&(&x + &y) - &y, x);
    }
}
