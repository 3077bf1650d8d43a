use clap::{Parser as _, ValueEnum};
use exprcalc::{EvaluationOptions, Parser, SeparatorStyle, interpreter::symbols::reference};
use tracing_subscriber::EnvFilter;

/// Which result to print for an expression.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Floating point evaluation.
    Double,
    /// Fixed precision decimal evaluation.
    Decimal,
    /// Arbitrary-precision decimal evaluation.
    Big,
    /// Boolean evaluation.
    Bool,
    /// Infix rendering.
    Infix,
    /// Postfix rendering.
    Postfix,
    /// MathML rendering.
    Mathml,
}

/// exprcalc evaluates mathematical expressions.
#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// How to evaluate or render the expression.
    #[arg(short, long, value_enum, default_value_t = Mode::Double)]
    mode: Mode,

    /// Use `,` as decimal separator and `;` between arguments.
    #[arg(short, long)]
    comma: bool,

    /// Fail instead of falling back to floating point in decimal modes.
    #[arg(short, long)]
    strict: bool,

    /// Lists every built-in symbol and exits.
    #[arg(short, long)]
    reference: bool,

    expression: Option<String>,
}

fn run(args: &Args, expression: &str) -> Result<String, exprcalc::Error> {
    let mut parser = Parser::new();
    if args.comma {
        parser.set_separator_style(SeparatorStyle::Comma);
    }
    let result = parser.parse(expression)?;
    let options = EvaluationOptions::default().with_strict_mode(args.strict);

    let output = match args.mode {
        Mode::Double => result.evaluate_with(options)?.to_string(),
        Mode::Decimal => result.evaluate_decimal_with(options)?.to_string(),
        Mode::Big => result.evaluate_big_decimal_with(options)?.to_string(),
        Mode::Bool => result.evaluate_bool_with(options)?.to_string(),
        Mode::Infix => result.expression()?,
        Mode::Postfix => result.postfix_expression()?,
        Mode::Mathml => result.mathml()?,
    };
    Ok(output)
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .init();

    let args = Args::parse();

    if args.reference {
        for info in reference() {
            match info.example {
                Some((example, result)) => {
                    println!("{:<6} {}  ({example} = {result})", info.symbol, info.description);
                },
                None => println!("{:<6} {}", info.symbol, info.description),
            }
        }
        return;
    }

    let Some(expression) = args.expression.as_deref() else {
        eprintln!("No expression given. Pass an expression or --reference.");
        std::process::exit(2);
    };

    match run(&args, expression) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
