use ariadne::Source;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{
    fs::File,
    io::{self, BufReader, IsTerminal, Read},
};
use stepcheck_engine::{equiv::free_variables, eval::Eval, simplify::simplify};
use stepcheck_parser::{parse_expression, parser::error::Error};
use stepcheck_verify::{
    mistakes::detect_common_mistakes, split::split_steps, verify_derivation_steps,
};

/// Report an error to stderr.
///
/// The `ariadne` crate's [`Report`] type does not have a `Display` implementation, so we can
/// only use its `eprint` method to print to stderr.
fn report_to_stderr(err: &Error, input: &str) {
    let report = err.build_report("input");
    let _ = report.eprint(("input", Source::from(input)));
}

/// Parses a single expression and prints its value, or its simplified form when it contains
/// variables.
fn show_expression(input: &str) {
    let expr = match parse_expression(input) {
        Ok(expr) => expr,
        Err(err) => {
            report_to_stderr(&err, input);
            return;
        },
    };

    if free_variables(&expr).is_empty() {
        match expr.eval_default() {
            Ok(value) => println!("{}", value),
            Err(err) => report_to_stderr(&err, input),
        }
        return;
    }

    println!("{}", simplify(&expr));
}

/// Splits a line containing `=` into derivation steps, verifies the chain, and annotates
/// wrong steps with any catalogued mistakes.
fn check_derivation(input: &str) {
    let steps = split_steps(input);
    let report = verify_derivation_steps(&steps);
    if report.valid {
        println!(
            "valid derivation ({} step{})",
            report.steps.len(),
            if report.steps.len() == 1 { "" } else { "s" },
        );
        return;
    }

    if let Some(err) = report.error {
        println!("invalid: {}", err);
    }

    let mistakes = detect_common_mistakes(&steps);
    for mistake in &mistakes.mistakes {
        println!(
            "step {}: {} (expected {}, found {})",
            mistake.step,
            mistake.kind.tag(),
            mistake.expected,
            mistake.found,
        );
        println!("  {}", mistake.explanation);
        println!("  try: {}", mistake.suggested_fix);
    }
}

/// Processes one line of input: lines with `=` are treated as derivations, everything else
/// as a single expression.
fn process_line(input: &str) {
    if input.contains('=') {
        check_derivation(input);
    } else {
        show_expression(input);
    }
}

/// Processes every non-empty line of a source file or piped input.
fn process_source(input: &str) {
    for line in input.lines() {
        if !line.trim().is_empty() {
            process_line(line);
        }
    }
}

fn main() {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        let mut file = BufReader::new(File::open(filename).unwrap());
        let mut input = String::new();
        file.read_to_string(&mut input).unwrap();

        process_source(&input);
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();

        process_source(&input);
    } else {
        // run the repl / interactive mode
        let mut rl = DefaultEditor::new().unwrap();

        fn read_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            process_line(input.trim());
            Ok(())
        }

        loop {
            if let Err(err) = read_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
