use std::{
    fs,
    io::{self, BufRead},
    path::PathBuf,
};

use clap::Parser;
use mimic::{
    interpreter::{executor::Interpreter, lexer::tokenize, parser},
    run_script,
};

/// mimic is a small scripting language for keyboard, mouse and window
/// automation.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path of the script to run.
    file: Option<PathBuf>,

    /// Runs the given source string instead of a file.
    #[arg(short, long)]
    eval: Option<String>,

    /// Starts an interactive session.
    #[arg(short, long)]
    interactive: bool,
}

fn main() {
    let args = Args::parse();

    if args.interactive {
        repl();
        return;
    }

    let script = if let Some(source) = args.eval {
        source
    } else if let Some(path) = &args.file {
        fs::read_to_string(path).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      path.display());
            std::process::exit(1);
        })
    } else {
        eprintln!("Nothing to run. Pass a script file, --eval, or --interactive.");
        std::process::exit(1);
    };

    let mut stdout = io::stdout();
    if let Err(e) = run_script(&script, &mut stdout) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Reads statements line by line and executes them against one persistent
/// interpreter, so variables and functions survive between inputs.
fn repl() {
    let mut stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut stdout);
    let stdin = io::stdin();

    loop {
        // the prompt goes to stderr so program output stays clean on stdout
        eprint!("> ");

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {},
        }
        if line.trim().is_empty() {
            continue;
        }

        let tokens = match tokenize(&line) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{e}");
                continue;
            },
        };

        // earlier lines may have bound names this one refers to
        let mut line_parser = parser::Parser::new(tokens);
        line_parser.predeclare(interpreter.globals.keys().map(String::as_str),
                               interpreter.function_names());

        match line_parser.parse() {
            Ok(program) => {
                if let Err(e) = interpreter.execute(&program) {
                    eprintln!("{e}");
                }
            },
            Err(e) => eprintln!("{e}"),
        }
    }
}
