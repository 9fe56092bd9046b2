// ABOUTME: Driver — CLI argument parsing, script execution, and the
// interactive REPL built on rustyline.

mod builtins;
mod config;
mod env;
mod error;
mod eval;
mod parser;
mod pool;
mod value;

use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use config::{HELP_TEXT, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use env::Environment;
use rustyline::error::ReadlineError;
use rustyline::highlight::MatchingBracketHighlighter;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{Completer, Config as RlConfig, Editor, Helper, Highlighter, Hinter, Validator};
use rustyline_derive::{Completer, Helper, Highlighter, Hinter, Validator};

/// A small Lisp-family evaluation core: reader, environment, tree-walking
/// evaluator, unhygienic macros, and a bounded value pool.
#[derive(Parser, Debug)]
#[command(name = "lisp-core")]
#[command(version = config::VERSION)]
#[command(about = "A small Lisp-family evaluation core")]
struct CliArgs {
    /// Script file to execute (if omitted, starts an interactive REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Unbound symbols raise an error instead of resolving to nil
    #[arg(long)]
    strict: bool,

    /// Override the value pool's bounded capacity
    #[arg(long, value_name = "SLOTS")]
    pool_capacity: Option<usize>,
}

/// Bracket/quote-balance checking so the REPL only submits a line once its
/// parens close, plus matching-bracket cursor highlighting, assembled from
/// rustyline's own building blocks via its derive macros.
#[derive(Completer, Helper, Hinter, Highlighter, Validator)]
struct InputValidator {
    #[rustyline(Validator)]
    brackets: MatchingBracketValidator,
    #[rustyline(Highlighter)]
    highlighter: MatchingBracketHighlighter,
}

impl Default for InputValidator {
    fn default() -> Self {
        InputValidator {
            brackets: MatchingBracketValidator::new(),
            highlighter: MatchingBracketHighlighter::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    config::set_strict(args.strict);
    if let Some(capacity) = args.pool_capacity {
        pool::set_capacity(capacity);
    }

    let env = builtins::root_env();

    if let Some(script_path) = args.script {
        run_script(&script_path, &env)?;
        return Ok(());
    }

    run_repl(&env)
}

/// Reads and evaluates every top-level form in `path`, in order. Scripts
/// don't print their results — only what `display` explicitly prints.
fn run_script(path: &PathBuf, env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read script file {}: {}", path.display(), e))?;

    let mut remaining: &str = contents.trim();
    while !remaining.is_empty() {
        let (rest, form) = parser::parse_one(remaining).map_err(|e| format!("parse error: {}", e))?;
        eval::eval(form, env).map_err(|e| format!("evaluation error: {}", e))?;
        remaining = rest.trim_start();
    }

    Ok(())
}

fn run_repl(env: &Rc<Environment>) -> Result<(), Box<dyn std::error::Error>> {
    let rl_config = RlConfig::builder().auto_add_history(true).build();
    let mut rl: Editor<InputValidator, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config).map_err(|e| format!("failed to initialize REPL: {}", e))?;
    rl.set_helper(Some(InputValidator::default()));

    let history_file = ".lisp_core_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        match rl.readline("lisp> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match trimmed {
                    "(quit)" | "(exit)" => {
                        println!("Goodbye!");
                        break;
                    }
                    "(clear)" => {
                        print!("\x1B[2J\x1B[H");
                        continue;
                    }
                    "(help)" => {
                        println!("{}", HELP_TEXT);
                        continue;
                    }
                    _ => {}
                }

                match parser::parse(trimmed) {
                    Ok(form) => match eval::eval(form, env) {
                        Ok(result) => println!("=> {}", result.format_top_level()),
                        Err(e) => eprintln!("Error: {}", e),
                    },
                    Err(e) => eprintln!("Parse error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}
