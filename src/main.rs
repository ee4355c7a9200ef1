//! REPL entry point: no arguments, stdin/stdout only (see SPEC_FULL.md §6).

use monkey::env::Environment;
use monkey::eval::eval_program;
use monkey::macros::define_and_expand_macros;
use monkey::parser::parse;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = ">> ";
const PARSE_ERROR_BANNER: &str = "Woops! We ran into some monkey business here!\n parser errors:";

fn main() {
    print_greeting();

    let env = Environment::new();
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("failed to initialize REPL: {}", e);
            return;
        }
    };

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                run_line(&line, &env);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            }
        }
    }
}

fn run_line(line: &str, env: &std::rc::Rc<Environment>) {
    let (program, errors) = parse(line);
    if !errors.is_empty() {
        print_parse_errors(&errors);
        return;
    }
    let expanded = define_and_expand_macros(program, env);
    let result = eval_program(&expanded, env);
    println!("{}", result.inspect());
}

fn print_parse_errors(errors: &[String]) {
    println!("{}", PARSE_ERROR_BANNER);
    for msg in errors {
        println!("\t{}", msg);
    }
}

fn print_greeting() {
    if let Ok(user) = std::env::var("USER").or_else(|_| std::env::var("USERNAME")) {
        println!(
            "Hello {}! This is the Monkey programming language!",
            user
        );
    }
}
