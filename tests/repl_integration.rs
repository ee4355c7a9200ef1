//! Exercises the REPL's line-at-a-time pipeline (persistent environment,
//! parse-error reporting) through the public library API, without
//! spawning the built binary.

use monkey::env::Environment;
use monkey::eval::eval_program;
use monkey::macros::define_and_expand_macros;
use monkey::object::Object;
use monkey::parser::parse;

/// Mirrors `main.rs::run_line`: one REPL line against a persistent env.
fn run_line(line: &str, env: &std::rc::Rc<Environment>) -> Result<Object, Vec<String>> {
    let (program, errors) = parse(line);
    if !errors.is_empty() {
        return Err(errors);
    }
    let expanded = define_and_expand_macros(program, env);
    Ok(eval_program(&expanded, env))
}

#[test]
fn bindings_persist_across_repl_lines() {
    let env = Environment::new();
    run_line("let x = 10;", &env).unwrap();
    let result = run_line("x + 5;", &env).unwrap();
    match result {
        Object::Integer(n) => assert_eq!(n, 15),
        other => panic!("expected Integer(15), got {:?}", other),
    }
}

#[test]
fn functions_defined_in_one_line_are_callable_in_another() {
    let env = Environment::new();
    run_line("let add = fn(a, b) { a + b };", &env).unwrap();
    let result = run_line("add(2, 3);", &env).unwrap();
    match result {
        Object::Integer(n) => assert_eq!(n, 5),
        other => panic!("expected Integer(5), got {:?}", other),
    }
}

#[test]
fn macros_defined_in_one_line_expand_in_a_later_line() {
    let env = Environment::new();
    run_line(
        "let identity = macro(x) { quote(unquote(x)); };",
        &env,
    )
    .unwrap();
    let result = run_line("identity(5 + 5);", &env).unwrap();
    match result {
        Object::Integer(n) => assert_eq!(n, 10),
        other => panic!("expected Integer(10), got {:?}", other),
    }
}

#[test]
fn malformed_line_reports_parse_errors_without_aborting_the_session() {
    let env = Environment::new();
    let errors = run_line("let x 5;", &env).unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors[0].contains("expected next token to be"));

    // The session environment is untouched by the failed line and keeps working.
    let result = run_line("let x = 1; x", &env).unwrap();
    match result {
        Object::Integer(n) => assert_eq!(n, 1),
        other => panic!("expected Integer(1), got {:?}", other),
    }
}
