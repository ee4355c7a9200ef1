//! Focused tests for string and array built-ins (len, first, last, rest,
//! push, pop) and their error paths.

use monkey::env::Environment;
use monkey::eval::eval_program;
use monkey::macros::define_and_expand_macros;
use monkey::object::Object;
use monkey::parser::parse;

fn run(input: &str) -> Object {
    let (program, errors) = parse(input);
    assert!(errors.is_empty(), "parser errors: {:?}", errors);
    let env = Environment::new();
    let expanded = define_and_expand_macros(program, &env);
    eval_program(&expanded, &env)
}

fn array_elements(obj: &Object) -> &[Object] {
    match obj {
        Object::Array(elements) => elements,
        other => panic!("expected Array, got {:?}", other),
    }
}

fn as_int(obj: &Object) -> i64 {
    match obj {
        Object::Integer(n) => *n,
        other => panic!("expected Integer, got {:?}", other),
    }
}

#[test]
fn first_last_rest_on_array() {
    assert_eq!(as_int(&run("first([1, 2, 3])")), 1);
    assert_eq!(as_int(&run("last([1, 2, 3])")), 3);
    assert_eq!(array_elements(&run("rest([1, 2, 3])")).len(), 2);
}

#[test]
fn first_last_on_empty_array_is_null() {
    assert!(matches!(run("first([])"), Object::Null(_)));
    assert!(matches!(run("last([])"), Object::Null(_)));
    assert!(matches!(run("rest([])"), Object::Null(_)));
}

#[test]
fn push_appends_without_mutating_source() {
    let result = run("let a = [1, 2]; let b = push(a, 3); [len(a), len(b)]");
    let elements = array_elements(&result);
    assert_eq!(as_int(&elements[0]), 2);
    assert_eq!(as_int(&elements[1]), 3);
}

#[test]
fn pop_removes_last_without_mutating_source() {
    let result = run("let a = [1, 2, 3]; let b = pop(a); [len(a), len(b)]");
    let elements = array_elements(&result);
    assert_eq!(as_int(&elements[0]), 3);
    assert_eq!(as_int(&elements[1]), 2);
}

#[test]
fn pop_on_empty_array_stays_empty() {
    assert_eq!(array_elements(&run("pop([])")).len(), 0);
}

#[test]
fn first_rejects_non_array_argument() {
    match run("first(1)") {
        Object::Error(msg) => assert_eq!(msg, "argument to `first` not supported, got INTEGER"),
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn push_requires_exactly_two_arguments() {
    match run("push([1])") {
        Object::Error(msg) => assert_eq!(msg, "wrong number of arguments. got=1, want=2"),
        other => panic!("expected Error, got {:?}", other),
    }
}

#[test]
fn len_counts_bytes_not_chars_for_string() {
    assert_eq!(as_int(&run(r#"len("hello")"#)), 5);
}

#[test]
fn map_and_reduce_style_recursion_over_arrays() {
    let input = "
        let map = fn(arr, f) {
            if (len(arr) == 0) {
                []
            } else {
                push(map(rest(arr), f), f(first(arr)));
            }
        };
        let double = fn(x) { x * 2 };
        map([1, 2, 3], double);
    ";
    let result = run(input);
    let elements = array_elements(&result);
    assert_eq!(elements.len(), 3);
}
