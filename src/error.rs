// ABOUTME: Evaluation error types with literal, spec-mandated Display text.
//! Evaluation error types.
//!
//! Every variant's `Display` text is part of Monkey's observable error
//! contract (see the evaluator tests); the literal formats are not free
//! to change.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("identifier not found: {name}")]
    IdentifierNotFound { name: String },

    #[error("unknown operator: {operator}{right}")]
    UnknownPrefixOperator { operator: String, right: String },

    #[error("unknown operator: {left} {operator} {right}")]
    UnknownInfixOperator {
        left: String,
        operator: String,
        right: String,
    },

    #[error("type mismatch: {left} {operator} {right}")]
    TypeMismatch {
        left: String,
        operator: String,
        right: String,
    },

    #[error("not a function: {type_name}")]
    NotAFunction { type_name: String },

    #[error("index operator not supported: {type_name}")]
    IndexNotSupported { type_name: String },

    #[error("unusable as hash key: {type_name}")]
    UnusableHashKey { type_name: String },

    #[error("argument to `{name}` not supported, got {type_name}")]
    ArgumentNotSupported { name: String, type_name: String },

    #[error("wrong number of arguments. got={got}, want={want}")]
    WrongArgumentCount { got: usize, want: String },

    #[error("division by zero")]
    DivisionByZero,
}
