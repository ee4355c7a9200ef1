// ABOUTME: Tree-walking evaluator: AST + Environment -> Object.
//! Tree-walking evaluator: AST + Environment -> Object.

use crate::ast::{BlockStatement, Expression, Program, Statement};
use crate::env::Environment;
use crate::error::EvalError;
use crate::object::{bool_obj, identity_eq, is_truthy, null_obj, Object};
use std::rc::Rc;

fn err(e: EvalError) -> Object {
    Object::Error(e.to_string())
}

/// True iff `obj` is an `Object::Error`. Every recursive eval site checks
/// this after each sub-evaluation and short-circuits before using the
/// result further.
pub fn is_error(obj: &Object) -> bool {
    obj.is_error()
}

pub fn eval_program(program: &Program, env: &Rc<Environment>) -> Object {
    let mut result = null_obj();
    for stmt in &program.statements {
        result = eval_statement(stmt, env);
        match result {
            Object::ReturnValue(inner) => return *inner,
            Object::Error(_) => return result,
            _ => {}
        }
    }
    result
}

fn eval_block(block: &BlockStatement, env: &Rc<Environment>) -> Object {
    let mut result = null_obj();
    for stmt in &block.statements {
        result = eval_statement(stmt, env);
        if matches!(result, Object::ReturnValue(_) | Object::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Rc<Environment>) -> Object {
    match stmt {
        Statement::Let { name, value } => {
            let evaluated = eval_expression(value, env);
            if is_error(&evaluated) {
                return evaluated;
            }
            env.set(&name.name, evaluated);
            null_obj()
        }
        Statement::Return { value } => {
            let evaluated = eval_expression(value, env);
            if is_error(&evaluated) {
                return evaluated;
            }
            Object::ReturnValue(Box::new(evaluated))
        }
        Statement::Expression { expr } => eval_expression(expr, env),
        Statement::Block(block) => eval_block(block, env),
    }
}

pub fn eval_expression(expr: &Expression, env: &Rc<Environment>) -> Object {
    match expr {
        Expression::IntegerLiteral(value) => Object::Integer(*value),
        Expression::BooleanLiteral(value) => bool_obj(*value),
        Expression::StringLiteral(value) => Object::String(value.clone()),
        Expression::Identifier(ident) => eval_identifier(&ident.name, env),
        Expression::Prefix { operator, right } => {
            let right_val = eval_expression(right, env);
            if is_error(&right_val) {
                return right_val;
            }
            eval_prefix_expression(operator, &right_val)
        }
        Expression::Infix {
            left,
            operator,
            right,
        } => {
            let left_val = eval_expression(left, env);
            if is_error(&left_val) {
                return left_val;
            }
            let right_val = eval_expression(right, env);
            if is_error(&right_val) {
                return right_val;
            }
            eval_infix_expression(operator, &left_val, &right_val)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
        } => eval_if_expression(condition, consequence, alternative.as_ref(), env),
        Expression::FunctionLiteral { params, body } => Object::Function {
            params: params.clone(),
            body: body.clone(),
            env: env.clone(),
        },
        Expression::MacroLiteral { params, body } => Object::Macro {
            params: params.clone(),
            body: body.clone(),
            env: env.clone(),
        },
        Expression::Call { function, args } => {
            if let Expression::Identifier(ident) = function.as_ref() {
                if ident.name == "quote" {
                    if args.len() != 1 {
                        return err(EvalError::WrongArgumentCount {
                            got: args.len(),
                            want: "1".to_string(),
                        });
                    }
                    return crate::macros::quote(&args[0], env);
                }
            }
            let func = eval_expression(function, env);
            if is_error(&func) {
                return func;
            }
            let arg_values = eval_expressions(args, env);
            if arg_values.len() == 1 && is_error(&arg_values[0]) {
                return arg_values.into_iter().next().unwrap();
            }
            apply_function(&func, &arg_values)
        }
        Expression::ArrayLiteral(elements) => {
            let values = eval_expressions(elements, env);
            if values.len() == 1 && is_error(&values[0]) {
                return values.into_iter().next().unwrap();
            }
            Object::Array(values)
        }
        Expression::HashLiteral(pairs) => eval_hash_literal(pairs, env),
        Expression::Index { left, index } => {
            let left_val = eval_expression(left, env);
            if is_error(&left_val) {
                return left_val;
            }
            let index_val = eval_expression(index, env);
            if is_error(&index_val) {
                return index_val;
            }
            eval_index_expression(&left_val, &index_val)
        }
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Object {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(builtin) = lookup_builtin(name) {
        return builtin;
    }
    err(EvalError::IdentifierNotFound {
        name: name.to_string(),
    })
}

fn eval_expressions(exprs: &[Expression], env: &Rc<Environment>) -> Vec<Object> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if is_error(&value) {
            return vec![value];
        }
        result.push(value);
    }
    result
}

fn eval_prefix_expression(operator: &str, right: &Object) -> Object {
    match operator {
        "!" => bool_obj(!is_truthy(right)),
        "-" => match right {
            Object::Integer(n) => Object::Integer(-n),
            other => err(EvalError::UnknownPrefixOperator {
                operator: "-".to_string(),
                right: other.type_name().to_string(),
            }),
        },
        other => err(EvalError::UnknownPrefixOperator {
            operator: other.to_string(),
            right: right.type_name().to_string(),
        }),
    }
}

fn eval_infix_expression(operator: &str, left: &Object, right: &Object) -> Object {
    match (left, right) {
        (Object::Integer(l), Object::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Object::String(l), Object::String(r)) => eval_string_infix(operator, l, r),
        _ if left.type_name() != right.type_name() => err(EvalError::TypeMismatch {
            left: left.type_name().to_string(),
            operator: operator.to_string(),
            right: right.type_name().to_string(),
        }),
        _ if operator == "==" => bool_obj(identity_eq(left, right)),
        _ if operator == "!=" => bool_obj(!identity_eq(left, right)),
        _ => err(EvalError::UnknownInfixOperator {
            left: left.type_name().to_string(),
            operator: operator.to_string(),
            right: right.type_name().to_string(),
        }),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Object {
    match operator {
        "+" => Object::Integer(left + right),
        "-" => Object::Integer(left - right),
        "*" => Object::Integer(left * right),
        "/" => {
            if right == 0 {
                err(EvalError::DivisionByZero)
            } else {
                Object::Integer(left / right)
            }
        }
        "<" => bool_obj(left < right),
        ">" => bool_obj(left > right),
        "==" => bool_obj(left == right),
        "!=" => bool_obj(left != right),
        other => err(EvalError::UnknownInfixOperator {
            left: "INTEGER".to_string(),
            operator: other.to_string(),
            right: "INTEGER".to_string(),
        }),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Object {
    if operator == "+" {
        Object::String(format!("{}{}", left, right))
    } else {
        err(EvalError::UnknownInfixOperator {
            left: "STRING".to_string(),
            operator: operator.to_string(),
            right: "STRING".to_string(),
        })
    }
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Rc<Environment>,
) -> Object {
    let cond_val = eval_expression(condition, env);
    if is_error(&cond_val) {
        return cond_val;
    }
    if is_truthy(&cond_val) {
        eval_block(consequence, env)
    } else if let Some(alt) = alternative {
        eval_block(alt, env)
    } else {
        null_obj()
    }
}

fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &Rc<Environment>) -> Object {
    let mut map = std::collections::HashMap::new();
    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env);
        if is_error(&key) {
            return key;
        }
        let Some(hash_key) = key.hash_key() else {
            return err(EvalError::UnusableHashKey {
                type_name: key.type_name().to_string(),
            });
        };
        let value = eval_expression(value_expr, env);
        if is_error(&value) {
            return value;
        }
        map.insert(hash_key, (key, value));
    }
    Object::Hash(map)
}

fn eval_index_expression(left: &Object, index: &Object) -> Object {
    match (left, index) {
        (Object::Array(elements), Object::Integer(i)) => {
            if *i < 0 || *i as usize >= elements.len() {
                null_obj()
            } else {
                elements[*i as usize].clone()
            }
        }
        (Object::Hash(map), key) => {
            let Some(hash_key) = key.hash_key() else {
                return err(EvalError::UnusableHashKey {
                    type_name: key.type_name().to_string(),
                });
            };
            map.get(&hash_key)
                .map(|(_, v)| v.clone())
                .unwrap_or_else(null_obj)
        }
        _ => err(EvalError::IndexNotSupported {
            type_name: left.type_name().to_string(),
        }),
    }
}

fn apply_function(func: &Object, args: &[Object]) -> Object {
    match func {
        Object::Function { params, body, env } => {
            if params.len() != args.len() {
                return err(EvalError::WrongArgumentCount {
                    got: args.len(),
                    want: params.len().to_string(),
                });
            }
            let call_env = Environment::with_outer(env.clone());
            for (param, arg) in params.iter().zip(args.iter()) {
                call_env.set(&param.name, arg.clone());
            }
            let result = eval_block(body, &call_env);
            match result {
                Object::ReturnValue(inner) => *inner,
                other => other,
            }
        }
        Object::Builtin(func) => func(args),
        other => err(EvalError::NotAFunction {
            type_name: other.type_name().to_string(),
        }),
    }
}

fn lookup_builtin(name: &str) -> Option<Object> {
    let func: crate::object::BuiltinFn = match name {
        "len" => builtin_len,
        "first" => builtin_first,
        "last" => builtin_last,
        "rest" => builtin_rest,
        "push" => builtin_push,
        "pop" => builtin_pop,
        "puts" => builtin_puts,
        _ => return None,
    };
    Some(Object::Builtin(func))
}

fn builtin_len(args: &[Object]) -> Object {
    if args.len() != 1 {
        return err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: "1".to_string(),
        });
    }
    match &args[0] {
        Object::String(s) => Object::Integer(s.len() as i64),
        Object::Array(elements) => Object::Integer(elements.len() as i64),
        other => err(EvalError::ArgumentNotSupported {
            name: "len".to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}

fn builtin_first(args: &[Object]) -> Object {
    if args.len() != 1 {
        return err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: "1".to_string(),
        });
    }
    match &args[0] {
        Object::Array(elements) => elements.first().cloned().unwrap_or_else(null_obj),
        other => err(EvalError::ArgumentNotSupported {
            name: "first".to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}

fn builtin_last(args: &[Object]) -> Object {
    if args.len() != 1 {
        return err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: "1".to_string(),
        });
    }
    match &args[0] {
        Object::Array(elements) => elements.last().cloned().unwrap_or_else(null_obj),
        other => err(EvalError::ArgumentNotSupported {
            name: "last".to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}

fn builtin_rest(args: &[Object]) -> Object {
    if args.len() != 1 {
        return err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: "1".to_string(),
        });
    }
    match &args[0] {
        Object::Array(elements) => {
            if elements.is_empty() {
                null_obj()
            } else {
                Object::Array(elements[1..].to_vec())
            }
        }
        other => err(EvalError::ArgumentNotSupported {
            name: "rest".to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}

fn builtin_push(args: &[Object]) -> Object {
    if args.len() != 2 {
        return err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: "2".to_string(),
        });
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut new_elements = elements.clone();
            new_elements.push(args[1].clone());
            Object::Array(new_elements)
        }
        other => err(EvalError::ArgumentNotSupported {
            name: "push".to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}

fn builtin_pop(args: &[Object]) -> Object {
    if args.len() != 1 {
        return err(EvalError::WrongArgumentCount {
            got: args.len(),
            want: "1".to_string(),
        });
    }
    match &args[0] {
        Object::Array(elements) => {
            let mut new_elements = elements.clone();
            new_elements.pop();
            Object::Array(new_elements)
        }
        other => err(EvalError::ArgumentNotSupported {
            name: "pop".to_string(),
            type_name: other.type_name().to_string(),
        }),
    }
}

fn builtin_puts(args: &[Object]) -> Object {
    for arg in args {
        println!("{}", arg.inspect());
    }
    null_obj()
}
