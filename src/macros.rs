// ABOUTME: Macro subsystem: define_macros / expand_macros / quote / unquote.
//! Macro subsystem: define_macros / expand_macros / quote / unquote.

use crate::ast::{modify_expression, modify_program, Expression, Program, Statement};
use crate::env::Environment;
use crate::eval::eval_expression;
use crate::object::Object;
use std::rc::Rc;

/// Collects every top-level `let name = macro(...) {...}` statement,
/// registers a `Macro` object for each under `env`, and removes those
/// statements from the program so later evaluation never sees them.
/// Nested macro definitions are not discovered, matching the source's own
/// limitation.
pub fn define_macros(program: &mut Program, env: &Rc<Environment>) {
    let mut macro_indices = Vec::new();

    for (i, stmt) in program.statements.iter().enumerate() {
        if let Statement::Let {
            name,
            value: Expression::MacroLiteral { params, body },
        } = stmt
        {
            let macro_obj = Object::Macro {
                params: params.clone(),
                body: body.clone(),
                env: env.clone(),
            };
            env.set(&name.name, macro_obj);
            macro_indices.push(i);
        }
    }

    for &i in macro_indices.iter().rev() {
        program.statements.remove(i);
    }
}

/// Rewrites every macro call site in `program` with the AST its macro body
/// produces, via the generic postorder `modify` walk.
pub fn expand_macros(program: Program, env: &Rc<Environment>) -> Program {
    modify_program(program, &mut |expr| expand_macro_call(expr, env))
}

/// Runs `define_macros` then `expand_macros` against the same environment,
/// matching the REPL's per-line pipeline.
pub fn define_and_expand_macros(mut program: Program, env: &Rc<Environment>) -> Program {
    define_macros(&mut program, env);
    expand_macros(program, env)
}

fn expand_macro_call(expr: Expression, env: &Rc<Environment>) -> Expression {
    let Expression::Call { function, args } = &expr else {
        return expr;
    };
    let Expression::Identifier(ident) = function.as_ref() else {
        return expr;
    };
    let Some(Object::Macro {
        params,
        body,
        env: macro_env,
    }) = env.get(&ident.name)
    else {
        return expr;
    };

    let call_env = Environment::with_outer(macro_env);
    for (param, arg) in params.iter().zip(args.iter()) {
        call_env.set(&param.name, Object::Quote(arg.clone()));
    }

    let evaluated = crate::eval::eval_program(
        &Program {
            statements: body.statements.clone(),
        },
        &call_env,
    );

    match evaluated {
        Object::Quote(node) => node,
        _ => panic!("we only support returning AST-nodes from macros"),
    }
}

/// Implements `quote(expr)`: suppresses evaluation of `expr` and returns its
/// AST wrapped in `Object::Quote`, after substituting any `unquote(...)`
/// subcalls with the AST of their evaluated result.
pub fn quote(expr: &Expression, env: &Rc<Environment>) -> Object {
    let node = modify_expression(expr.clone(), &mut |n| eval_unquote_calls(n, env));
    Object::Quote(node)
}

fn eval_unquote_calls(expr: Expression, env: &Rc<Environment>) -> Expression {
    let Expression::Call { function, args } = &expr else {
        return expr;
    };
    let Expression::Identifier(ident) = function.as_ref() else {
        return expr;
    };
    if ident.name != "unquote" || args.len() != 1 {
        return expr;
    }
    let evaluated = eval_expression(&args[0], env);
    object_to_ast(evaluated)
}

fn object_to_ast(obj: Object) -> Expression {
    match obj {
        Object::Integer(n) => Expression::IntegerLiteral(n),
        Object::Boolean(b) => Expression::BooleanLiteral(*b),
        Object::Quote(node) => node,
        _ => Expression::Identifier(crate::ast::Identifier {
            name: "nil".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(input: &str) -> Object {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        let env = Environment::new();
        let expanded = define_and_expand_macros(program, &env);
        crate::eval::eval_program(&expanded, &env)
    }

    #[test]
    fn quote_returns_unevaluated_ast() {
        let result = run("quote(5 + 5)");
        match result {
            Object::Quote(node) => assert_eq!(node.to_string(), "(5 + 5)"),
            other => panic!("expected Quote, got {:?}", other),
        }
    }

    #[test]
    fn unquote_splices_evaluated_value() {
        let result = run("quote(unquote(1 + 2))");
        match result {
            Object::Quote(node) => assert_eq!(node.to_string(), "3"),
            other => panic!("expected Quote, got {:?}", other),
        }
    }

    #[test]
    fn define_macros_removes_macro_let_statements() {
        let (mut program, errors) = parse("let number = 1; let double = macro(x) { quote(unquote(x) * 2); };");
        assert!(errors.is_empty());
        let env = Environment::new();
        define_macros(&mut program, &env);
        assert_eq!(program.statements.len(), 1);
        assert!(env.get("double").is_some());
    }

    #[test]
    fn unless_macro_prints_alternative() {
        let result = run(
            r#"
            let unless = macro(cond, conseq, alt) {
                quote(if (!(unquote(cond))) {
                    unquote(conseq);
                } else {
                    unquote(alt);
                });
            };
            unless(10 > 5, puts("not greater"), puts("greater"));
            "#,
        );
        assert!(matches!(result, Object::Null(_)));
    }
}
