// ABOUTME: Abstract syntax tree for Monkey programs, plus the generic
// ABOUTME: `modify` postorder rewrite used by the macro subsystem.
//! Abstract syntax tree for Monkey programs, plus the generic `modify`
//! postorder rewrite used by the macro subsystem (see `crate::macros`).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let {
        name: Identifier,
        value: Expression,
    },
    Return {
        value: Expression,
    },
    Expression {
        expr: Expression,
    },
    Block(BlockStatement),
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),
            Statement::Return { value } => write!(f, "return {};", value),
            Statement::Expression { expr } => write!(f, "{}", expr),
            Statement::Block(block) => write!(f, "{}", block),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    ArrayLiteral(Vec<Expression>),
    HashLiteral(Vec<(Expression, Expression)>),
    Prefix {
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        left: Box<Expression>,
        operator: String,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    FunctionLiteral {
        params: Vec<Identifier>,
        body: BlockStatement,
    },
    MacroLiteral {
        params: Vec<Identifier>,
        body: BlockStatement,
    },
    Call {
        function: Box<Expression>,
        args: Vec<Expression>,
    },
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{}", ident),
            Expression::IntegerLiteral(value) => write!(f, "{}", value),
            Expression::BooleanLiteral(value) => write!(f, "{}", value),
            Expression::StringLiteral(value) => write!(f, "{}", value),
            Expression::ArrayLiteral(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Expression::HashLiteral(pairs) => {
                let items: Vec<String> =
                    pairs.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
                write!(f, "{{{}}}", items.join(", "))
            }
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expression::Infix {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{} {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, "else {}", alt)?;
                }
                Ok(())
            }
            Expression::FunctionLiteral { params, body } => {
                let names: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "fn({}) {}", names.join(", "), body)
            }
            Expression::MacroLiteral { params, body } => {
                let names: Vec<String> = params.iter().map(|p| p.to_string()).collect();
                write!(f, "macro({}) {}", names.join(", "), body)
            }
            Expression::Call { function, args } => {
                let items: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", function, items.join(", "))
            }
            Expression::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

/// Generic postorder rewrite over every expression node in a program.
///
/// Used by macro expansion and by `quote`'s `unquote` splicing (see
/// `crate::macros`). Children are rewritten before their parent, and the
/// parent's own rewritten form is produced by calling `f` on it.
pub fn modify_program(mut program: Program, f: &mut dyn FnMut(Expression) -> Expression) -> Program {
    program.statements = program
        .statements
        .into_iter()
        .map(|stmt| modify_statement(stmt, f))
        .collect();
    program
}

fn modify_statement(stmt: Statement, f: &mut dyn FnMut(Expression) -> Expression) -> Statement {
    match stmt {
        Statement::Let { name, value } => Statement::Let {
            name,
            value: modify_expression(value, f),
        },
        Statement::Return { value } => Statement::Return {
            value: modify_expression(value, f),
        },
        Statement::Expression { expr } => Statement::Expression {
            expr: modify_expression(expr, f),
        },
        Statement::Block(block) => Statement::Block(modify_block(block, f)),
    }
}

fn modify_block(block: BlockStatement, f: &mut dyn FnMut(Expression) -> Expression) -> BlockStatement {
    BlockStatement {
        statements: block
            .statements
            .into_iter()
            .map(|stmt| modify_statement(stmt, f))
            .collect(),
    }
}

pub fn modify_expression(expr: Expression, f: &mut dyn FnMut(Expression) -> Expression) -> Expression {
    let rewritten = match expr {
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(modify_expression(*right, f)),
        },
        Expression::Infix {
            left,
            operator,
            right,
        } => Expression::Infix {
            left: Box::new(modify_expression(*left, f)),
            operator,
            right: Box::new(modify_expression(*right, f)),
        },
        Expression::Index { left, index } => Expression::Index {
            left: Box::new(modify_expression(*left, f)),
            index: Box::new(modify_expression(*index, f)),
        },
        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: Box::new(modify_expression(*condition, f)),
            consequence: modify_block(consequence, f),
            alternative: alternative.map(|alt| modify_block(alt, f)),
        },
        Expression::FunctionLiteral { params, body } => Expression::FunctionLiteral {
            params,
            body: modify_block(body, f),
        },
        Expression::ArrayLiteral(elements) => Expression::ArrayLiteral(
            elements
                .into_iter()
                .map(|e| modify_expression(e, f))
                .collect(),
        ),
        Expression::HashLiteral(pairs) => Expression::HashLiteral(
            pairs
                .into_iter()
                .map(|(k, v)| (modify_expression(k, f), modify_expression(v, f)))
                .collect(),
        ),
        Expression::Call { function, args } => Expression::Call {
            function: Box::new(modify_expression(*function, f)),
            args: args.into_iter().map(|a| modify_expression(a, f)).collect(),
        },
        leaf => leaf,
    };
    f(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_let_statement() {
        let stmt = Statement::Let {
            name: Identifier {
                name: "x".to_string(),
            },
            value: Expression::IntegerLiteral(5),
        };
        assert_eq!(stmt.to_string(), "let x = 5;");
    }

    #[test]
    fn display_infix_expression() {
        let expr = Expression::Infix {
            left: Box::new(Expression::IntegerLiteral(1)),
            operator: "+".to_string(),
            right: Box::new(Expression::IntegerLiteral(2)),
        };
        assert_eq!(expr.to_string(), "(1 + 2)");
    }

    #[test]
    fn modify_doubles_every_integer_literal() {
        let program = Program {
            statements: vec![Statement::Expression {
                expr: Expression::Infix {
                    left: Box::new(Expression::IntegerLiteral(1)),
                    operator: "+".to_string(),
                    right: Box::new(Expression::IntegerLiteral(2)),
                },
            }],
        };
        let doubled = modify_program(program, &mut |expr| match expr {
            Expression::IntegerLiteral(n) => Expression::IntegerLiteral(n * 2),
            other => other,
        });
        assert_eq!(doubled.to_string(), "(2 + 4)");
    }
}
