// ABOUTME: Pratt (precedence-climbing) parser turning a token stream into an AST.
//! Pratt (precedence-climbing) parser turning a token stream into an AST.

use crate::ast::{BlockStatement, Expression, Identifier, Program, Statement};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Slash | TokenKind::Asterisk => Precedence::Product,
        TokenKind::Lparen => Precedence::Call,
        TokenKind::Lbracket => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

type PrefixParseFn = fn(&mut Parser) -> Option<Expression>;
type InfixParseFn = fn(&mut Parser, Expression) -> Option<Expression>;

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
    prefix_fns: HashMap<TokenKind, PrefixParseFn>,
    infix_fns: HashMap<TokenKind, InfixParseFn>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();

        let mut prefix_fns: HashMap<TokenKind, PrefixParseFn> = HashMap::new();
        prefix_fns.insert(TokenKind::Ident, Parser::parse_identifier);
        prefix_fns.insert(TokenKind::Int, Parser::parse_integer_literal);
        prefix_fns.insert(TokenKind::String, Parser::parse_string_literal);
        prefix_fns.insert(TokenKind::True, Parser::parse_boolean_literal);
        prefix_fns.insert(TokenKind::False, Parser::parse_boolean_literal);
        prefix_fns.insert(TokenKind::Bang, Parser::parse_prefix_expression);
        prefix_fns.insert(TokenKind::Minus, Parser::parse_prefix_expression);
        prefix_fns.insert(TokenKind::Lparen, Parser::parse_grouped_expression);
        prefix_fns.insert(TokenKind::If, Parser::parse_if_expression);
        prefix_fns.insert(TokenKind::Function, Parser::parse_function_literal);
        prefix_fns.insert(TokenKind::Macro, Parser::parse_macro_literal);
        prefix_fns.insert(TokenKind::Lbracket, Parser::parse_array_literal);
        prefix_fns.insert(TokenKind::Lbrace, Parser::parse_hash_literal);

        let mut infix_fns: HashMap<TokenKind, InfixParseFn> = HashMap::new();
        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Slash,
            TokenKind::Asterisk,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
        ] {
            infix_fns.insert(kind, Parser::parse_infix_expression);
        }
        infix_fns.insert(TokenKind::Lparen, Parser::parse_call_expression);
        infix_fns.insert(TokenKind::Lbracket, Parser::parse_index_expression);

        Parser {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
            prefix_fns,
            infix_fns,
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.cur_token, &mut self.peek_token);
        self.peek_token = self.lexer.next_token();
    }

    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token.kind == kind {
            self.next_token();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {:?}, got {:?} instead.",
                kind, self.peek_token.kind
            ));
            false
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while self.cur_token.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                program.statements.push(stmt);
            }
            self.next_token();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier {
            name: self.cur_token.literal.clone(),
        };
        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Statement::Let { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Statement::Return { value })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek_token.kind == TokenKind::Semicolon {
            self.next_token();
        }
        Some(Statement::Expression { expr })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let prefix = self.prefix_fns.get(&self.cur_token.kind).copied();
        let Some(prefix) = prefix else {
            self.errors.push(format!(
                "no prefix parse function for {:?} found.",
                self.cur_token.kind
            ));
            return None;
        };
        let mut left = prefix(self)?;

        while self.peek_token.kind != TokenKind::Semicolon
            && precedence < precedence_of(self.peek_token.kind)
        {
            let infix = self.infix_fns.get(&self.peek_token.kind).copied();
            let Some(infix) = infix else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier {
            name: self.cur_token.literal.clone(),
        }))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.errors.push(format!(
                    "could not parse {:?} as integer",
                    self.cur_token.literal
                ));
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::StringLiteral(self.cur_token.literal.clone()))
    }

    fn parse_boolean_literal(&mut self) -> Option<Expression> {
        Some(Expression::BooleanLiteral(
            self.cur_token.kind == TokenKind::True,
        ))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = self.cur_token.literal.clone();
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix {
            operator,
            right: Box::new(right),
        })
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = self.cur_token.literal.clone();
        let precedence = precedence_of(self.cur_token.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        Some(expr)
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.next_token();
        while self.cur_token.kind != TokenKind::Rbrace && self.cur_token.kind != TokenKind::Eof {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        BlockStatement { statements }
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let alternative = if self.peek_token.kind == TokenKind::Else {
            self.next_token();
            if !self.expect_peek(TokenKind::Lbrace) {
                return None;
            }
            Some(self.parse_block_statement())
        } else {
            None
        };

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_params(&mut self) -> Option<Vec<Identifier>> {
        let mut params = Vec::new();
        if self.peek_token.kind == TokenKind::Rparen {
            self.next_token();
            return Some(params);
        }
        self.next_token();
        params.push(Identifier {
            name: self.cur_token.literal.clone(),
        });
        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            params.push(Identifier {
                name: self.cur_token.literal.clone(),
            });
        }
        if !self.expect_peek(TokenKind::Rparen) {
            return None;
        }
        Some(params)
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        let params = self.parse_function_params()?;
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::FunctionLiteral { params, body })
    }

    fn parse_macro_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::Lparen) {
            return None;
        }
        let params = self.parse_function_params()?;
        if !self.expect_peek(TokenKind::Lbrace) {
            return None;
        }
        let body = self.parse_block_statement();
        Some(Expression::MacroLiteral { params, body })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_token.kind == end {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_token.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(end) {
            return None;
        }
        Some(list)
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        let args = self.parse_expression_list(TokenKind::Rparen)?;
        Some(Expression::Call {
            function: Box::new(function),
            args,
        })
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let elements = self.parse_expression_list(TokenKind::Rbracket)?;
        Some(Expression::ArrayLiteral(elements))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Rbracket) {
            return None;
        }
        Some(Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let mut pairs = Vec::new();
        while self.peek_token.kind != TokenKind::Rbrace {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            if !self.expect_peek(TokenKind::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if self.peek_token.kind != TokenKind::Rbrace && !self.expect_peek(TokenKind::Comma) {
                return None;
            }
        }
        if !self.expect_peek(TokenKind::Rbrace) {
            return None;
        }
        Some(Expression::HashLiteral(pairs))
    }
}

pub fn parse(input: &str) -> (Program, Vec<String>) {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    (program, parser.errors().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Program {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "parser errors: {:?}", errors);
        program
    }

    #[test]
    fn let_statements() {
        let program = parse_ok("let x = 5; let y = true; let foobar = y;");
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn operator_precedence_round_trips() {
        let cases = [
            ("-a * b", "((-a) * b)"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("!-a", "(!(-a))"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d)",
            ),
        ];
        for (input, expected) in cases {
            let program = parse_ok(input);
            assert_eq!(program.to_string(), expected);
        }
    }

    #[test]
    fn display_is_a_fixed_point() {
        let input = "a + b * c + d / e - f";
        let first = parse_ok(input).to_string();
        let second = parse_ok(&first).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn if_else_expression() {
        let program = parse_ok("if (x < y) { x } else { y }");
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn function_literal_params() {
        let program = parse_ok("fn(x, y) { x + y; }");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::FunctionLiteral { params, .. },
            } => assert_eq!(params.len(), 2),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn hash_literal_string_keys() {
        let program = parse_ok(r#"{"one": 1, "two": 2}"#);
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::HashLiteral(pairs),
            } => assert_eq!(pairs.len(), 2),
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn missing_token_records_error() {
        let (_, errors) = parse("let x 5;");
        assert!(!errors.is_empty());
        assert!(errors[0].contains("expected next token to be"));
    }

    #[test]
    fn macro_literal() {
        let program = parse_ok("macro(x, y) { x + y; }");
        match &program.statements[0] {
            Statement::Expression {
                expr: Expression::MacroLiteral { params, .. },
            } => assert_eq!(params.len(), 2),
            other => panic!("unexpected statement: {:?}", other),
        }
    }
}
