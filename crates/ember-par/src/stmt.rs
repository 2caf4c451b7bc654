//! Declaration and statement parsing.

use std::rc::Rc;

use ember_lex::{Token, TokenKind};

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    /// Parse a declaration, falling through to plain statements.
    ///
    /// `var`, `def`, and `class` declarations are accepted anywhere a
    /// statement is, including the top level and inside blocks (nested
    /// functions are how closures are made).
    pub(crate) fn declaration(&mut self) -> Result<Stmt, ParseError> {
        if self.match_kind(TokenKind::Var) {
            return Ok(Stmt::VarDecl(self.variable_declaration()?));
        }
        if self.match_kind(TokenKind::Def) {
            return Ok(Stmt::Function(Rc::new(self.function_declaration("function")?)));
        }
        if self.match_kind(TokenKind::Class) {
            return self.class_declaration();
        }
        self.statement()
    }

    /// Parse a variable declaration; the `var` keyword has been consumed.
    fn variable_declaration(&mut self) -> Result<VarDecl, ParseError> {
        let name = self.consume(
            TokenKind::Identifier,
            "Expected a variable name after 'var'.",
        )?;
        let initializer = if self.match_kind(TokenKind::Equal) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(
            TokenKind::Semicolon,
            "Expected ';' after a variable declaration.",
        )?;
        Ok(VarDecl { name, initializer })
    }

    /// Parse a function declaration; the `def` keyword has been consumed.
    ///
    /// `kind` is "function" or "method" and only affects error messages.
    fn function_declaration(&mut self, kind: &str) -> Result<FunctionDecl, ParseError> {
        let name = self.consume(
            TokenKind::Identifier,
            &format!("Expected {kind} name."),
        )?;
        self.consume(
            TokenKind::LeftParen,
            &format!("Expected '(' after {kind} name."),
        )?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                params.push(
                    self.consume(TokenKind::Identifier, "Expected parameter name.")?,
                );
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after parameters.")?;
        self.consume(
            TokenKind::LeftBrace,
            &format!("Expected '{{' before {kind} body."),
        )?;
        let body = self.block()?;
        Ok(FunctionDecl { name, params, body })
    }

    /// Parse a class declaration; the `class` keyword has been consumed.
    ///
    /// The body permits only `var` field declarations and `def` method
    /// declarations.
    fn class_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.consume(TokenKind::Identifier, "Expected class name.")?;
        let superclass = if self.match_kind(TokenKind::Less) {
            Some(self.consume(TokenKind::Identifier, "Expected superclass name.")?)
        } else {
            None
        };
        self.consume(TokenKind::LeftBrace, "Expected '{' before class body.")?;

        let mut methods = Vec::new();
        let mut fields = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.match_kind(TokenKind::Var) {
                fields.push(self.variable_declaration()?);
            } else if self.match_kind(TokenKind::Def) {
                methods.push(Rc::new(self.function_declaration("method")?));
            } else {
                return Err(self.error("Expected a method or variable declaration."));
            }
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after class body.")?;

        Ok(Stmt::Class(Rc::new(ClassDecl {
            name,
            superclass,
            methods,
            fields,
        })))
    }

    /// Parse the statements of a block; the `{` has been consumed.
    pub(crate) fn block(&mut self) -> Result<Block, ParseError> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }
        self.consume(TokenKind::RightBrace, "Expected '}' after a block.")?;
        Ok(Block { statements })
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.match_kind(TokenKind::LeftBrace) {
            return Ok(Stmt::Block(self.block()?));
        }
        if self.match_kind(TokenKind::Echo) {
            return self.echo_statement();
        }
        if self.match_kind(TokenKind::If) {
            return self.if_statement();
        }
        if self.match_kind(TokenKind::While) {
            return self.while_statement();
        }
        if self.match_kind(TokenKind::For) {
            return self.for_statement();
        }
        if self.match_kind(TokenKind::Break) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Semicolon, "Expected ';' after 'break'.")?;
            return Ok(Stmt::Break(keyword));
        }
        if self.match_kind(TokenKind::Continue) {
            let keyword = self.previous().clone();
            self.consume(TokenKind::Semicolon, "Expected ';' after 'continue'.")?;
            return Ok(Stmt::Continue(keyword));
        }
        if self.match_kind(TokenKind::Return) {
            return self.return_statement();
        }
        self.expression_statement()
    }

    fn echo_statement(&mut self) -> Result<Stmt, ParseError> {
        let mut exprs = Vec::new();
        if !self.check(TokenKind::Semicolon) {
            loop {
                exprs.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::Semicolon, "Expected ';' after 'echo' statement.")?;
        Ok(Stmt::Echo(EchoStmt { exprs }))
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        let cond = self.expression()?;
        self.consume(TokenKind::LeftBrace, "Expected block after 'if' condition.")?;
        let then_block = self.block()?;
        let else_stmt = if self.match_kind(TokenKind::Else) {
            if self.match_kind(TokenKind::If) {
                Some(Box::new(self.if_statement()?))
            } else {
                self.consume(TokenKind::LeftBrace, "Expected block after 'else'.")?;
                Some(Box::new(Stmt::Block(self.block()?)))
            }
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            cond,
            then_block,
            else_stmt,
        }))
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        let cond = self.expression()?;
        self.consume(TokenKind::LeftBrace, "Expected block after 'while'.")?;
        let body = self.block()?;
        Ok(Stmt::While(WhileStmt { cond, body }))
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        let initializer = if self.match_kind(TokenKind::Semicolon) {
            None
        } else if self.match_kind(TokenKind::Var) {
            Some(Box::new(Stmt::VarDecl(self.variable_declaration()?)))
        } else {
            Some(Box::new(self.expression_statement()?))
        };

        // An omitted condition becomes a literal true.
        let cond = if self.check(TokenKind::Semicolon) {
            let line = self.peek().line;
            Expr::Literal(LiteralExpr {
                token: Token::new(TokenKind::True, "true", line),
                value: Lit::Bool(true),
            })
        } else {
            self.expression()?
        };
        self.consume(TokenKind::Semicolon, "Expected ';' after loop condition.")?;

        let increment = if self.check(TokenKind::LeftBrace) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(TokenKind::LeftBrace, "Expected block after 'for'.")?;
        let body = self.block()?;

        Ok(Stmt::For(ForStmt {
            initializer,
            cond,
            increment,
            body,
        }))
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.previous().clone();
        if self.match_kind(TokenKind::Semicolon) {
            return Ok(Stmt::Return(ReturnStmt {
                keyword,
                value: None,
            }));
        }
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after return value.")?;
        Ok(Stmt::Return(ReturnStmt {
            keyword,
            value: Some(value),
        }))
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expected ';' after expression.")?;
        Ok(Stmt::Expr(expr))
    }
}
