//! Expression parsing.
//!
//! Precedence ladder, lowest to highest:
//!
//! | Level | Operators | Associativity |
//! |-------|---------------------------|---------------|
//! | 1 | `=`, `+=`, `-=` | Right |
//! | 2 | `?:` | Ternary |
//! | 3 | `and`, `or` | Left |
//! | 4 | `==`, `!=` | Left |
//! | 5 | `<`, `<=`, `>`, `>=` | Left |
//! | 6 | `+`, `-` | Left |
//! | 7 | `*`, `/` | Left |
//! | 8 | `!`, `-` (unary) | Prefix |
//! | 9 | call `()`, attribute `.` | Postfix |
//!
//! Compound assignment desugars in the parser: `x += e` becomes
//! `x = (x += e)` as a `Binary` node that preserves the `+=` operator
//! token, so the evaluator still dispatches on the compound kind.

use ember_lex::TokenKind;

use crate::ast::*;
use crate::{ParseError, Parser};

impl Parser {
    pub(crate) fn expression(&mut self) -> Result<Expr, ParseError> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.conditional()?;
        if self.match_any(&[
            TokenKind::Equal,
            TokenKind::PlusEqual,
            TokenKind::MinusEqual,
        ]) {
            let op = self.previous().clone();
            let mut value = self.assignment()?;
            if op.kind != TokenKind::Equal {
                value = Expr::Binary(BinaryExpr {
                    left: Box::new(expr.clone()),
                    op: op.clone(),
                    right: Box::new(value),
                });
            }
            return match expr {
                Expr::Variable(name) => Ok(Expr::Assign(AssignExpr {
                    name,
                    value: Box::new(value),
                })),
                Expr::GetAttr(get) => Ok(Expr::SetAttr(SetAttrExpr {
                    object: get.object,
                    name: get.name,
                    value: Box::new(value),
                })),
                _ => Err(self.error_at(&op, "Invalid assignment target.")),
            };
        }
        Ok(expr)
    }

    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let expr = self.logical()?;
        if self.match_kind(TokenKind::Question) {
            let then_branch = self.logical()?;
            self.consume(TokenKind::Colon, "Expected ':' after '?'.")?;
            let else_branch = self.logical()?;
            return Ok(Expr::Conditional(ConditionalExpr {
                cond: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            }));
        }
        Ok(expr)
    }

    fn logical(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;
        while self.match_any(&[TokenKind::And, TokenKind::Or]) {
            let op = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparative()?;
        while self.match_any(&[TokenKind::BangEqual, TokenKind::EqualEqual]) {
            let op = self.previous().clone();
            let right = self.comparative()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn comparative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.additive()?;
        while self.match_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ]) {
            let op = self.previous().clone();
            let right = self.additive()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.multiplicative()?;
        while self.match_any(&[TokenKind::Minus, TokenKind::Plus]) {
            let op = self.previous().clone();
            let right = self.multiplicative()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;
        while self.match_any(&[TokenKind::Slash, TokenKind::Star]) {
            let op = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryExpr {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            });
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.match_any(&[TokenKind::Bang, TokenKind::Minus]) {
            let op = self.previous().clone();
            let operand = self.unary()?;
            return Ok(Expr::Unary(UnaryExpr {
                op,
                operand: Box::new(operand),
            }));
        }
        self.call()
    }

    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        loop {
            if self.match_kind(TokenKind::LeftParen) {
                expr = self.finish_call(expr)?;
            } else if self.match_kind(TokenKind::Dot) {
                let name = self.consume(
                    TokenKind::Identifier,
                    "Expected property name after '.'.",
                )?;
                expr = Expr::GetAttr(GetAttrExpr {
                    object: Box::new(expr),
                    name,
                });
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let paren = self.previous().clone();
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RightParen, "Expected ')' after arguments.")?;
        Ok(Expr::Call(CallExpr {
            callee: Box::new(callee),
            paren,
            args,
        }))
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        if self.match_kind(TokenKind::SelfKw) {
            return Ok(Expr::SelfRef(self.previous().clone()));
        }
        if self.match_kind(TokenKind::Super) {
            let super_token = self.previous().clone();
            self.consume(TokenKind::Dot, "Expected '.' after 'super'.")?;
            let attr = self.consume(
                TokenKind::Identifier,
                "Expected superclass method name.",
            )?;
            return Ok(Expr::Super(SuperExpr { super_token, attr }));
        }
        if self.match_kind(TokenKind::True) {
            return Ok(self.literal(Lit::Bool(true)));
        }
        if self.match_kind(TokenKind::False) {
            return Ok(self.literal(Lit::Bool(false)));
        }
        if self.match_kind(TokenKind::Null) {
            return Ok(self.literal(Lit::Null));
        }
        if self.match_kind(TokenKind::Number) {
            let token = self.previous().clone();
            let value = token
                .lexeme
                .parse::<f64>()
                .map_err(|_| self.error_at(&token, "Invalid number literal."))?;
            return Ok(Expr::Literal(LiteralExpr {
                token,
                value: Lit::Number(value),
            }));
        }
        if self.match_kind(TokenKind::String) {
            let token = self.previous().clone();
            // Strip the surrounding quotes; no escape processing.
            let inner = token.lexeme[1..token.lexeme.len() - 1].to_string();
            return Ok(Expr::Literal(LiteralExpr {
                token,
                value: Lit::Str(inner),
            }));
        }
        if self.match_kind(TokenKind::Identifier) {
            return Ok(Expr::Variable(self.previous().clone()));
        }
        if self.match_kind(TokenKind::LeftParen) {
            let expr = self.expression()?;
            self.consume(TokenKind::RightParen, "Expected ')' after expression.")?;
            return Ok(Expr::Grouping(Box::new(expr)));
        }
        Err(self.error("Invalid token. Expected an expression."))
    }

    fn literal(&self, value: Lit) -> Expr {
        Expr::Literal(LiteralExpr {
            token: self.previous().clone(),
            value,
        })
    }
}
