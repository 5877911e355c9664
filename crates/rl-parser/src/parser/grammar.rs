//! Grammar productions (§4.2):
//!
//! ```text
//! expr     := unary ( 'AND' expr | 'OR' expr )?
//! unary    := '|' pipeBody | '{' funcBody | '(' expr ')'
//! pipeBody := '@'? Ident ( ':' quantity )? '|'
//! quantity := 'ALL' | 'HALF' | Ident ( '%' )?
//! funcBody := Ident '(' Ident ')' '}'
//! ```
//!
//! Every production hands its result straight to the simplifier (§4.3)
//! rather than building raw `And`/`Or` nodes, so a tree is already in
//! canonical form the moment parsing finishes.

use super::Parser;
use crate::error::ParseError;
use crate::simplify;
use crate::token::TokenKind;
use crate::tree::{Node, Tree};

enum Quantity<'a> {
    Count(&'a str),
    Percent(&'a str),
}

impl<'a> Parser<'a> {
    pub(super) fn expr(&mut self) -> Result<Tree<'a>, ParseError> {
        let left = self.unary()?;
        match self.peek().kind {
            TokenKind::And => {
                self.bump();
                let right = self.expr()?;
                Ok(simplify::and(left, right))
            }
            TokenKind::Or => {
                self.bump();
                let right = self.expr()?;
                Ok(simplify::or(left, right))
            }
            _ => Ok(left),
        }
    }

    fn unary(&mut self) -> Result<Tree<'a>, ParseError> {
        match self.peek().kind {
            TokenKind::Pipe => {
                self.bump();
                self.pipe_body()
            }
            TokenKind::LCurly => {
                self.bump();
                self.func_body()
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(simplify::grouping(inner))
            }
            _ => Err(self.unexpected("'|', '{' or '('")),
        }
    }

    fn pipe_body(&mut self) -> Result<Tree<'a>, ParseError> {
        let is_category = if self.peek().kind == TokenKind::At {
            self.bump();
            true
        } else {
            false
        };
        let name = self.expect(TokenKind::Ident, "item or category name")?.text;

        if self.peek().kind == TokenKind::Colon {
            self.bump();
            let quantity = self.quantity()?;
            self.expect(TokenKind::Pipe, "'|'")?;
            let node = match (is_category, quantity) {
                (false, Quantity::Count(n)) => Node::item_count(name, n),
                (true, Quantity::Count(n)) => Node::category_count(name, n),
                (false, Quantity::Percent(p)) => Node::item_percent(name, p),
                (true, Quantity::Percent(p)) => Node::category_percent(name, p),
            };
            Ok(Some(node))
        } else {
            self.expect(TokenKind::Pipe, "'|'")?;
            let node = if is_category {
                Node::category(name)
            } else {
                Node::item(name)
            };
            Ok(Some(node))
        }
    }

    fn quantity(&mut self) -> Result<Quantity<'a>, ParseError> {
        match self.peek().kind {
            TokenKind::All => {
                self.bump();
                Ok(Quantity::Percent("100"))
            }
            TokenKind::Half => {
                self.bump();
                Ok(Quantity::Percent("50"))
            }
            TokenKind::Ident => {
                let tok = self.bump();
                if self.peek().kind == TokenKind::Percent {
                    self.bump();
                    Ok(Quantity::Percent(tok.text))
                } else {
                    Ok(Quantity::Count(tok.text))
                }
            }
            _ => Err(self.unexpected("'ALL', 'HALF' or a quantity")),
        }
    }

    fn func_body(&mut self) -> Result<Tree<'a>, ParseError> {
        let name = self.expect(TokenKind::Ident, "function name")?.text;
        self.expect(TokenKind::LParen, "'('")?;
        let arg = self.expect(TokenKind::Ident, "function argument")?.text;
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::RCurly, "'}'")?;
        Ok(Some(Node::function(name, arg)))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use crate::tree::Kind;

    #[test]
    fn category_quantity_all() {
        let tree = parse("|@Keys:ALL|").unwrap().unwrap();
        assert!(matches!(tree.kind, Kind::CategoryPercent("Keys", "100")));
    }

    #[test]
    fn count_quantity() {
        let tree = parse("|Key:4|").unwrap().unwrap();
        assert!(matches!(tree.kind, Kind::ItemCount("Key", "4")));
    }

    #[test]
    fn explicit_percent_is_not_normalised() {
        let tree = parse("|Key:4%|").unwrap().unwrap();
        assert!(matches!(tree.kind, Kind::ItemPercent("Key", "4")));
    }

    #[test]
    fn parenthesised_and_or() {
        let tree = parse("(|A| OR |B|) AND |C|").unwrap();
        assert!(tree.is_some());
    }

    #[test]
    fn function_call() {
        let tree = parse("{YamlEnabled(hard_mode)}").unwrap().unwrap();
        assert!(matches!(
            tree.kind,
            Kind::Function("YamlEnabled", "hard_mode")
        ));
    }

    #[test]
    fn and_is_right_associative_and_flattened_by_simplifier() {
        // |A| AND |B| AND |A| collapses via commutative idempotence.
        let tree = parse("|A| AND |B| AND |A|").unwrap();
        let ab = parse("|A| AND |B|").unwrap();
        assert!(crate::eq::tree_eq(&tree, &ab));
    }
}
