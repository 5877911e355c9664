//! Faithful re-print (§4.8): reproduces the original surface syntax,
//! including explicit `Grouping` parentheses exactly where the source had
//! them.

use std::fmt::{self, Write};

use rl_parser::{Kind, Node, Tree};

/// Renders `tree` back into `requires`-string form. `None` prints as the
/// empty string (∅ has no surface syntax of its own).
pub fn reprint(tree: &Tree<'_>) -> String {
    let mut out = String::new();
    if let Some(node) = tree {
        write_node(node, &mut out).expect("writing to a String never fails");
    }
    out
}

fn write_node(node: &Node<'_>, out: &mut String) -> fmt::Result {
    match &node.kind {
        Kind::Grouping(inner) => {
            write!(out, "(")?;
            write_node(inner, out)?;
            write!(out, ")")
        }
        Kind::And(left, right) => {
            write_node(left, out)?;
            write!(out, " AND ")?;
            write_node(right, out)
        }
        Kind::Or(left, right) => {
            write_node(left, out)?;
            write!(out, " OR ")?;
            write_node(right, out)
        }
        Kind::Item(name) => write!(out, "|{name}|"),
        Kind::Category(name) => write!(out, "|@{name}|"),
        Kind::ItemCount(name, n) => write!(out, "|{name}:{n}|"),
        Kind::CategoryCount(name, n) => write!(out, "|@{name}:{n}|"),
        Kind::ItemPercent(name, p) => write!(out, "|{name}:{}|", percent_form(p)),
        Kind::CategoryPercent(name, p) => write!(out, "|@{name}:{}|", percent_form(p)),
        Kind::Function(name, arg) => write!(out, "{{{name}({arg})}}"),
    }
}

/// `100` and `50` re-print as the `ALL`/`HALF` keywords; every other value
/// re-prints as an explicit `n%`. The tree alone can't distinguish a
/// source `:ALL|` from a source `:100%|` (both simplify to the same leaf),
/// so the re-printer always picks the keyword form for those two values.
fn percent_form(p: &str) -> String {
    match p {
        "100" => "ALL".to_string(),
        "50" => "HALF".to_string(),
        other => format!("{other}%"),
    }
}
