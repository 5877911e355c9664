//! Structural equality (§4.4).

use crate::collate;
use crate::tree::{Kind, Node, Tree};

/// `true` iff `a` and `b` are structurally equal (§4.4): groupings are
/// transparent, binary nodes compare as unordered pairs, leaf names compare
/// under the canonical comparator, and numeric arguments compare as strings.
pub fn tree_eq<'a>(a: &Tree<'a>, b: &Tree<'a>) -> bool {
    match (a, b) {
        (None, None) => true,
        (None, Some(_)) | (Some(_), None) => false,
        (Some(a), Some(b)) => node_eq(a, b),
    }
}

pub fn node_eq<'a>(a: &Node<'a>, b: &Node<'a>) -> bool {
    kind_eq(&ungroup(a).kind, &ungroup(b).kind)
}

/// Follows the transparent `Grouping` spine to the first non-grouping node.
fn ungroup<'a, 'b>(mut n: &'b Node<'a>) -> &'b Node<'a> {
    while let Kind::Grouping(inner) = &n.kind {
        n = inner;
    }
    n
}

fn kind_eq<'a>(a: &Kind<'a>, b: &Kind<'a>) -> bool {
    match (a, b) {
        (Kind::And(al, ar), Kind::And(bl, br)) | (Kind::Or(al, ar), Kind::Or(bl, br)) => {
            (node_eq(al, bl) && node_eq(ar, br)) || (node_eq(al, br) && node_eq(ar, bl))
        }
        (Kind::Item(a), Kind::Item(b)) | (Kind::Category(a), Kind::Category(b)) => {
            collate::eq(a, b)
        }
        (Kind::ItemCount(an, av), Kind::ItemCount(bn, bv))
        | (Kind::CategoryCount(an, av), Kind::CategoryCount(bn, bv))
        | (Kind::ItemPercent(an, av), Kind::ItemPercent(bn, bv))
        | (Kind::CategoryPercent(an, av), Kind::CategoryPercent(bn, bv)) => {
            collate::eq(an, bn) && av == bv
        }
        (Kind::Function(an, aa), Kind::Function(bn, ba)) => an == bn && aa == ba,
        (Kind::Grouping(_), _) | (_, Kind::Grouping(_)) => {
            unreachable!("ungroup strips Grouping before kind_eq is called")
        }
        _ => false,
    }
}

impl<'a> PartialEq for Node<'a> {
    fn eq(&self, other: &Self) -> bool {
        node_eq(self, other)
    }
}
