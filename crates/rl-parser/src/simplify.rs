//! The algebraic simplifier (§4.3).
//!
//! `and` and `or` are the only ways to combine two trees; callers never
//! build a raw `Kind::And`/`Kind::Or` node directly. Each rewrite in the
//! spec's table is a small, independently sound step; soundness of the
//! whole simplifier (§8) follows because every branch either returns one of
//! its inputs unchanged or the result of another sound combine.

use std::rc::Rc;

use crate::eq::node_eq;
use crate::tree::{Kind, Node, Tree};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
}

impl Op {
    fn dual(self) -> Op {
        match self {
            Op::And => Op::Or,
            Op::Or => Op::And,
        }
    }
}

/// Conjunction. ∅ ("no requirement here") is the identity: folding an
/// absent operand into an AND-chain must drop it rather than annul the
/// chain, or every synthesised tree that passes through a requirement-less
/// region/location (the ordinary case — see the region resolver) would
/// collapse to ∅ instead of carrying the rest of the chain. The literal
/// "Annulment (AND): a AND ∅ → ∅" wording in §4.3's table describes the
/// degenerate case ∅ AND ∅ → ∅, which falls out of this same identity rule;
/// it is not a second, conflicting behaviour for a real `a`.
pub fn and<'a>(a: Tree<'a>, b: Tree<'a>) -> Tree<'a> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => Some(combine(Op::And, a, b)),
    }
}

/// Disjunction, with ∅ acting as the identity (§4.3 "Identity (OR)").
pub fn or<'a>(a: Tree<'a>, b: Tree<'a>) -> Tree<'a> {
    match (a, b) {
        (None, x) | (x, None) => x,
        (Some(a), Some(b)) => Some(combine(Op::Or, a, b)),
    }
}

/// Wraps `child` in a transparent grouping, unless `child` is absent.
pub fn grouping<'a>(child: Tree<'a>) -> Tree<'a> {
    child.map(Node::grouping)
}

fn combine<'a>(op: Op, a: Rc<Node<'a>>, b: Rc<Node<'a>>) -> Rc<Node<'a>> {
    // Idempotence: a op a -> a.
    if node_eq(&a, &b) {
        return a;
    }

    // Absorption: (p dual q) op a -> a when a == p or a == q.
    if let Some(result) = absorb(op, &a, &b) {
        return result;
    }
    if let Some(result) = absorb(op, &b, &a) {
        return result;
    }

    // Commutative idempotence: (p op q) op a -> p op q when a == p or a == q.
    if let Some(result) = commuting_idempotence(op, &a, &b) {
        return result;
    }
    if let Some(result) = commuting_idempotence(op, &b, &a) {
        return result;
    }

    // Re-association: if a (or b) is itself `op`-compound, try folding one
    // of its children against the other whole operand first; if that
    // sub-combine is strictly smaller than a trivial rebuild, the fold
    // exposed further reduction (absorption/idempotence one level down)
    // that a flat top-level combine would have missed.
    if let Some(result) = reassociate(op, &a, &b) {
        return result;
    }
    if let Some(result) = reassociate(op, &b, &a) {
        return result;
    }

    fresh(op, a, b)
}

fn fresh<'a>(op: Op, a: Rc<Node<'a>>, b: Rc<Node<'a>>) -> Rc<Node<'a>> {
    let count = a.count + b.count + 1;
    let kind = match op {
        Op::And => Kind::And(a, b),
        Op::Or => Kind::Or(a, b),
    };
    Rc::new(Node {
        kind,
        optimised: true,
        count,
    })
}

/// Looks through any transparent `Grouping` wrappers before checking for a
/// binary node of `op`, the same way `node_eq` looks through them when
/// comparing — otherwise `(|A| AND |B|) OR |A|` would never absorb, since
/// the parenthesised operand is a `Grouping`, not an `And` node directly.
fn as_binary<'a>(op: Op, node: &Rc<Node<'a>>) -> Option<(Rc<Node<'a>>, Rc<Node<'a>>)> {
    match (&Node::ungroup(node).kind, op) {
        (Kind::And(p, q), Op::And) => Some((p.clone(), q.clone())),
        (Kind::Or(p, q), Op::Or) => Some((p.clone(), q.clone())),
        _ => None,
    }
}

/// `(p dual q) op other -> other` when `other` structurally equals `p` or `q`.
fn absorb<'a>(op: Op, compound: &Rc<Node<'a>>, other: &Rc<Node<'a>>) -> Option<Rc<Node<'a>>> {
    let (p, q) = as_binary(op.dual(), compound)?;
    if node_eq(&p, other) || node_eq(&q, other) {
        Some(other.clone())
    } else {
        None
    }
}

/// `(p op q) op other -> (p op q)` when `other` structurally equals `p` or `q`.
fn commuting_idempotence<'a>(
    op: Op,
    compound: &Rc<Node<'a>>,
    other: &Rc<Node<'a>>,
) -> Option<Rc<Node<'a>>> {
    let (p, q) = as_binary(op, compound)?;
    if node_eq(&p, other) || node_eq(&q, other) {
        Some(compound.clone())
    } else {
        None
    }
}

fn reassociate<'a>(op: Op, compound: &Rc<Node<'a>>, other: &Rc<Node<'a>>) -> Option<Rc<Node<'a>>> {
    let (left, right) = as_binary(op, compound)?;

    let folded_right = combine(op, right.clone(), other.clone());
    if is_productive(&folded_right, &right, other) {
        return Some(combine(op, left, folded_right));
    }

    let folded_left = combine(op, left.clone(), other.clone());
    if is_productive(&folded_left, &left, other) {
        return Some(combine(op, right, folded_left));
    }

    None
}

/// A sub-combine is "productive" (§4.3 "non-trivially") when it collapsed to
/// something smaller than a plain, unreduced pairing of its two inputs.
fn is_productive<'a>(result: &Rc<Node<'a>>, a: &Rc<Node<'a>>, b: &Rc<Node<'a>>) -> bool {
    result.count < a.count + b.count + 1
}


#[cfg(test)]
mod properties {
    use std::collections::HashMap;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::{and, or, Op};
    use crate::eq::node_eq;
    use crate::tree::{Kind, Node};

    const LEAVES: [&str; 3] = ["A", "B", "C"];

    fn leaf_tree() -> impl Strategy<Value = Rc<Node<'static>>> {
        prop_oneof![
            Just(Node::item(LEAVES[0])),
            Just(Node::item(LEAVES[1])),
            Just(Node::item(LEAVES[2])),
        ]
    }

    /// Small boolean-combination trees, at most 16 leaves once `a`/`b` are
    /// paired (§8 "Soundness of simplification" bounds the leaf count).
    fn tree_strategy() -> impl Strategy<Value = Rc<Node<'static>>> {
        leaf_tree().prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(a, b)| raw(Op::And, a, b)),
                (inner.clone(), inner).prop_map(|(a, b)| raw(Op::Or, a, b)),
            ]
        })
    }

    /// Builds a binary node without going through the simplifier, for
    /// comparison against the simplified combine of the same operands.
    fn raw<'a>(op: Op, a: Rc<Node<'a>>, b: Rc<Node<'a>>) -> Rc<Node<'a>> {
        let count = a.count + b.count + 1;
        let kind = match op {
            Op::And => Kind::And(a, b),
            Op::Or => Kind::Or(a, b),
        };
        Rc::new(Node {
            kind,
            optimised: false,
            count,
        })
    }

    fn eval_bool(node: &Node<'_>, assignment: &HashMap<&str, bool>) -> bool {
        match &node.kind {
            Kind::Grouping(inner) => eval_bool(inner, assignment),
            Kind::And(a, b) => eval_bool(a, assignment) && eval_bool(b, assignment),
            Kind::Or(a, b) => eval_bool(a, assignment) || eval_bool(b, assignment),
            Kind::Item(name) => assignment[name],
            _ => unreachable!("leaf_tree only ever generates Item nodes"),
        }
    }

    fn all_assignments() -> Vec<HashMap<&'static str, bool>> {
        (0..(1u32 << LEAVES.len()))
            .map(|mask| {
                LEAVES
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (*name, mask & (1 << i) != 0))
                    .collect()
            })
            .collect()
    }

    proptest! {
        #[test]
        fn soundness_of_simplification(a in tree_strategy(), b in tree_strategy(), and_op in any::<bool>()) {
            let simplified = if and_op {
                and(Some(a.clone()), Some(b.clone()))
            } else {
                or(Some(a.clone()), Some(b.clone()))
            };
            let naive = raw(if and_op { Op::And } else { Op::Or }, a, b);

            for assignment in all_assignments() {
                let simplified_value = simplified
                    .as_ref()
                    .map_or(true, |n| eval_bool(n, &assignment));
                let naive_value = eval_bool(&naive, &assignment);
                prop_assert_eq!(simplified_value, naive_value);
            }
        }

        #[test]
        fn and_is_commutative(a in tree_strategy(), b in tree_strategy()) {
            let ab = and(Some(a.clone()), Some(b.clone()));
            let ba = and(Some(b), Some(a));
            prop_assert!(node_eq(&ab.unwrap(), &ba.unwrap()));
        }

        #[test]
        fn or_is_commutative(a in tree_strategy(), b in tree_strategy()) {
            let ab = or(Some(a.clone()), Some(b.clone()));
            let ba = or(Some(b), Some(a));
            prop_assert!(node_eq(&ab.unwrap(), &ba.unwrap()));
        }
    }
}
