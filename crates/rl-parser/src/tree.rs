//! The requirement tree (§3) and its leaf constructors.

use std::rc::Rc;

/// A parsed or synthesised requirement expression, or `None` for the absent
/// requirement ∅ ("already satisfied" / "no constraint").
///
/// `Rc` gives every combinator cheap cloning without changing structural
/// identity (§4.4 compares by structure, never by pointer).
pub type Tree<'a> = Option<Rc<Node<'a>>>;

/// One node of a requirement tree. Immutable once constructed.
#[derive(Debug)]
pub struct Node<'a> {
    pub kind: Kind<'a>,
    /// Set once the simplifier has proved this node irreducible under the
    /// rewrite rules of §4.3.
    pub optimised: bool,
    /// Total node count including `self`.
    pub count: u32,
}

#[derive(Debug)]
pub enum Kind<'a> {
    /// Explicit parentheses from the source. Semantically transparent but
    /// preserved so the faithful re-printer can reproduce them.
    Grouping(Rc<Node<'a>>),
    And(Rc<Node<'a>>, Rc<Node<'a>>),
    Or(Rc<Node<'a>>, Rc<Node<'a>>),
    /// "player has received at least one of `name`".
    Item(&'a str),
    /// "player has received at least one item belonging to category `name`".
    Category(&'a str),
    /// "at least `n` copies of `name` received". `n` is the original textual
    /// digits, never normalised.
    ItemCount(&'a str, &'a str),
    /// "at least `n` items in category `name` received".
    CategoryCount(&'a str, &'a str),
    /// "received count / declared count >= p/100", `p` stored as text.
    ItemPercent(&'a str, &'a str),
    /// Same, aggregated over a category.
    CategoryPercent(&'a str, &'a str),
    /// A named predicate; see §4.7 for the recognised set.
    Function(&'a str, &'a str),
}

impl<'a> Node<'a> {
    fn leaf(kind: Kind<'a>) -> Rc<Node<'a>> {
        Rc::new(Node {
            kind,
            optimised: true,
            count: 1,
        })
    }

    pub fn item(name: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::Item(name))
    }

    pub fn category(name: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::Category(name))
    }

    pub fn item_count(name: &'a str, n: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::ItemCount(name, n))
    }

    pub fn category_count(name: &'a str, n: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::CategoryCount(name, n))
    }

    pub fn item_percent(name: &'a str, p: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::ItemPercent(name, p))
    }

    pub fn category_percent(name: &'a str, p: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::CategoryPercent(name, p))
    }

    pub fn function(name: &'a str, arg: &'a str) -> Rc<Node<'a>> {
        Self::leaf(Kind::Function(name, arg))
    }

    /// Wraps `child` in an explicit, semantically-transparent grouping.
    pub fn grouping(child: Rc<Node<'a>>) -> Rc<Node<'a>> {
        let count = child.count + 1;
        Rc::new(Node {
            kind: Kind::Grouping(child),
            optimised: true,
            count,
        })
    }

    /// Strips any number of transparent [`Kind::Grouping`] wrappers.
    pub fn ungroup<'b>(node: &'b Rc<Node<'a>>) -> &'b Rc<Node<'a>> {
        let mut current = node;
        while let Kind::Grouping(inner) = &current.kind {
            current = inner;
        }
        current
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, Kind::Grouping(_) | Kind::And(_, _) | Kind::Or(_, _))
    }
}

/// Converts the two-node-union convention (`Tree` = `Option<Rc<Node>>`) into
/// a `Rc<Node>`, using `unit` (identity element) for ∅. Used internally by
/// the simplifier; not part of the public grammar.
pub(crate) fn count_of(tree: &Tree<'_>) -> u32 {
    tree.as_ref().map_or(0, |n| n.count)
}
