//! Source-string storage for the world handle (§9 "Structural sharing vs.
//! ownership").
//!
//! `rl_parser::Tree` borrows its leaf text from a buffer the caller keeps
//! alive. A [`crate::world::WorldHandle`] holds hundreds of independently
//! parsed trees (one per location, one per region) for the life of a whole
//! session, so there is no single buffer it could borrow from — each
//! `requires` string comes from a different JSON array element, and
//! synthesised region-reach strings don't exist in the source at all.
//!
//! Rather than invent a self-referential arena type, each string that needs
//! to outlive its own parse call is leaked once with [`Box::leak`], which is
//! ordinary safe Rust. The result is a handful of `&'static str`s per world
//! load — small, bounded by the bundle's own location/region count, and
//! reclaimed (like the rest of the process) when the session ends. This
//! matches the "trees may own copied strings" fallback in the design notes:
//! leaking is simply the simplest form of "own it forever" when the handle
//! itself has no natural end-of-life to free it at.
pub fn intern(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}
