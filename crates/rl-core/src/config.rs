//! Evaluation configuration (§6.4).

/// The recognised flag set. Threaded explicitly through every evaluation
/// call rather than held as hidden global state, preserving the "pure
/// function of tree and snapshots" ordering guarantee of §5.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// `false` (default): evaluate requirements as literally written.
    /// `true`: clamp count/percent requirements by enabled categories and
    /// treat disabled items/categories as satisfied.
    pub is_opt_all: bool,
}
