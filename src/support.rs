//! Crate-level utilities shared by models.
//!
//! - [`constraint`]: Type-level numeric invariants (non-negative, strictly positive).
//! - [`kinetics`]: Rate laws reused by physiological models.
//! - [`units`]: Extensions to [`uom`] for molar bookkeeping.

pub mod constraint;
pub mod kinetics;
pub mod units;
