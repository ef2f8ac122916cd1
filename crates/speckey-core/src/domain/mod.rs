//! Domain logic for the SpecKey bridge.
//!
//! This module contains pure business rules with no infrastructure
//! dependencies: no sockets, no serial handles, no clocks. The planner in
//! [`typing`] computes *what* to send and in *which* order; when to send it
//! (the actual delays) and where (UDP or serial) are decisions made by the
//! application crate around it. Keeping the plan pure is what makes the
//! stroke sequences exhaustively testable.

/// Keystroke planning, the core domain operation.
///
/// See [`typing::plan_text`] for the entry point.
pub mod typing;
