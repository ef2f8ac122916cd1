//! Infrastructure layer: everything that touches the OS or a wire.
//!
//! The application layer sees only the traits defined here (`KeySource`,
//! `Transport`); the concrete hook, socket, and serial implementations stay
//! behind them.

pub mod config;
pub mod hook;
pub mod transport;
