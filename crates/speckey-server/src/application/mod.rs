//! Application layer use cases for the bridge.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (OS/network/serial).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "forward
//!   every captured keystroke to the device until the operator bails out").
//! - **Depend on abstractions** (traits) rather than concrete
//!   implementations, so the infrastructure can be swapped without changing
//!   this code.
//! - **Contain no OS calls, no network I/O, no serial port access**.
//!
//! # Sub-modules
//!
//! - **`forward_keys`** – Receives raw captured key events, resolves each
//!   one against the key matrix, and sends the result to the device. This
//!   is the live-forwarding path; it runs on every keystroke.
//!
//! - **`type_text`** – Plays a pre-planned sequence of key strokes to the
//!   device with configurable pacing, releasing anything still held if the
//!   run is cancelled midway.

pub mod forward_keys;
pub mod type_text;

pub use forward_keys::{ForwardKeysUseCase, ForwardSummary};
pub use type_text::{TypeTextUseCase, TypingReport};
