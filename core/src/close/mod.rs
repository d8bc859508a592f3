//! close/mod.rs
//! Ownership tracking for acquired layers.
//!
//! - `CloseStack`: last acquired, first released; continues past failures.
//! - `CloseErrorStack`: the aggregate returned when more than one release fails.

pub mod errors;
pub mod stack;

pub use errors::CloseErrorStack;
pub use stack::CloseStack;
pub(crate) use stack::rollback;
