//! Taleforge Core — shared domain abstractions.
//!
//! This crate defines the traits and types that the task queue, the
//! generation handlers and the infrastructure crates depend on. It contains
//! no infrastructure code.

pub mod clock;
pub mod error;
pub mod llm;
pub mod repository;
