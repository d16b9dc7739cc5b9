//! Generation handlers and their prompt/parsing helpers.

pub mod handlers;
pub mod parsing;
pub mod prompts;
