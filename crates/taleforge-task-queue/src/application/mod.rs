//! Queue machinery: registry, pending buffer, state store, worker and the
//! `TaskQueue` controller that ties them together.

pub mod queue;
pub mod registry;
pub mod state_store;

mod pending;
mod worker;
