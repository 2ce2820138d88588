//! Route handlers.

pub mod form;
pub mod graph;
pub mod health;
pub mod query;
