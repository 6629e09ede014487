//! Adapter implementations of the competition ports.

pub mod memory;
pub mod postgres;
