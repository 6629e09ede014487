//! Competition lifecycle engine.
//!
//! Groups eligible candidates into teams, moves projects through
//! `created -> judging -> completed`, aggregates ratings per team, and
//! freezes a deterministic ranking when judging ends. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;
