//! Jamboree: competition lifecycle engine for hackathon ("jam") management.
//!
//! This crate provides the rules that sit underneath a jam platform: forming
//! teams from an eligibility list, gating the phases of a project, collecting
//! peer and judge ratings, and freezing the final ranking.
//!
//! # Architecture
//!
//! Jamboree follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`competition`]: Team formation, project lifecycle, ratings and ranking

pub mod competition;
