//! # Engine Module
//!
//! The configuration search machinery: it enumerates candidate cell layouts, scores each
//! against competing objectives and orders them into a deterministic ranking.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search ranges, scoring policy and the facility parameter builder
//! - **Candidate Generation** ([`generator`]) - Lazy, restartable enumeration of feasible layouts
//! - **Scoring** ([`scoring`]) - Utilization, buffer, cost and operational objectives
//! - **Ranking** ([`state`]) - Scored records and their total ranking order
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - The engine's error taxonomy
//!
//! Every stage is a pure function of its inputs; candidates are evaluated independently and,
//! with the `parallel` feature, concurrently.

pub mod config;
pub mod error;
pub mod generator;
pub mod progress;
pub mod scoring;
pub mod state;
