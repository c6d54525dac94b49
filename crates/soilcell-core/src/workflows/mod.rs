//! # Workflows Module
//!
//! Top-level entry points that run a complete search, from parameter validation through
//! candidate generation and scoring to the ranked result.
//!
//! - **Optimization Workflow** ([`optimize`]) - Recommends a cell layout and a ranked shortlist

pub mod optimize;
