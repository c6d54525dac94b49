//! # soilcell Core Library
//!
//! Sizes the treatment cells of a continuous-flow soil remediation facility. Given an
//! average daily intake and the operating constraints of each treatment phase, the library
//! searches a discretized space of (cell volume, cell count) pairs and ranks them so that
//! processing capacity matches intake at minimal capital cost.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`FacilityParameters`, `WorkWeek`,
//!   `CandidateConfiguration`) and the pure calendar, cycle and capacity calculations.
//!
//! - **[`engine`]: The Search Machinery.** Search and scoring configuration, the candidate
//!   generator, the multi-objective scorer, the ranking order and the error taxonomy.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into a complete
//!   optimization run returning the recommended configuration and a ranked shortlist.

pub mod core;
pub mod engine;
pub mod workflows;

pub use workflows::optimize::{OptimizationResult, optimize};
