//! # Core Module
//!
//! Stateless building blocks of the facility model.
//!
//! ## Architecture
//!
//! Data flows strictly downward through the submodules:
//!
//! - **Domain Models** ([`models`]) - Phases, weekly work patterns, facility parameters and cell geometry
//! - **Calendar Model** ([`calendar`]) - Operating-day to calendar-day conversion under a weekly pattern
//! - **Cycle Model** ([`cycle`]) - One cell's Load → Rip → Treat → Dry → Unload cycle in calendar days
//! - **Capacity Model** ([`capacity`]) - Facility throughput and static storage for a cell layout

pub mod calendar;
pub mod capacity;
pub mod cycle;
pub mod models;
