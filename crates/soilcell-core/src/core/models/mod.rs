//! Domain models shared by every layer of the library.
//!
//! - [`phase`] - The five phases a treatment cell cycles through
//! - [`schedule`] - Weekdays, per-phase weekly work patterns and the facility weekend policy
//! - [`facility`] - Validated facility input parameters and their builder
//! - [`cell`] - Cell geometry and candidate configurations

pub mod cell;
pub mod facility;
pub mod phase;
pub mod schedule;
