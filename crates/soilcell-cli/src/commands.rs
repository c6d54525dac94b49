pub mod cycle;
pub mod optimize;
