pub mod analysis;
pub mod signal;
pub mod suggestion;
