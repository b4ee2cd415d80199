//! Project type handlers for the supported firmware ecosystems

pub mod arduino;
pub mod micropython;
