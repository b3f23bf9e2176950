// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod mosque;
pub mod review;

pub use mosque::*;
pub use review::*;
