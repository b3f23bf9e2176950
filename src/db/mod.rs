// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

#[cfg(test)]
pub mod memory;
pub mod repository;

#[cfg(test)]
pub use memory::*;
pub use repository::*;
