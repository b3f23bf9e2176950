// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod health;
pub mod mosques;

pub use health::config as health_config;
pub use mosques::config as mosques_config;
