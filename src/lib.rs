pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::NexusError;
pub use crate::core::services::NexusService;

#[cfg(test)]
mod tests;
