pub mod analytics;
pub mod ceiling;
pub mod errors;
pub mod explain;
pub mod fallback;
pub mod models;
pub mod money;
pub mod redistribute;
pub mod sequencer;
pub mod services;
pub mod session;
