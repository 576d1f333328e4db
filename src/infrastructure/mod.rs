pub mod cache;
pub mod logging;
pub mod optimizer;
pub mod storage;
