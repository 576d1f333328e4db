pub mod account;
pub mod audit;
pub mod payment;
pub mod payment_context;
pub mod recommendation;
pub mod split;
