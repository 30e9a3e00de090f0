pub mod fingerprint;
pub mod handlers;
pub mod store;

pub use store::OptimizationCache;
