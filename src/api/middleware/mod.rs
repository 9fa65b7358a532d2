// Middleware module - contains cors, observability, and rate limiting

pub mod cors;
pub mod observability;
pub mod rate_limit;

// Re-export for convenience
#[allow(unused_imports)]
pub use cors::create_cors_layer;
