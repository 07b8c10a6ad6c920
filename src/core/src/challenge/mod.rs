pub mod context;
pub mod pricing;
pub mod reward;
pub mod service;

pub use context::*;
pub use pricing::*;
pub use reward::*;
pub use service::*;
