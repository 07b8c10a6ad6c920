pub mod currency;
pub mod types;

pub use currency::*;
pub use types::*;
