pub mod manager;
pub mod rewards;
pub mod state;
pub mod summary;

pub use manager::*;
pub use rewards::*;
pub use state::*;
pub use summary::*;
