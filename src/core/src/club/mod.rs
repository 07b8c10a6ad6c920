pub mod club;
pub mod finance;
pub mod level;
pub mod player;
pub mod strength;

pub use club::*;
pub use level::*;
pub use player::*;
pub use strength::*;
