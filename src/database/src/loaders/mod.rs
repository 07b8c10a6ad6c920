mod club;
mod names;
mod settings;

pub use club::*;
pub use names::*;
pub use settings::*;
