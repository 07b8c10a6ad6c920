pub mod attribution;
pub mod score;
pub mod simulator;

pub use attribution::*;
pub use score::*;
pub use simulator::*;
