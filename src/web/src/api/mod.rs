pub mod challenges;
pub mod seasons;
