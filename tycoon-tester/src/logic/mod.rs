pub mod bots;
pub mod invariants;
pub mod reports;
pub mod simulation;
pub mod tester;

pub use bots::BotStrategy;
pub use tester::*;
