pub mod classify;
pub mod context;
pub mod documentation;
pub mod runner; // Sequential documentation run with cancellation
