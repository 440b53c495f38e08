pub mod traits;

// Price walk implementations
pub mod random_walk;
pub mod scripted;
