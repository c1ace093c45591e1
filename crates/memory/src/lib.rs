pub mod learning_log;
pub mod store;
pub mod thought_log;
pub mod types;

pub use learning_log::{LearningLog, LEARNINGS_KEY, MAX_LEARNINGS};
pub use store::{InMemoryStore, JsonFileStore, KeyValueStore, MemoryError};
pub use thought_log::{ThoughtLog, MAX_THOUGHTS};
pub use types::*;
