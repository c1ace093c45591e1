pub mod apps;
pub mod command_executor;
pub mod environment;
pub mod local_backend;
pub mod web_search;

pub use command_executor::{CommandExecutor, ExecutorError};
pub use environment::SystemSnapshot;
pub use local_backend::LocalBackend;
pub use web_search::WebSearch;
