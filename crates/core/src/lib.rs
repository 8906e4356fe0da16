pub mod config;
pub mod countdown;
pub mod error;
pub mod manager;
pub mod model;
pub mod prompt;
pub mod store;

pub use config::AppConfig;
pub use countdown::{evaluate, parse_deadline, remaining, StatusBoard, TimeLeft};
pub use error::TaskError;
pub use manager::TaskManager;
pub use model::{StatusBucket, Task};
pub use prompt::{PromptOutcome, TaskSubmission};
pub use store::{SqliteStore, StoreError, TaskStore};
