pub mod config;
pub mod error;
pub mod kernel;
pub mod services;

pub use config::AppConfig;
pub use kernel::quiz::{recommend, QuizAnswers, Recommendation};
pub use kernel::reactor::{VoteHandle, VoteReactor};
