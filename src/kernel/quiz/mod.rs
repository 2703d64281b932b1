pub mod answers;
pub mod engine;
pub mod submission;
pub mod weights;

pub use answers::*;
pub use engine::{best_bundle, recommend, Recommendation, Tier};
pub use submission::QuizSubmission;
pub use weights::{score, BundleScores};
