pub mod error;
pub mod leaderboard;
pub mod platform;
pub mod submission_status;

pub use error::ParseEnumError;
pub use leaderboard::{LeaderboardKind, TimeRange};
pub use platform::{Difficulty, Platform};
pub use submission_status::SubmissionStatus;
