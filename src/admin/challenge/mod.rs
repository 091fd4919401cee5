//! 挑战（챌린지）管理模块

pub mod api;
pub mod types;
pub mod view;

pub use api::ChallengeApi;
pub use types::{Challenge, ChallengeCategory, ChallengeImage, ChallengeList, ChallengeStatus, NewChallenge};
pub use view::ChallengeView;
