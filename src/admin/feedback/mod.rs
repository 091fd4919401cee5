//! 意见反馈模块

pub mod api;
pub mod types;
pub mod view;

pub use api::FeedbackApi;
pub use types::{format_timestamp, Feedback, ReplyFilter};
pub use view::FeedbackView;
