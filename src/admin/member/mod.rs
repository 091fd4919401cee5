//! 会员管理模块

pub mod api;
pub mod types;
pub mod view;

pub use api::MemberApi;
pub use types::{Member, MemberFilter, MemberTab};
pub use view::MemberView;
