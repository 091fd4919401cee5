//! FAQ 管理模块

pub mod api;
pub mod types;
pub mod view;

pub use api::FaqApi;
pub use types::{Faq, FaqDraft};
pub use view::FaqView;
