//! # 通知
//!
//! お問い合わせ通知メールのレンダリングと配送。

mod dispatcher;
mod template_renderer;

pub use dispatcher::{DeliveryDispatcher, TransportRoute};
pub use template_renderer::TemplateRenderer;
