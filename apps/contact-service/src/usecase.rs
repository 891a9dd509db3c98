//! # ユースケース層
//!
//! Contact Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: カタログ・翻訳・送信経路を `Arc<dyn Trait>` で外部から注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `contact`: お問い合わせの検証と配送
//! - `notification`: 通知メールのレンダリングと配送ディスパッチャ

pub mod contact;
pub mod notification;

pub use contact::ContactUseCase;
pub use notification::{DeliveryDispatcher, TemplateRenderer, TransportRoute};
