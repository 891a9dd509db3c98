//! # Karta ドメイン層
//!
//! お問い合わせ送信経路のドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋性**: I/O も非同期ランタイムも持たない。入力フォーム（クライアント）と
//!   受信エンドポイント（サーバー）の両方から同じ関数を呼び出せる
//! - **能力の注入**: 商品カタログ・翻訳は trait として受け取り、グローバル状態を参照しない
//! - **全件収集**: バリデーション違反は最初の 1 件で止めず、すべて返す
//!
//! ## 依存関係の方向
//!
//! ```text
//! contact-service → infra → domain
//!        ↘                    ↑
//!          shared ────────────┘（依存しない）
//! ```
//!
//! ## モジュール構成
//!
//! - [`inquiry`] - お問い合わせとバリデータ
//! - [`catalog`] - 商品カタログ（読み取り専用）
//! - [`locale`] - 言語と翻訳メッセージ
//! - [`notification`] - 通知メールと配送結果
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use karta_domain::{
//!     catalog::StaticCatalog,
//!     inquiry::{ValidationContext, validate_inquiry},
//!     locale::{BundledMessages, Locale},
//! };
//!
//! let catalog = StaticCatalog::builtin();
//! let messages = BundledMessages;
//! let ctx = ValidationContext::new(&catalog, &messages, Locale::Fr);
//!
//! let raw = serde_json::json!({
//!     "name": "Jo",
//!     "email": "jo@example.com",
//!     "message": "Interested in the QS125-8",
//! });
//! let inquiry = validate_inquiry(&raw, &ctx).unwrap();
//! assert_eq!(inquiry.name(), "Jo");
//! ```

pub mod catalog;
pub mod clock;
pub mod inquiry;
pub mod locale;
pub mod notification;
