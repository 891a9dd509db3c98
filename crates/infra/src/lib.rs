//! # Karta インフラ層
//!
//! 外部のメール送信サービスとの通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **Microsoft Graph**: OAuth2 クライアントクレデンシャルでトークンを取得し、sendMail API を呼ぶ
//! - **SMTP**: lettre によるセッション確認と直接送信
//!
//! どちらもドメイン層の [`EmailMessage`](karta_domain::notification::EmailMessage) を受け取り、
//! [`NotificationSender`](notification::NotificationSender) trait の背後に隠れる。
//! どの経路を使うかはアプリケーション層が決める。
//!
//! ## 依存関係
//!
//! ```text
//! contact-service → infra → domain
//! ```

pub mod notification;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
