//! # 通知送信
//!
//! お問い合わせ通知メールの送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **2 つの実装**: Microsoft Graph（主経路）、SMTP（予備経路）
//! - **経路の選択はしない**: 設定の判定と経路の選択はアプリケーション層のディスパッチャが行う

mod graph;
mod smtp;

use async_trait::async_trait;
pub use graph::{GraphCredentials, GraphEndpoints, GraphNotificationSender};
use karta_domain::notification::{DeliveryReceipt, EmailMessage, NotificationError, TransportKind};
pub use smtp::{SmtpNotificationSender, SmtpSettings};

/// メール送信トレイト
///
/// 1 回の呼び出しで 1 通を送る。リトライはしない。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 送信経路の種別
    fn kind(&self) -> TransportKind;

    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<DeliveryReceipt, NotificationError>;
}
