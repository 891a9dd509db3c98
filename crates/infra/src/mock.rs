//! # テスト用モック
//!
//! ディスパッチャや API テストで使用するインメモリの通知送信モック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! karta-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use karta_domain::notification::{DeliveryReceipt, EmailMessage, NotificationError, TransportKind};

use crate::notification::NotificationSender;

/// モックの応答
#[derive(Debug, Clone)]
enum MockResponse {
    Accept(Option<String>),
    RejectAuth(String),
    RejectSend(String),
}

/// 送信したメールを記録するモック
///
/// クローンは記録を共有するため、アプリに渡したあとでも送信内容を検査できる。
#[derive(Clone)]
pub struct MockNotificationSender {
    kind:     TransportKind,
    response: MockResponse,
    delay:    Option<Duration>,
    sent:     Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockNotificationSender {
    /// 常に成功するモック
    pub fn accepting(kind: TransportKind) -> Self {
        Self {
            kind,
            response: MockResponse::Accept(Some(format!("mock-{kind}-id"))),
            delay: None,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 認証で失敗するモック
    pub fn rejecting_auth(kind: TransportKind, reason: &str) -> Self {
        Self {
            response: MockResponse::RejectAuth(reason.to_string()),
            ..Self::accepting(kind)
        }
    }

    /// 送信で失敗するモック
    pub fn rejecting_send(kind: TransportKind, reason: &str) -> Self {
        Self {
            response: MockResponse::RejectSend(reason.to_string()),
            ..Self::accepting(kind)
        }
    }

    /// 応答前に待機する
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// 送信を試みたメール（失敗した試行も含む）
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn send_email(&self, email: &EmailMessage) -> Result<DeliveryReceipt, NotificationError> {
        self.sent.lock().unwrap().push(email.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.response {
            MockResponse::Accept(diagnostic_id) => Ok(DeliveryReceipt {
                diagnostic_id: diagnostic_id.clone(),
            }),
            MockResponse::RejectAuth(reason) => Err(NotificationError::AuthFailed(reason.clone())),
            MockResponse::RejectSend(reason) => Err(NotificationError::SendFailed(reason.clone())),
        }
    }
}
