//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 送信前にセッションを確立して接続と認証を確認する。
//!
//! `secure` が `false` の場合、サーバーが STARTTLS を広告したときだけ TLS に昇格する。
//! 広告しないサーバー（ローカル MTA など）には平文のまま送信する。

use std::time::Duration;

use async_trait::async_trait;
use karta_domain::notification::{DeliveryReceipt, EmailMessage, NotificationError, TransportKind};
use lettre::{
    AsyncSmtpTransport,
    AsyncTransport,
    Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};

use super::NotificationSender;

/// SMTP 接続設定
#[derive(Clone)]
pub struct SmtpSettings {
    pub host:         String,
    pub port:         u16,
    /// `true` で接続時から TLS、`false` でサーバーが対応していれば STARTTLS に昇格
    pub secure:       bool,
    pub username:     String,
    pub password:     String,
    pub from_address: String,
    /// From ヘッダーの表示名
    pub sender_name:  String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_address", &self.from_address)
            .field("sender_name", &self.sender_name)
            .finish()
    }
}

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from:      Mailbox,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `settings`: 接続先・認証情報・送信元
    /// - `timeout`: SMTP コマンド 1 回あたりの上限
    pub fn new(settings: &SmtpSettings, timeout: Duration) -> Result<Self, NotificationError> {
        let builder = if settings.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
        } else {
            TlsParameters::new(settings.host.clone()).map(|tls| {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                    .tls(Tls::Opportunistic(tls))
            })
        }
        .map_err(|e| NotificationError::SendFailed(format!("SMTP トランスポート構築失敗: {e}")))?;

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        let address = settings
            .from_address
            .parse()
            .map_err(|e| NotificationError::SendFailed(format!("送信元アドレス不正: {e}")))?;

        Ok(Self {
            transport,
            from: Mailbox::new(Some(settings.sender_name.clone()), address),
        })
    }

    /// Message-ID を生成する（`<uuid@送信元ドメイン>`）
    fn generate_message_id(&self) -> String {
        format!("<{}@{}>", uuid::Uuid::now_v7(), self.from.email.domain())
    }

    /// 送信するメッセージを組み立てる
    fn build_message(
        &self,
        email: &EmailMessage,
        message_id: &str,
    ) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email
                .to
                .parse()
                .map_err(|e| NotificationError::SendFailed(format!("宛先アドレス不正: {e}")))?)
            .subject(&email.subject)
            .message_id(Some(message_id.to_string()));

        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(reply_to.parse().map_err(|e| {
                NotificationError::SendFailed(format!("返信先アドレス不正: {e}"))
            })?);
        }

        builder
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| NotificationError::SendFailed(format!("メッセージ構築失敗: {e}")))
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    fn kind(&self) -> TransportKind {
        TransportKind::Smtp
    }

    async fn send_email(&self, email: &EmailMessage) -> Result<DeliveryReceipt, NotificationError> {
        // 本文を送る前に接続と認証を確認する
        let ready = self
            .transport
            .test_connection()
            .await
            .map_err(|e| NotificationError::AuthFailed(format!("SMTP セッション確立失敗: {e}")))?;
        if !ready {
            return Err(NotificationError::AuthFailed(
                "SMTP サーバーが応答しない".to_string(),
            ));
        }

        let message_id = self.generate_message_id();
        let message = self.build_message(email, &message_id)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        tracing::debug!(
            message_id = %message_id,
            code = %response.code(),
            "SMTP 送信受理"
        );

        Ok(DeliveryReceipt {
            diagnostic_id: Some(message_id),
        })
    }
}
