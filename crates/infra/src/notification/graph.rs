//! Microsoft Graph 通知送信実装
//!
//! OAuth2 クライアントクレデンシャルフローでアクセストークンを取得し、
//! `POST /v1.0/users/{from}/sendMail` でメールを送信する。

use std::time::Duration;

use async_trait::async_trait;
use karta_domain::notification::{DeliveryReceipt, EmailMessage, NotificationError, TransportKind};
use serde::{Deserialize, Serialize};

use super::NotificationSender;

/// 既定のトークン発行エンドポイント
const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";

/// 既定の Graph API エンドポイント
const DEFAULT_API_BASE_URL: &str = "https://graph.microsoft.com";

/// アプリケーション権限で Graph を呼ぶためのスコープ
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Graph が応答ヘッダーで返す診断用 ID
const REQUEST_ID_HEADER: &str = "request-id";

/// Azure AD アプリケーションの資格情報
#[derive(Clone)]
pub struct GraphCredentials {
    pub tenant_id:     String,
    pub client_id:     String,
    pub client_secret: String,
}

impl std::fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// 接続先 URL
///
/// テストではローカルのモックサーバーに向ける。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEndpoints {
    pub login_base_url: String,
    pub api_base_url:   String,
}

impl Default for GraphEndpoints {
    fn default() -> Self {
        Self {
            login_base_url: DEFAULT_LOGIN_BASE_URL.to_string(),
            api_base_url:   DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// Microsoft Graph 通知送信
///
/// 送信のたびにトークンを取得する（送信頻度が低いためキャッシュしない）。
pub struct GraphNotificationSender {
    http:         reqwest::Client,
    credentials:  GraphCredentials,
    endpoints:    GraphEndpoints,
    from_address: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMailRequest<'a> {
    message:            GraphMessage<'a>,
    save_to_sent_items: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphMessage<'a> {
    subject:       &'a str,
    body:          ItemBody<'a>,
    to_recipients: Vec<Recipient<'a>>,
    from:          Recipient<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reply_to:      Vec<Recipient<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemBody<'a> {
    content_type: &'static str,
    content:      &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient<'a> {
    email_address: Address<'a>,
}

#[derive(Serialize)]
struct Address<'a> {
    address: &'a str,
}

impl<'a> Recipient<'a> {
    fn new(address: &'a str) -> Self {
        Self {
            email_address: Address { address },
        }
    }
}

impl GraphNotificationSender {
    /// 新しい Graph 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `credentials`: テナント ID・クライアント ID・クライアントシークレット
    /// - `endpoints`: トークン発行と Graph API の URL
    /// - `from_address`: 送信元メールボックス（sendMail を呼ぶユーザー）
    /// - `timeout`: HTTP リクエスト 1 回あたりの上限
    pub fn new(
        credentials: GraphCredentials,
        endpoints: GraphEndpoints,
        from_address: String,
        timeout: Duration,
    ) -> Result<Self, NotificationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotificationError::SendFailed(format!("HTTP クライアント構築失敗: {e}")))?;

        Ok(Self {
            http,
            credentials,
            endpoints,
            from_address,
        })
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.endpoints.login_base_url.trim_end_matches('/'),
            urlencoding::encode(&self.credentials.tenant_id)
        )
    }

    fn send_mail_url(&self) -> String {
        format!(
            "{}/v1.0/users/{}/sendMail",
            self.endpoints.api_base_url.trim_end_matches('/'),
            urlencoding::encode(&self.from_address)
        )
    }

    /// アクセストークンを取得する
    async fn acquire_token(&self) -> Result<String, NotificationError> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .http
            .post(self.token_url())
            .form(&params)
            .send()
            .await
            .map_err(|e| NotificationError::AuthFailed(format!("トークン要求失敗: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::AuthFailed(format!(
                "トークン発行が拒否された ({status}): {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| NotificationError::AuthFailed(format!("トークン応答の解析失敗: {e}")))?;

        Ok(token.access_token)
    }
}

#[async_trait]
impl NotificationSender for GraphNotificationSender {
    fn kind(&self) -> TransportKind {
        TransportKind::Graph
    }

    async fn send_email(&self, email: &EmailMessage) -> Result<DeliveryReceipt, NotificationError> {
        let token = self.acquire_token().await?;

        let request = SendMailRequest {
            message:            GraphMessage {
                subject:       &email.subject,
                body:          ItemBody {
                    content_type: "HTML",
                    content:      &email.html_body,
                },
                to_recipients: vec![Recipient::new(&email.to)],
                from:          Recipient::new(&self.from_address),
                reply_to:      email.reply_to.as_deref().map(Recipient::new).into_iter().collect(),
            },
            save_to_sent_items: true,
        };

        let response = self
            .http
            .post(self.send_mail_url())
            .bearer_auth(token)
            .json(&request)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("Graph 送信失敗: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::SendFailed(format!(
                "Graph が送信を拒否 ({status}): {body}"
            )));
        }

        let diagnostic_id = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tracing::debug!(request_id = ?diagnostic_id, "Graph sendMail 受理");

        Ok(DeliveryReceipt { diagnostic_id })
    }
}
