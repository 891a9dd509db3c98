//! # 通知
//!
//! お問い合わせ通知メールと、その配送結果のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`EmailMessage`] | 通知メール | 件名・HTML 本文・テキスト本文の組 |
//! | [`TransportKind`] | 送信経路 | 主経路（Microsoft Graph）と予備経路（SMTP） |
//! | [`DeliveryOutcome`] | 配送結果 | 1 回の送信試行の成否と診断用 ID |
//!
//! ## 不変条件
//!
//! 1 件のお問い合わせで試行する送信経路は高々 1 つ。
//! [`DeliveryOutcome`] は試行した経路を 1 つだけ記録する。

use serde::Serialize;
use strum::IntoStaticStr;
use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 送信経路の認証に失敗
    #[error("送信経路の認証に失敗: {0}")]
    AuthFailed(String),

    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知メール
///
/// テンプレートレンダリングの出力。`NotificationSender` に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先（お問い合わせを受け付ける受信箱）
    pub to:        String,
    /// 返信先（お問い合わせ送信者のメールアドレス）
    pub reply_to:  Option<String>,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 送信経路
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransportKind {
    /// 主経路: Microsoft Graph の sendMail API
    Graph,
    /// 予備経路: SMTP による直接送信
    Smtp,
}

/// 送信成功時の受領情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// 送信経路固有の診断用 ID（Message-ID、request-id など）
    pub diagnostic_id: Option<String>,
}

/// 配送失敗の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryErrorKind {
    /// 使用可能な送信経路が設定されていない
    Unconfigured,
    /// 設定済みの送信経路が失敗した
    Transport,
    /// 送信試行が期限内に終わらなかった
    Timeout,
    /// 送信前の本文生成に失敗した
    Rendering,
}

/// 配送結果
///
/// コンストラクタ経由でのみ生成し、`success` と `error` の整合を保つ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    success:       bool,
    error:         Option<DeliveryErrorKind>,
    transport:     Option<TransportKind>,
    diagnostic_id: Option<String>,
    #[serde(skip)]
    detail:        Option<String>,
}

impl DeliveryOutcome {
    /// 送信成功
    pub fn delivered(transport: TransportKind, receipt: DeliveryReceipt) -> Self {
        Self {
            success:       true,
            error:         None,
            transport:     Some(transport),
            diagnostic_id: receipt.diagnostic_id,
            detail:        None,
        }
    }

    /// 送信失敗
    ///
    /// `detail` は運用者向けの診断文言。利用者には返さない。
    pub fn failed(
        transport: TransportKind,
        error: DeliveryErrorKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            success:       false,
            error:         Some(error),
            transport:     Some(transport),
            diagnostic_id: None,
            detail:        Some(detail.into()),
        }
    }

    /// 送信経路が未設定（どの経路も試行していない）
    pub fn unconfigured() -> Self {
        Self {
            success:       false,
            error:         Some(DeliveryErrorKind::Unconfigured),
            transport:     None,
            diagnostic_id: None,
            detail:        None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error(&self) -> Option<DeliveryErrorKind> {
        self.error
    }

    /// 試行した送信経路（未設定時は `None`）
    pub fn transport(&self) -> Option<TransportKind> {
        self.transport
    }

    pub fn diagnostic_id(&self) -> Option<&str> {
        self.diagnostic_id.as_deref()
    }

    /// 運用者向けの失敗詳細
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_deliveredは成功と経路と診断idを保持する() {
        let outcome = DeliveryOutcome::delivered(
            TransportKind::Smtp,
            DeliveryReceipt {
                diagnostic_id: Some("<abc@kcg.ci>".to_string()),
            },
        );

        assert!(outcome.is_success());
        assert_eq!(outcome.error(), None);
        assert_eq!(outcome.transport(), Some(TransportKind::Smtp));
        assert_eq!(outcome.diagnostic_id(), Some("<abc@kcg.ci>"));
    }

    #[test]
    fn test_failedは分類と詳細を保持する() {
        let outcome =
            DeliveryOutcome::failed(TransportKind::Graph, DeliveryErrorKind::Transport, "401");

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(DeliveryErrorKind::Transport));
        assert_eq!(outcome.transport(), Some(TransportKind::Graph));
        assert_eq!(outcome.detail(), Some("401"));
    }

    #[test]
    fn test_unconfiguredはどの経路も記録しない() {
        let outcome = DeliveryOutcome::unconfigured();

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(DeliveryErrorKind::Unconfigured));
        assert_eq!(outcome.transport(), None);
    }

    #[test]
    fn test_シリアライズで詳細は出力しない() {
        let outcome = DeliveryOutcome::failed(
            TransportKind::Smtp,
            DeliveryErrorKind::Timeout,
            "smtp.example.com:587 への接続がタイムアウト",
        );
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "timeout",
                "transport": "smtp",
                "diagnostic_id": null,
            })
        );
    }

    #[test]
    fn test_送信経路の文字列表現() {
        assert_eq!(TransportKind::Graph.to_string(), "graph");
        assert_eq!(TransportKind::Smtp.to_string(), "smtp");
        assert_eq!(DeliveryErrorKind::Unconfigured.to_string(), "unconfigured");
    }
}
