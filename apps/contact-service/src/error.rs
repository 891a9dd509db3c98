//! # Contact Service エラー定義
//!
//! Contact Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! 利用者向けの文言はリクエストの言語で組み立て済みの状態で保持する。
//! 運用者向けの詳細（送信経路のエラー文など）はログにのみ出力し、レスポンスには含めない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use karta_domain::{
    inquiry::ValidationErrors,
    notification::{DeliveryErrorKind, DeliveryOutcome},
};
use karta_shared::{
    ErrorResponse,
    FieldDetail,
    event_log::error::{category, kind},
};
use thiserror::Error;

/// Contact Service で発生するエラー
#[derive(Debug, Error)]
pub enum ContactError {
    /// 入力エラー（違反の一覧付き）
    #[error("入力エラー: {errors}")]
    Validation {
        message: String,
        errors:  ValidationErrors,
    },

    /// リクエスト本文が JSON として読めない
    #[error("リクエスト本文の解析に失敗: {detail}")]
    MalformedBody { message: String, detail: String },

    /// リソースが見つからない
    #[error("リソースが見つかりません: {message}")]
    NotFound { message: String },

    /// 送信経路が未設定
    #[error("メール送信経路が設定されていません")]
    Unconfigured { message: String },

    /// 設定済みの送信経路で配送に失敗
    #[error("メール配送に失敗: {:?}", .outcome.error())]
    Delivery {
        message: String,
        outcome: DeliveryOutcome,
    },
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        match self {
            ContactError::Validation { message, errors } => {
                let details = errors
                    .into_violations()
                    .into_iter()
                    .map(|v| FieldDetail {
                        field:   v.field.to_string(),
                        code:    v.code.to_string(),
                        message: v.message,
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::validation(message, details)),
                )
                    .into_response()
            }
            ContactError::MalformedBody { message, detail } => {
                tracing::debug!(%detail, "リクエスト本文を JSON として解析できません");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::validation(message, Vec::new())),
                )
                    .into_response()
            }
            ContactError::NotFound { message } => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(message))).into_response()
            }
            ContactError::Unconfigured { message } => {
                tracing::error!(
                    error.category = category::CONFIGURATION,
                    error.kind = kind::MAIL_UNCONFIGURED,
                    "Microsoft Graph も SMTP も設定されていません"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(message)),
                )
                    .into_response()
            }
            ContactError::Delivery { message, outcome } => {
                let (error_category, error_kind) = match outcome.error() {
                    Some(DeliveryErrorKind::Timeout) => {
                        (category::EXTERNAL_SERVICE, kind::MAIL_TIMEOUT)
                    }
                    Some(DeliveryErrorKind::Rendering) => {
                        (category::INTERNAL, kind::TEMPLATE_RENDERING)
                    }
                    _ => (category::EXTERNAL_SERVICE, kind::MAIL_TRANSPORT),
                };
                tracing::error!(
                    error.category = error_category,
                    error.kind = error_kind,
                    transport = ?outcome.transport(),
                    detail = outcome.detail().unwrap_or_default(),
                    "通知メールの配送に失敗しました"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(message)),
                )
                    .into_response()
            }
        }
    }
}
