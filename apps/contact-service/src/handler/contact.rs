//! # お問い合わせ API ハンドラ
//!
//! ## エンドポイント
//!
//! ```text
//! POST /api/contact           検証して配送する
//! POST /api/contact/validate  検証のみ（入力フォームの事前確認）
//! ```
//!
//! 本文は Content-Type に関係なく JSON として解釈する。

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
};
use karta_domain::locale::{Locale, MessageKey};
use karta_shared::SuccessResponse;
use serde::Serialize;
use serde_json::Value;

use super::RequestLocale;
use crate::{error::ContactError, usecase::ContactUseCase};

/// お問い合わせハンドラーの State
pub struct ContactState {
    pub usecase: ContactUseCase,
}

/// 検証のみのレスポンス
#[derive(Debug, Serialize)]
pub struct ValidationPassed {
    pub valid:   bool,
    pub message: String,
}

/// POST /api/contact
#[tracing::instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<Arc<ContactState>>,
    RequestLocale(locale): RequestLocale,
    body: Bytes,
) -> Result<Response, ContactError> {
    let raw = parse_body(&state, &body, locale)?;

    state.usecase.submit(&raw, locale).await?;

    let message = state.usecase.message(locale, MessageKey::Sent);
    Ok(Json(SuccessResponse::new(message)).into_response())
}

/// POST /api/contact/validate
#[tracing::instrument(skip_all)]
pub async fn validate_contact(
    State(state): State<Arc<ContactState>>,
    RequestLocale(locale): RequestLocale,
    body: Bytes,
) -> Result<Response, ContactError> {
    let raw = parse_body(&state, &body, locale)?;

    state
        .usecase
        .validate(&raw, locale)
        .map_err(|errors| ContactError::Validation {
            message: state.usecase.message(locale, MessageKey::InvalidForm),
            errors,
        })?;

    Ok(Json(ValidationPassed {
        valid:   true,
        message: state.usecase.message(locale, MessageKey::FormValid),
    })
    .into_response())
}

fn parse_body(state: &ContactState, body: &[u8], locale: Locale) -> Result<Value, ContactError> {
    serde_json::from_slice(body).map_err(|e| ContactError::MalformedBody {
        message: state.usecase.message(locale, MessageKey::MalformedBody),
        detail:  e.to_string(),
    })
}
