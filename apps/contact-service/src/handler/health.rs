//! # ヘルスチェックハンドラ
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health        プロセスの稼働確認
//! GET /health/ready  メール送信経路が設定済みか
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "ready",
//!   "checks": { "graph": "error", "smtp": "ok" }
//! }
//! ```
//!
//! 送信経路はどちらか一方があれば ready。接続確認は行わない（送信のたびに確認するため）。

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use karta_domain::notification::TransportKind;
use karta_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};

/// ヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness Check の State
pub struct ReadinessState {
    pub graph_configured: bool,
    pub smtp_configured:  bool,
}

#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let to_status = |configured: bool| {
        if configured {
            CheckStatus::Ok
        } else {
            CheckStatus::Error
        }
    };

    let mut checks = HashMap::new();
    checks.insert(
        TransportKind::Graph.to_string(),
        to_status(state.graph_configured),
    );
    checks.insert(
        TransportKind::Smtp.to_string(),
        to_status(state.smtp_configured),
    );

    let ready = state.graph_configured || state.smtp_configured;
    if !ready {
        tracing::warn!("readiness check: メール送信経路が設定されていません");
    }

    let (http_status, status) = if ready {
        (StatusCode::OK, ReadinessStatus::Ready)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ReadinessStatus::NotReady)
    };

    (http_status, Json(ReadinessResponse { status, checks }))
}
