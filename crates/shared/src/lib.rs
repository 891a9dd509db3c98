//! # Karta 共有ユーティリティ
//!
//! このクレートは、Karta のサービス全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - axum には依存しない（`IntoResponse` 変換は各サービスの責務）
//! - ログ初期化など外部クレートが必要なものは `observability` feature の背後に置く

pub mod api_response;
pub mod error_response;
pub mod event_log;
pub mod health;
pub mod observability;

pub use api_response::{ApiResponse, SuccessResponse};
pub use error_response::{ErrorResponse, FieldDetail};
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
