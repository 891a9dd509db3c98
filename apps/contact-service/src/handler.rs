//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ロジックはユースケースに委譲

pub mod contact;
pub mod health;
pub mod locale;
pub mod products;

pub use contact::{ContactState, submit_contact, validate_contact};
pub use health::{ReadinessState, health_check, readiness_check};
pub use locale::RequestLocale;
pub use products::{CatalogState, get_product, list_products};
