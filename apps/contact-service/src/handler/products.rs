//! # 商品カタログ API ハンドラ
//!
//! お問い合わせフォームの商品選択肢を提供する読み取り専用エンドポイント。
//!
//! ```text
//! GET /api/products
//! GET /api/products/{id}
//! ```

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use karta_domain::{
    catalog::{CatalogEntry, ProductCatalog},
    locale::{MessageCatalog, MessageKey},
};
use karta_shared::ApiResponse;

use super::RequestLocale;
use crate::error::ContactError;

/// カタログハンドラーの State
pub struct CatalogState {
    pub catalog:  Arc<dyn ProductCatalog>,
    pub messages: Arc<dyn MessageCatalog>,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<Arc<CatalogState>>,
) -> Json<ApiResponse<Vec<CatalogEntry>>> {
    Json(ApiResponse::new(state.catalog.entries().to_vec()))
}

/// GET /api/products/{id}
///
/// 識別子の大文字小文字は区別しない。
pub async fn get_product(
    State(state): State<Arc<CatalogState>>,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CatalogEntry>>, ContactError> {
    let entry = state
        .catalog
        .find(&id)
        .cloned()
        .ok_or_else(|| ContactError::NotFound {
            message: state.messages.message(locale, MessageKey::ProductNotFound),
        })?;

    Ok(Json(ApiResponse::new(entry)))
}
