//! # API レスポンスエンベロープ
//!
//! - 参照系: `{ "data": T }`
//! - 送信系: `{ "success": true, "message": "..." }`

use serde::{Deserialize, Serialize};

/// 参照系 API の統一レスポンス型
///
/// ## 使用例
///
/// ```
/// use karta_shared::ApiResponse;
///
/// let response = ApiResponse::new("hello");
/// assert_eq!(response.data, "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// 新しい `ApiResponse` を作成する
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// 送信系 API の成功レスポンス
///
/// ## 使用例
///
/// ```
/// use karta_shared::SuccessResponse;
///
/// let response = SuccessResponse::new("Email envoyé avec succès");
/// assert!(response.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    /// 新しい `SuccessResponse` を作成する
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
