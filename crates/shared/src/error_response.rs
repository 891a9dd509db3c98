//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 形状
//!
//! - 入力エラー: `{ "error": "...", "details": [{ "field", "code", "message" }] }`
//! - それ以外: `{ "error": "..." }`（`details` は出力しない）
//!
//! `ErrorResponse` は純粋なデータ構造。axum の `IntoResponse` 変換は各サービスの責務。

use serde::{Deserialize, Serialize};

/// フィールド単位の入力エラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDetail {
    /// フィールド名（例: `"email"`）
    pub field:   String,
    /// 機械可読な違反コード（例: `"invalid_format"`）
    pub code:    String,
    /// 利用者向けのローカライズ済みメッセージ
    pub message: String,
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error:   String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldDetail>>,
}

impl ErrorResponse {
    /// 詳細なしのエラー
    ///
    /// サーバー側の失敗に使う。内部情報は `error` に含めないこと。
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error:   error.into(),
            details: None,
        }
    }

    /// 入力エラー（違反の一覧付き）
    ///
    /// `details` が空でもフィールドは出力する（本文が JSON として読めなかった場合など）。
    pub fn validation(error: impl Into<String>, details: Vec<FieldDetail>) -> Self {
        Self {
            error:   error.into(),
            details: Some(details),
        }
    }
}
