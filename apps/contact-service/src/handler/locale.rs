//! # リクエスト言語
//!
//! 利用者向け文言の言語をリクエストから決める extractor。
//!
//! 優先順位: `?locale=` クエリ → `Accept-Language` ヘッダー → フランス語。

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::ACCEPT_LANGUAGE, request::Parts},
};
use karta_domain::locale::Locale;
use serde::Deserialize;

#[derive(Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

/// リクエストの言語
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLocale(pub Locale);

impl RequestLocale {
    fn resolve(parts: &Parts) -> Locale {
        let from_query = Query::<LocaleQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.locale)
            .and_then(|code| Locale::from_code(&code));

        from_query
            .or_else(|| {
                parts
                    .headers
                    .get(ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(Locale::from_accept_language)
            })
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for RequestLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Self::resolve(parts)))
    }
}
