//! # お問い合わせ
//!
//! お問い合わせフォームの送信内容と、そのバリデータを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Inquiry`] | お問い合わせ | 全制約を満たした送信内容。部分的に有効な状態は存在しない |
//! | [`ProductReference`] | 商品参照 | 送信された商品識別子と、カタログで照合できた場合の商品レコード |
//! | [`FieldViolation`] | 項目違反 | 項目・違反種別・利用者向け文言の組 |
//!
//! ## 設計方針
//!
//! - **単一の純粋関数**: [`validate_inquiry`] を入力フォームと受信エンドポイントの両方で使う。
//!   制約の二重実装による食い違いを起こさない
//! - **全件収集**: 違反は 1 回の走査ですべて集める
//! - **商品参照は参考扱い**: カタログにない識別子でも拒否しない（通知の表示にしか使わないため）

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{
    catalog::{CatalogEntry, ProductCatalog},
    locale::{Locale, MessageCatalog, MessageKey},
};

/// 氏名の最小文字数（前後の空白を除く）
pub const NAME_MIN_CHARS: usize = 2;

/// 本文の最小文字数（前後の空白を除く）
pub const MESSAGE_MIN_CHARS: usize = 10;

/// メールアドレスの書式
///
/// ローカル部は英数字と `_'+-.`、末尾は `'` と `.` 以外。
/// ドメイン部は 1 つ以上のラベルと 2 文字以上の英字 TLD。
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("メールアドレスの正規表現が不正")
});

/// メールアドレスの書式を検証する
pub fn is_valid_email(value: &str) -> bool {
    let local = value.split('@').next().unwrap_or_default();
    !local.starts_with('.') && !local.contains("..") && EMAIL_PATTERN.is_match(value)
}

/// フォーム項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InquiryField {
    Name,
    Email,
    Phone,
    Product,
    Message,
}

/// 違反種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, IntoStaticStr, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ViolationCode {
    /// 必須項目が未入力
    Required,
    /// 文字列でない値
    InvalidType,
    /// 最小文字数に満たない
    TooShort,
    /// 書式が不正
    InvalidFormat,
}

/// 項目単位のバリデーション違反
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field:   InquiryField,
    pub code:    ViolationCode,
    /// 利用者向けの文言（リクエストの言語）
    pub message: String,
}

/// バリデーション失敗（1 件以上の違反）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("お問い合わせの入力に {} 件の違反があります", .0.len())]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    pub fn into_violations(self) -> Vec<FieldViolation> {
        self.0
    }

    /// 指定項目に違反が含まれるか
    pub fn has_field(&self, field: InquiryField) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

/// 商品参照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReference {
    id:    String,
    entry: Option<CatalogEntry>,
}

impl ProductReference {
    /// 送信された識別子（前後の空白除去済み）
    pub fn id(&self) -> &str {
        &self.id
    }

    /// カタログで照合できた商品
    pub fn entry(&self) -> Option<&CatalogEntry> {
        self.entry.as_ref()
    }

    pub fn is_known(&self) -> bool {
        self.entry.is_some()
    }

    /// 通知メール向けの表示ラベル
    ///
    /// カタログにあれば表示名付き、なければ送信された識別子そのもの。
    pub fn label(&self) -> String {
        match &self.entry {
            Some(entry) => entry.label(),
            None => self.id.clone(),
        }
    }
}

/// お問い合わせ（検証済み）
///
/// [`validate_inquiry`] からのみ生成される。文字列はすべて前後の空白を除去済み。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inquiry {
    name:    String,
    email:   String,
    phone:   Option<String>,
    product: Option<ProductReference>,
    message: String,
}

impl Inquiry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn product(&self) -> Option<&ProductReference> {
        self.product.as_ref()
    }

    /// 本文（改行は保持される）
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// バリデーションに注入する能力
pub struct ValidationContext<'a> {
    catalog:  &'a dyn ProductCatalog,
    messages: &'a dyn MessageCatalog,
    locale:   Locale,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        catalog: &'a dyn ProductCatalog,
        messages: &'a dyn MessageCatalog,
        locale: Locale,
    ) -> Self {
        Self {
            catalog,
            messages,
            locale,
        }
    }
}

/// 入力値の取り出し結果
enum RawField<'v> {
    Missing,
    Text(&'v str),
    NotText,
}

fn raw_field<'v>(raw: &'v Value, field: InquiryField) -> RawField<'v> {
    let key: &'static str = field.into();
    match raw.get(key) {
        None | Some(Value::Null) => RawField::Missing,
        Some(Value::String(s)) => RawField::Text(s),
        Some(_) => RawField::NotText,
    }
}

/// 違反の収集器
struct Collector<'c, 'a> {
    ctx:        &'c ValidationContext<'a>,
    violations: Vec<FieldViolation>,
}

impl Collector<'_, '_> {
    fn push(&mut self, field: InquiryField, code: ViolationCode, key: MessageKey) {
        self.violations.push(FieldViolation {
            field,
            code,
            message: self.ctx.messages.message(self.ctx.locale, key),
        });
    }

    /// 必須かつ最小文字数のある項目
    fn required_text(
        &mut self,
        raw: &Value,
        field: InquiryField,
        min_chars: usize,
        key: MessageKey,
    ) -> Option<String> {
        match raw_field(raw, field) {
            RawField::Missing => {
                self.push(field, ViolationCode::Required, key);
                None
            }
            RawField::NotText => {
                self.push(field, ViolationCode::InvalidType, key);
                None
            }
            RawField::Text(s) => {
                let trimmed = s.trim();
                if trimmed.chars().count() < min_chars {
                    let code = if trimmed.is_empty() {
                        ViolationCode::Required
                    } else {
                        ViolationCode::TooShort
                    };
                    self.push(field, code, key);
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    fn email(&mut self, raw: &Value) -> Option<String> {
        let field = InquiryField::Email;
        let key = MessageKey::EmailInvalid;
        match raw_field(raw, field) {
            RawField::Missing => {
                self.push(field, ViolationCode::Required, key);
                None
            }
            RawField::NotText => {
                self.push(field, ViolationCode::InvalidType, key);
                None
            }
            RawField::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    self.push(field, ViolationCode::Required, key);
                    None
                } else if !is_valid_email(trimmed) {
                    self.push(field, ViolationCode::InvalidFormat, key);
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
        }
    }

    /// 任意項目。空文字列は未入力として扱う
    ///
    /// 戻り値の外側の `Option` は違反の有無、内側は値の有無。
    fn optional_text(
        &mut self,
        raw: &Value,
        field: InquiryField,
        key: MessageKey,
    ) -> Option<Option<String>> {
        match raw_field(raw, field) {
            RawField::Missing => Some(None),
            RawField::NotText => {
                self.push(field, ViolationCode::InvalidType, key);
                None
            }
            RawField::Text(s) => {
                let trimmed = s.trim();
                Some((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
        }
    }
}

/// お問い合わせを検証し、正規化する
///
/// `raw` は項目名から値への任意の JSON。オブジェクトでない場合は全必須項目が未入力とみなされる。
///
/// # 制約
///
/// - `name`: 文字列、前後の空白を除いて 2 文字以上
/// - `email`: 文字列、メールアドレス書式
/// - `phone`: 任意、文字列
/// - `product`: 任意、文字列。カタログにない識別子も受け付ける
/// - `message`: 文字列、前後の空白を除いて 10 文字以上
///
/// # エラー
///
/// 違反をすべて収集した [`ValidationErrors`] を返す。順序は項目順
/// （name, email, phone, product, message）。
pub fn validate_inquiry(
    raw: &Value,
    ctx: &ValidationContext<'_>,
) -> Result<Inquiry, ValidationErrors> {
    let mut collector = Collector {
        ctx,
        violations: Vec::new(),
    };

    let name = collector.required_text(
        raw,
        InquiryField::Name,
        NAME_MIN_CHARS,
        MessageKey::NameRequired,
    );
    let email = collector.email(raw);
    let phone = collector.optional_text(raw, InquiryField::Phone, MessageKey::PhoneInvalid);
    let product = collector.optional_text(raw, InquiryField::Product, MessageKey::ProductInvalid);
    let message = collector.required_text(
        raw,
        InquiryField::Message,
        MESSAGE_MIN_CHARS,
        MessageKey::MessageRequired,
    );

    match (name, email, phone, product, message) {
        (Some(name), Some(email), Some(phone), Some(product), Some(message))
            if collector.violations.is_empty() =>
        {
            let product = product.map(|id| ProductReference {
                entry: ctx.catalog.find(&id).cloned(),
                id,
            });
            Ok(Inquiry {
                name,
                email,
                phone,
                product,
                message,
            })
        }
        _ => Err(ValidationErrors(collector.violations)),
    }
}
