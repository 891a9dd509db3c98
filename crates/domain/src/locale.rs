//! # 言語と翻訳メッセージ
//!
//! 利用者向け文言（バリデーションエラー、API 応答、通知メール）を
//! 言語ごとに引き当てる翻訳コラボレーターを定義する。
//!
//! ## 設計方針
//!
//! - **キーは enum**: [`MessageKey`] で網羅性をコンパイル時に保証する
//! - **trait による注入**: バリデータとレンダラーは [`MessageCatalog`] を受け取る。
//!   テストでは固定の翻訳表を渡せる
//! - **フランス語が既定**: 判定できない場合は [`Locale::Fr`] にフォールバックする

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

/// サポートする言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

impl Locale {
    /// 言語コード（`"fr"` / `"en"`）
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// 言語タグから言語を判定する
    ///
    /// `fr`, `fr-FR`, `fr_CA` のような地域付きタグも受け付ける。大文字小文字は区別しない。
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "fr" => Some(Self::Fr),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// `Accept-Language` ヘッダー値から最も優先度の高いサポート言語を選ぶ
    ///
    /// `q` 値の降順で評価し、同順位は出現順を保つ。
    /// サポート言語が含まれない場合は `None`。
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, Self)> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?;
                let locale = Self::from_code(tag)?;
                let quality = parts
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                (quality > 0.0).then_some((quality, locale))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates.first().map(|(_, locale)| *locale)
    }
}

/// 翻訳メッセージのキー
///
/// 文字列表現はフロントエンドの翻訳ファイルと同じドット区切りのキー。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, strum::EnumIter)]
pub enum MessageKey {
    // フォームのバリデーション
    #[strum(serialize = "contact.form.nameRequired")]
    NameRequired,
    #[strum(serialize = "contact.form.emailInvalid")]
    EmailInvalid,
    #[strum(serialize = "contact.form.phoneInvalid")]
    PhoneInvalid,
    #[strum(serialize = "contact.form.productInvalid")]
    ProductInvalid,
    #[strum(serialize = "contact.form.messageRequired")]
    MessageRequired,

    // API 応答
    #[strum(serialize = "contact.api.sent")]
    Sent,
    #[strum(serialize = "contact.api.formValid")]
    FormValid,
    #[strum(serialize = "contact.api.invalidForm")]
    InvalidForm,
    #[strum(serialize = "contact.api.malformedBody")]
    MalformedBody,
    #[strum(serialize = "contact.api.emailUnavailable")]
    EmailUnavailable,
    #[strum(serialize = "contact.api.sendFailed")]
    SendFailed,
    #[strum(serialize = "products.api.notFound")]
    ProductNotFound,

    // 通知メール
    #[strum(serialize = "contact.email.subjectReason")]
    EmailSubjectReason,
    #[strum(serialize = "contact.email.heading")]
    EmailHeading,
    #[strum(serialize = "contact.email.intro")]
    EmailIntro,
    #[strum(serialize = "contact.email.details")]
    EmailDetails,
    #[strum(serialize = "contact.email.name")]
    EmailName,
    #[strum(serialize = "contact.email.email")]
    EmailEmail,
    #[strum(serialize = "contact.email.phone")]
    EmailPhone,
    #[strum(serialize = "contact.email.product")]
    EmailProduct,
    #[strum(serialize = "contact.email.message")]
    EmailMessage,
    #[strum(serialize = "contact.email.phoneMissing")]
    EmailPhoneMissing,
    #[strum(serialize = "contact.email.productMissing")]
    EmailProductMissing,
    #[strum(serialize = "contact.email.receivedAt")]
    EmailReceivedAt,
}

impl MessageKey {
    /// ドット区切りのキー文字列
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// 翻訳メッセージの引き当て
pub trait MessageCatalog: Send + Sync {
    /// 指定言語のメッセージを返す
    fn message(&self, locale: Locale, key: MessageKey) -> String;
}

/// バイナリに同梱された翻訳表
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledMessages;

impl BundledMessages {
    fn lookup(locale: Locale, key: MessageKey) -> &'static str {
        use MessageKey::*;

        match (locale, key) {
            (Locale::Fr, NameRequired) => "Le nom doit contenir au moins 2 caractères",
            (Locale::En, NameRequired) => "Name must be at least 2 characters",
            (Locale::Fr, EmailInvalid) => "Email invalide",
            (Locale::En, EmailInvalid) => "Invalid email address",
            (Locale::Fr, PhoneInvalid) => "Le téléphone doit être un texte",
            (Locale::En, PhoneInvalid) => "Phone must be text",
            (Locale::Fr, ProductInvalid) => "Le produit doit être un identifiant texte",
            (Locale::En, ProductInvalid) => "Product must be a text identifier",
            (Locale::Fr, MessageRequired) => "Le message doit contenir au moins 10 caractères",
            (Locale::En, MessageRequired) => "Message must be at least 10 characters",

            (Locale::Fr, Sent) => "Email envoyé avec succès",
            (Locale::En, Sent) => "Email sent successfully",
            (Locale::Fr, FormValid) => "Formulaire valide",
            (Locale::En, FormValid) => "Form is valid",
            (Locale::Fr, InvalidForm) => "Données du formulaire invalides",
            (Locale::En, InvalidForm) => "Invalid form data",
            (Locale::Fr, MalformedBody) => "Le corps de la requête n'est pas un JSON valide",
            (Locale::En, MalformedBody) => "Request body is not valid JSON",
            (Locale::Fr, EmailUnavailable) => "Configuration email non disponible",
            (Locale::En, EmailUnavailable) => "Email configuration unavailable",
            (Locale::Fr, SendFailed) => "Erreur lors de l'envoi de l'email",
            (Locale::En, SendFailed) => "Error while sending the email",
            (Locale::Fr, ProductNotFound) => "Produit introuvable",
            (Locale::En, ProductNotFound) => "Product not found",

            (Locale::Fr, EmailSubjectReason) => "Nouveau contact",
            (Locale::En, EmailSubjectReason) => "New inquiry",
            (Locale::Fr, EmailHeading) => "Nouveau message depuis le site web",
            (Locale::En, EmailHeading) => "New message from the website",
            (Locale::Fr, EmailIntro) => "Nouveau message de contact depuis le site",
            (Locale::En, EmailIntro) => "New contact message from the website",
            (Locale::Fr, EmailDetails) => "Détails du contact",
            (Locale::En, EmailDetails) => "Contact details",
            (Locale::Fr, EmailName) => "Nom",
            (Locale::En, EmailName) => "Name",
            (Locale::Fr, EmailEmail) => "Email",
            (Locale::En, EmailEmail) => "Email",
            (Locale::Fr, EmailPhone) => "Téléphone",
            (Locale::En, EmailPhone) => "Phone",
            (Locale::Fr, EmailProduct) => "Produit d'intérêt",
            (Locale::En, EmailProduct) => "Product of interest",
            (Locale::Fr, EmailMessage) => "Message",
            (Locale::En, EmailMessage) => "Message",
            (Locale::Fr, EmailPhoneMissing) => "Non fourni",
            (Locale::En, EmailPhoneMissing) => "Not provided",
            (Locale::Fr, EmailProductMissing) => "Aucun produit spécifique",
            (Locale::En, EmailProductMissing) => "No specific product",
            (Locale::Fr, EmailReceivedAt) => "Reçu le",
            (Locale::En, EmailReceivedAt) => "Received on",
        }
    }
}

impl MessageCatalog for BundledMessages {
    fn message(&self, locale: Locale, key: MessageKey) -> String {
        Self::lookup(locale, key).to_string()
    }
}
