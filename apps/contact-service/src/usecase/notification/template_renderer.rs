//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンでお問い合わせ通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **件名パターン**: `[{ブランド} contact] {理由}`、商品があれば ` - {商品}` を付加
//! - **自動エスケープ**: `.html` テンプレートは tera が利用者入力をエスケープする
//! - **通知言語**: ラベルは `NOTIFICATION_LOCALE` の言語で埋める（利用者の言語ではない）

use std::sync::Arc;

use karta_domain::{
    clock::Clock,
    inquiry::Inquiry,
    locale::{Locale, MessageCatalog, MessageKey},
    notification::{EmailMessage, NotificationError},
};
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "contact_inquiry";

/// 受付時刻の表示形式
const RECEIVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

/// テンプレートに渡すラベル一式
#[derive(Serialize)]
struct Labels {
    heading:     String,
    intro:       String,
    details:     String,
    name:        String,
    email:       String,
    phone:       String,
    product:     String,
    message:     String,
    received_at: String,
}

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、検証済みの `Inquiry` から `EmailMessage` を生成する。
pub struct TemplateRenderer {
    engine:   Tera,
    messages: Arc<dyn MessageCatalog>,
    clock:    Arc<dyn Clock>,
    brand:    String,
    locale:   Locale,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new(
        messages: Arc<dyn MessageCatalog>,
        clock: Arc<dyn Clock>,
        brand: impl Into<String>,
        locale: Locale,
    ) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "contact_inquiry.html",
                    include_str!("../../../templates/notifications/contact_inquiry.html"),
                ),
                (
                    "contact_inquiry.txt",
                    include_str!("../../../templates/notifications/contact_inquiry.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self {
            engine,
            messages,
            clock,
            brand: brand.into(),
            locale,
        })
    }

    /// お問い合わせから通知メールを生成する
    ///
    /// # 引数
    ///
    /// - `inquiry`: 検証済みのお問い合わせ
    /// - `recipient`: 送信先（経路ごとに設定された受信箱）
    pub fn render(
        &self,
        inquiry: &Inquiry,
        recipient: &str,
    ) -> Result<EmailMessage, NotificationError> {
        let subject = self.subject(inquiry);
        let context = self.build_context(inquiry, &subject);

        let html_body = self
            .engine
            .render(&format!("{TEMPLATE_NAME}.html"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{TEMPLATE_NAME}.txt"), &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            to: recipient.to_string(),
            reply_to: Some(inquiry.email().to_string()),
            subject,
            html_body,
            text_body,
        })
    }

    /// 件名を組み立てる
    fn subject(&self, inquiry: &Inquiry) -> String {
        let reason = self.text(MessageKey::EmailSubjectReason);
        match inquiry.product() {
            Some(product) => format!("[{} contact] {reason} - {}", self.brand, product.label()),
            None => format!("[{} contact] {reason}", self.brand),
        }
    }

    fn build_context(&self, inquiry: &Inquiry, subject: &str) -> Context {
        let labels = Labels {
            heading:     self.text(MessageKey::EmailHeading),
            intro:       self.text(MessageKey::EmailIntro),
            details:     self.text(MessageKey::EmailDetails),
            name:        self.text(MessageKey::EmailName),
            email:       self.text(MessageKey::EmailEmail),
            phone:       self.text(MessageKey::EmailPhone),
            product:     self.text(MessageKey::EmailProduct),
            message:     self.text(MessageKey::EmailMessage),
            received_at: self.text(MessageKey::EmailReceivedAt),
        };

        let phone = inquiry
            .phone()
            .map(str::to_string)
            .unwrap_or_else(|| self.text(MessageKey::EmailPhoneMissing));
        let product = inquiry
            .product()
            .map(|p| p.label())
            .unwrap_or_else(|| self.text(MessageKey::EmailProductMissing));

        let mut context = Context::new();
        context.insert("lang", self.locale.code());
        context.insert("subject", subject);
        context.insert("brand", &self.brand);
        context.insert("labels", &labels);
        context.insert("name", inquiry.name());
        context.insert("email", inquiry.email());
        context.insert("phone", &phone);
        context.insert("product", &product);
        context.insert("message", inquiry.message());
        context.insert(
            "received_at",
            &self.clock.now().format(RECEIVED_AT_FORMAT).to_string(),
        );
        context
    }

    fn text(&self, key: MessageKey) -> String {
        self.messages.message(self.locale, key)
    }
}
