//! # お問い合わせユースケース
//!
//! 検証 → 配送 → ビジネスイベント記録の流れを統合する。
//!
//! 検証は送信経路の確認より先に行う。入力エラーは設定状況に関係なく 400 で返る。

use std::sync::Arc;

use karta_domain::{
    catalog::ProductCatalog,
    inquiry::{Inquiry, ValidationContext, ValidationErrors, validate_inquiry},
    locale::{Locale, MessageCatalog, MessageKey},
    notification::{DeliveryErrorKind, DeliveryOutcome},
};
use karta_shared::{event_log::event, log_business_event};
use serde_json::Value;

use super::DeliveryDispatcher;
use crate::error::ContactError;

/// お問い合わせユースケース
pub struct ContactUseCase {
    catalog:    Arc<dyn ProductCatalog>,
    messages:   Arc<dyn MessageCatalog>,
    dispatcher: DeliveryDispatcher,
}

impl ContactUseCase {
    pub fn new(
        catalog: Arc<dyn ProductCatalog>,
        messages: Arc<dyn MessageCatalog>,
        dispatcher: DeliveryDispatcher,
    ) -> Self {
        Self {
            catalog,
            messages,
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &DeliveryDispatcher {
        &self.dispatcher
    }

    /// 入力を検証する（配送はしない）
    pub fn validate(&self, raw: &Value, locale: Locale) -> Result<Inquiry, ValidationErrors> {
        let ctx = ValidationContext::new(self.catalog.as_ref(), self.messages.as_ref(), locale);
        validate_inquiry(raw, &ctx)
    }

    /// 入力を検証し、通過したら配送する
    ///
    /// 成功時は配送結果を返す。入力エラーと配送失敗は `ContactError` として返す。
    pub async fn submit(
        &self,
        raw: &Value,
        locale: Locale,
    ) -> Result<DeliveryOutcome, ContactError> {
        let inquiry = match self.validate(raw, locale) {
            Ok(inquiry) => inquiry,
            Err(errors) => {
                let fields: Vec<String> =
                    errors.violations().iter().map(|v| v.field.to_string()).collect();
                log_business_event!(
                    event.category = event::category::CONTACT,
                    event.action = event::action::CONTACT_REJECTED,
                    event.entity_type = event::entity_type::INQUIRY,
                    event.result = event::result::FAILURE,
                    contact.fields = ?fields,
                    "お問い合わせの入力エラー"
                );
                return Err(ContactError::Validation {
                    message: self.message(locale, MessageKey::InvalidForm),
                    errors,
                });
            }
        };

        if let Some(product) = inquiry.product().filter(|p| !p.is_known()) {
            tracing::warn!(product = product.id(), "カタログにない商品が指定されました");
        }

        let outcome = self.dispatcher.dispatch(&inquiry).await;
        let transport = outcome.transport().map(|t| t.to_string()).unwrap_or_default();

        if outcome.is_success() {
            log_business_event!(
                event.category = event::category::CONTACT,
                event.action = event::action::CONTACT_DELIVERED,
                event.entity_type = event::entity_type::INQUIRY,
                event.result = event::result::SUCCESS,
                event.transport = %transport,
                contact.diagnostic_id = outcome.diagnostic_id().unwrap_or_default(),
                "お問い合わせ通知メール送信成功"
            );
            return Ok(outcome);
        }

        if outcome.error() == Some(DeliveryErrorKind::Unconfigured) {
            log_business_event!(
                event.category = event::category::CONTACT,
                event.action = event::action::CONTACT_UNCONFIGURED,
                event.entity_type = event::entity_type::INQUIRY,
                event.result = event::result::FAILURE,
                "送信経路が未設定のためお問い合わせを配送できません"
            );
            return Err(ContactError::Unconfigured {
                message: self.message(locale, MessageKey::EmailUnavailable),
            });
        }

        log_business_event!(
            event.category = event::category::CONTACT,
            event.action = event::action::CONTACT_FAILED,
            event.entity_type = event::entity_type::INQUIRY,
            event.result = event::result::FAILURE,
            event.transport = %transport,
            contact.error = ?outcome.error(),
            "お問い合わせ通知メール送信失敗"
        );
        Err(ContactError::Delivery {
            message: self.message(locale, MessageKey::SendFailed),
            outcome,
        })
    }

    /// 利用者向けの文言
    pub fn message(&self, locale: Locale, key: MessageKey) -> String {
        self.messages.message(locale, key)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use karta_domain::{
        catalog::StaticCatalog,
        clock::FixedClock,
        inquiry::InquiryField,
        locale::BundledMessages,
        notification::TransportKind,
    };
    use karta_infra::mock::MockNotificationSender;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::usecase::{TemplateRenderer, TransportRoute};

    fn make_sut(
        primary: Option<&MockNotificationSender>,
        secondary: Option<&MockNotificationSender>,
    ) -> ContactUseCase {
        let messages: Arc<dyn MessageCatalog> = Arc::new(BundledMessages);
        let renderer = TemplateRenderer::new(
            messages.clone(),
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            )),
            "KARTA COMMERCE",
            Locale::Fr,
        )
        .unwrap();
        let to_route = |mock: &MockNotificationSender| {
            TransportRoute::new(Arc::new(mock.clone()), "ventes@kcg.ci")
        };
        let dispatcher = DeliveryDispatcher::new(
            primary.map(to_route),
            secondary.map(to_route),
            renderer,
            Duration::from_secs(1),
        );
        ContactUseCase::new(Arc::new(StaticCatalog::builtin()), messages, dispatcher)
    }

    fn valid_body() -> Value {
        json!({
            "name": "Jo",
            "email": "jo@example.com",
            "message": "Interested in the QS125-8",
        })
    }

    #[tokio::test]
    async fn test_送信経路がなければunconfiguredを返す() {
        let sut = make_sut(None, None);

        let result = sut.submit(&valid_body(), Locale::Fr).await;

        let Err(ContactError::Unconfigured { message }) = result else {
            panic!("Unconfigured を期待: {result:?}");
        };
        assert_eq!(message, "Configuration email non disponible");
    }

    #[tokio::test]
    async fn test_同じ入力でも検証だけなら受け付ける() {
        let sut = make_sut(None, None);

        let result = sut.validate(&valid_body(), Locale::Fr);

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_入力エラーは送信経路に触れずに返す() {
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(None, Some(&smtp));

        let result = sut
            .submit(&json!({"name": "A", "email": "bad-email", "message": "hi"}), Locale::En)
            .await;

        let Err(ContactError::Validation { message, errors }) = result else {
            panic!("Validation を期待: {result:?}");
        };
        assert_eq!(message, "Invalid form data");
        assert_eq!(errors.violations().len(), 3);
        assert!(errors.has_field(InquiryField::Name));
        assert!(errors.has_field(InquiryField::Email));
        assert!(errors.has_field(InquiryField::Message));
        assert_eq!(smtp.attempts(), 0);
    }

    #[tokio::test]
    async fn test_送信成功なら配送結果を返す() {
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(None, Some(&smtp));

        let outcome = sut.submit(&valid_body(), Locale::Fr).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.transport(), Some(TransportKind::Smtp));
    }

    #[tokio::test]
    async fn test_主経路の失敗は配送エラーとして返す() {
        let graph = MockNotificationSender::rejecting_send(TransportKind::Graph, "503");
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(Some(&graph), Some(&smtp));

        let result = sut.submit(&valid_body(), Locale::En).await;

        let Err(ContactError::Delivery { message, outcome }) = result else {
            panic!("Delivery を期待: {result:?}");
        };
        assert_eq!(message, "Error while sending the email");
        assert_eq!(outcome.transport(), Some(TransportKind::Graph));
        assert_eq!(smtp.attempts(), 0);
    }

    #[tokio::test]
    async fn test_カタログにない商品でも配送する() {
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(None, Some(&smtp));
        let body = json!({
            "name": "Jo",
            "email": "jo@example.com",
            "product": "QS999",
            "message": "Interested in the QS999",
        });

        let outcome = sut.submit(&body, Locale::Fr).await.unwrap();

        assert!(outcome.is_success());
        assert!(smtp.sent_emails()[0].subject.ends_with(" - QS999"));
    }
}
