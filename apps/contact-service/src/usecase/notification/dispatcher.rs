//! # 配送ディスパッチャ
//!
//! 検証済みのお問い合わせを 1 つの送信経路で 1 回だけ配送し、単一の配送結果を返す。
//!
//! ## 状態遷移
//!
//! ```text
//! ConfigProbe ──主経路あり──→ PrimaryAttempt ──→ Delivered | Failed
//!      │
//!      └──主経路なし──→ FallbackProbe ──予備経路あり──→ SecondaryAttempt ──→ Delivered | Failed
//!                            │
//!                            └──予備経路なし──→ Unconfigured
//! ```
//!
//! 設定済みの主経路が失敗しても予備経路には切り替えない。リトライもしない。
//! 各試行は `timeout` で打ち切り、期限切れは `Failed(Timeout)` として返す。

use std::{sync::Arc, time::Duration};

use karta_domain::{
    inquiry::Inquiry,
    notification::{DeliveryErrorKind, DeliveryOutcome, DeliveryReceipt, TransportKind},
};
use karta_infra::notification::NotificationSender;

use super::TemplateRenderer;

/// 送信経路と、その経路で使う受信箱
#[derive(Clone)]
pub struct TransportRoute {
    sender:    Arc<dyn NotificationSender>,
    recipient: String,
}

impl TransportRoute {
    pub fn new(sender: Arc<dyn NotificationSender>, recipient: impl Into<String>) -> Self {
        Self {
            sender,
            recipient: recipient.into(),
        }
    }

    pub fn kind(&self) -> TransportKind {
        self.sender.kind()
    }
}

/// 配送の状態
enum DispatchState<'a> {
    /// 主経路の設定を確認する
    ConfigProbe,
    /// 予備経路の設定を確認する
    FallbackProbe,
    PrimaryAttempt(&'a TransportRoute),
    SecondaryAttempt(&'a TransportRoute),
    Unconfigured,
    Delivered(TransportKind, DeliveryReceipt),
    Failed(TransportKind, DeliveryErrorKind, String),
}

/// 配送ディスパッチャ
///
/// 送信経路は起動時の設定で決まり、以後は読み取り専用で共有する。
pub struct DeliveryDispatcher {
    primary:   Option<TransportRoute>,
    secondary: Option<TransportRoute>,
    renderer:  TemplateRenderer,
    timeout:   Duration,
}

impl DeliveryDispatcher {
    pub fn new(
        primary: Option<TransportRoute>,
        secondary: Option<TransportRoute>,
        renderer: TemplateRenderer,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            secondary,
            renderer,
            timeout,
        }
    }

    /// 主経路が設定済みか
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// 予備経路が設定済みか
    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// 次の配送で使われる経路（どちらも未設定なら `None`）
    pub fn active_transport(&self) -> Option<TransportKind> {
        self.primary
            .as_ref()
            .or(self.secondary.as_ref())
            .map(TransportRoute::kind)
    }

    /// お問い合わせを配送する
    ///
    /// 戻り値は常に終端状態のいずれか。エラーも [`DeliveryOutcome`] として返す。
    pub async fn dispatch(&self, inquiry: &Inquiry) -> DeliveryOutcome {
        let mut state = DispatchState::ConfigProbe;

        loop {
            state = match state {
                DispatchState::ConfigProbe => match &self.primary {
                    Some(route) => DispatchState::PrimaryAttempt(route),
                    None => DispatchState::FallbackProbe,
                },
                DispatchState::FallbackProbe => match &self.secondary {
                    Some(route) => DispatchState::SecondaryAttempt(route),
                    None => DispatchState::Unconfigured,
                },
                DispatchState::PrimaryAttempt(route) | DispatchState::SecondaryAttempt(route) => {
                    self.attempt(route, inquiry).await
                }
                DispatchState::Unconfigured => return DeliveryOutcome::unconfigured(),
                DispatchState::Delivered(kind, receipt) => {
                    return DeliveryOutcome::delivered(kind, receipt);
                }
                DispatchState::Failed(kind, error, detail) => {
                    return DeliveryOutcome::failed(kind, error, detail);
                }
            };
        }
    }

    /// 1 回の送信試行（レンダリング込み）
    async fn attempt<'a>(&self, route: &TransportRoute, inquiry: &Inquiry) -> DispatchState<'a> {
        let kind = route.kind();

        let email = match self.renderer.render(inquiry, &route.recipient) {
            Ok(email) => email,
            Err(e) => {
                return DispatchState::Failed(kind, DeliveryErrorKind::Rendering, e.to_string());
            }
        };

        tracing::debug!(transport = %kind, "通知メールを送信します");

        match tokio::time::timeout(self.timeout, route.sender.send_email(&email)).await {
            Ok(Ok(receipt)) => DispatchState::Delivered(kind, receipt),
            Ok(Err(e)) => DispatchState::Failed(kind, DeliveryErrorKind::Transport, e.to_string()),
            Err(_) => DispatchState::Failed(
                kind,
                DeliveryErrorKind::Timeout,
                format!("{} 秒以内に送信が完了しませんでした", self.timeout.as_secs_f32()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use karta_domain::{
        catalog::StaticCatalog,
        clock::FixedClock,
        inquiry::{ValidationContext, validate_inquiry},
        locale::{BundledMessages, Locale},
    };
    use karta_infra::mock::MockNotificationSender;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn make_renderer() -> TemplateRenderer {
        TemplateRenderer::new(
            Arc::new(BundledMessages),
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            )),
            "KARTA COMMERCE",
            Locale::Fr,
        )
        .unwrap()
    }

    fn make_inquiry() -> Inquiry {
        let catalog = StaticCatalog::builtin();
        let ctx = ValidationContext::new(&catalog, &BundledMessages, Locale::Fr);
        validate_inquiry(
            &json!({
                "name": "Jo",
                "email": "jo@example.com",
                "message": "Interested in the QS125-8",
            }),
            &ctx,
        )
        .unwrap()
    }

    fn route(mock: &MockNotificationSender, recipient: &str) -> Option<TransportRoute> {
        Some(TransportRoute::new(Arc::new(mock.clone()), recipient))
    }

    fn make_sut(
        primary: Option<TransportRoute>,
        secondary: Option<TransportRoute>,
    ) -> DeliveryDispatcher {
        DeliveryDispatcher::new(primary, secondary, make_renderer(), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_主経路が設定済みなら主経路のみで送信する() {
        let graph = MockNotificationSender::accepting(TransportKind::Graph);
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(route(&graph, "contact@kcg.ci"), route(&smtp, "ventes@kcg.ci"));

        let outcome = sut.dispatch(&make_inquiry()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.transport(), Some(TransportKind::Graph));
        assert_eq!(outcome.diagnostic_id(), Some("mock-graph-id"));
        assert_eq!(graph.attempts(), 1);
        assert_eq!(smtp.attempts(), 0);
        assert_eq!(graph.sent_emails()[0].to, "contact@kcg.ci");
    }

    #[tokio::test]
    async fn test_主経路が失敗しても予備経路には切り替えない() {
        let graph =
            MockNotificationSender::rejecting_auth(TransportKind::Graph, "401 invalid_client");
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(route(&graph, "contact@kcg.ci"), route(&smtp, "ventes@kcg.ci"));

        let outcome = sut.dispatch(&make_inquiry()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(DeliveryErrorKind::Transport));
        assert_eq!(outcome.transport(), Some(TransportKind::Graph));
        assert!(outcome.detail().unwrap().contains("401 invalid_client"));
        assert_eq!(graph.attempts(), 1);
        assert_eq!(smtp.attempts(), 0);
    }

    #[tokio::test]
    async fn test_主経路がなければ予備経路のみで送信する() {
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(None, route(&smtp, "ventes@kcg.ci"));

        let outcome = sut.dispatch(&make_inquiry()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.transport(), Some(TransportKind::Smtp));
        assert_eq!(smtp.attempts(), 1);
        assert_eq!(smtp.sent_emails()[0].to, "ventes@kcg.ci");
    }

    #[tokio::test]
    async fn test_予備経路の失敗はfailedを返す() {
        let smtp =
            MockNotificationSender::rejecting_send(TransportKind::Smtp, "550 mailbox unavailable");
        let sut = make_sut(None, route(&smtp, "ventes@kcg.ci"));

        let outcome = sut.dispatch(&make_inquiry()).await;

        assert_eq!(outcome.error(), Some(DeliveryErrorKind::Transport));
        assert_eq!(outcome.transport(), Some(TransportKind::Smtp));
        assert_eq!(smtp.attempts(), 1);
    }

    #[tokio::test]
    async fn test_どちらも未設定ならunconfiguredを返す() {
        let sut = make_sut(None, None);

        let outcome = sut.dispatch(&make_inquiry()).await;

        assert_eq!(outcome, DeliveryOutcome::unconfigured());
        assert_eq!(sut.active_transport(), None);
    }

    #[tokio::test]
    async fn test_期限内に終わらない送信はtimeoutとして失敗する() {
        let graph = MockNotificationSender::accepting(TransportKind::Graph)
            .with_delay(Duration::from_secs(30));
        let sut = DeliveryDispatcher::new(
            route(&graph, "contact@kcg.ci"),
            None,
            make_renderer(),
            Duration::from_millis(100),
        );

        let outcome = sut.dispatch(&make_inquiry()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.error(), Some(DeliveryErrorKind::Timeout));
        assert_eq!(outcome.transport(), Some(TransportKind::Graph));
    }

    #[tokio::test]
    async fn test_送信メールは返信先に送信者を設定する() {
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
        let sut = make_sut(None, route(&smtp, "ventes@kcg.ci"));

        sut.dispatch(&make_inquiry()).await;

        let sent = smtp.sent_emails();
        assert_eq!(sent[0].reply_to.as_deref(), Some("jo@example.com"));
        assert_eq!(sent[0].subject, "[KARTA COMMERCE contact] Nouveau contact");
    }

    #[test]
    fn test_有効な経路の判定() {
        let graph = MockNotificationSender::accepting(TransportKind::Graph);
        let smtp = MockNotificationSender::accepting(TransportKind::Smtp);

        let both = make_sut(route(&graph, "a@kcg.ci"), route(&smtp, "b@kcg.ci"));
        assert_eq!(both.active_transport(), Some(TransportKind::Graph));
        assert!(both.has_primary() && both.has_secondary());

        let fallback = make_sut(None, route(&smtp, "b@kcg.ci"));
        assert_eq!(fallback.active_transport(), Some(TransportKind::Smtp));
        assert!(!fallback.has_primary());
    }
}
