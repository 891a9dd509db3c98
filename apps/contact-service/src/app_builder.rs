//! # アプリケーション構築
//!
//! DI（送信経路・State）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。
//!
//! テストでは [`build_router`] にモックの送信経路を組み込んだ依存を渡す。

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use karta_domain::{
    catalog::{ProductCatalog, StaticCatalog},
    clock::{Clock, SystemClock},
    locale::{BundledMessages, MessageCatalog},
    notification::NotificationError,
};
use karta_infra::notification::{GraphNotificationSender, SmtpNotificationSender};
use karta_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::MailConfig,
    handler::{
        CatalogState,
        ContactState,
        ReadinessState,
        get_product,
        health_check,
        list_products,
        readiness_check,
        submit_contact,
        validate_contact,
    },
    usecase::{ContactUseCase, DeliveryDispatcher, TemplateRenderer, TransportRoute},
};

/// ルーターが必要とする依存一式
pub struct AppDependencies {
    pub catalog:    Arc<dyn ProductCatalog>,
    pub messages:   Arc<dyn MessageCatalog>,
    pub dispatcher: DeliveryDispatcher,
}

impl AppDependencies {
    /// 設定から本番用の依存を組み立てる
    pub fn from_config(mail: &MailConfig) -> Result<Self, NotificationError> {
        let messages: Arc<dyn MessageCatalog> = Arc::new(BundledMessages);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        Ok(Self {
            catalog: Arc::new(StaticCatalog::builtin()),
            dispatcher: build_dispatcher(mail, messages.clone(), clock)?,
            messages,
        })
    }
}

/// 設定済みの送信経路からディスパッチャを組み立てる
pub fn build_dispatcher(
    mail: &MailConfig,
    messages: Arc<dyn MessageCatalog>,
    clock: Arc<dyn Clock>,
) -> Result<DeliveryDispatcher, NotificationError> {
    let primary = match &mail.graph {
        Some(graph) => {
            let sender = GraphNotificationSender::new(
                graph.credentials.clone(),
                graph.endpoints.clone(),
                graph.from_address.clone(),
                mail.send_timeout,
            )?;
            Some(TransportRoute::new(Arc::new(sender), graph.recipient.clone()))
        }
        None => None,
    };

    let secondary = match &mail.smtp {
        Some(smtp) => {
            let sender = SmtpNotificationSender::new(&smtp.settings, mail.send_timeout)?;
            Some(TransportRoute::new(Arc::new(sender), smtp.recipient.clone()))
        }
        None => None,
    };

    let renderer = TemplateRenderer::new(
        messages,
        clock,
        mail.brand.clone(),
        mail.notification_locale,
    )?;

    Ok(DeliveryDispatcher::new(
        primary,
        secondary,
        renderer,
        mail.send_timeout,
    ))
}

/// ルーターを構築する
pub fn build_router(deps: AppDependencies) -> Router {
    let readiness_state = Arc::new(ReadinessState {
        graph_configured: deps.dispatcher.has_primary(),
        smtp_configured:  deps.dispatcher.has_secondary(),
    });
    let catalog_state = Arc::new(CatalogState {
        catalog:  deps.catalog.clone(),
        messages: deps.messages.clone(),
    });
    let contact_state = Arc::new(ContactState {
        usecase: ContactUseCase::new(deps.catalog, deps.messages, deps.dispatcher),
    });

    Router::new()
        .route("/health", get(health_check))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        .merge(
            Router::new()
                .route("/api/contact", post(submit_contact))
                .route("/api/contact/validate", post(validate_contact))
                .with_state(contact_state),
        )
        .merge(
            Router::new()
                .route("/api/products", get(list_products))
                .route("/api/products/{id}", get(get_product))
                .with_state(catalog_state),
        )
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（またはクライアント提供値を使用）
        // 2. TraceLayer: スパンに request_id を含め、全ログに自動注入
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
