//! # お問い合わせ API の統合テスト
//!
//! ルーター全体を `oneshot` で呼び出し、送信経路の設定ごとのレスポンスを検証する。
//! 送信経路は `karta-infra` のモックに差し替える。

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::{TimeZone, Utc};
use karta_contact_service::{
    app_builder::{AppDependencies, build_router},
    usecase::{DeliveryDispatcher, TemplateRenderer, TransportRoute},
};
use karta_domain::{
    catalog::StaticCatalog,
    clock::FixedClock,
    locale::{BundledMessages, Locale, MessageCatalog},
    notification::TransportKind,
};
use karta_infra::mock::MockNotificationSender;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

const RECIPIENT: &str = "contact@kcg.ci";

fn test_app(
    primary: Option<&MockNotificationSender>,
    secondary: Option<&MockNotificationSender>,
) -> Router {
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
    let to_route =
        |mock: &MockNotificationSender| TransportRoute::new(Arc::new(mock.clone()), RECIPIENT);

    build_router(AppDependencies {
        catalog: Arc::new(StaticCatalog::builtin()),
        messages,
        dispatcher: DeliveryDispatcher::new(
            primary.map(to_route),
            secondary.map(to_route),
            renderer,
            Duration::from_secs(1),
        ),
    })
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn jo_body() -> Value {
    json!({
        "name": "Jo",
        "email": "jo@example.com",
        "message": "Interested in the QS125-8",
    })
}

#[tokio::test]
async fn test_送信経路がなければ500で設定エラーを返す() {
    let app = test_app(None, None);

    let (status, body) = send(app, post_json("/api/contact", &jo_body())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Configuration email non disponible" }));
}

#[tokio::test]
async fn test_同じ入力は検証エンドポイントでは受け付ける() {
    let app = test_app(None, None);

    let (status, body) = send(app, post_json("/api/contact/validate", &jo_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));
}

#[tokio::test]
async fn test_3項目が不正なら400で3件の詳細を返す() {
    let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
    let app = test_app(None, Some(&smtp));
    let input = json!({ "name": "A", "email": "bad-email", "message": "hi" });

    let (status, body) = send(app, post_json("/api/contact", &input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Données du formulaire invalides");
    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
    let fields: Vec<&str> = details
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "message"]);
    assert_eq!(details[1]["code"], "invalid_format");
    assert_eq!(details[1]["message"], "Email invalide");
    assert_eq!(smtp.attempts(), 0);
}

#[tokio::test]
async fn test_入力エラーは送信経路が未設定でも400を返す() {
    let app = test_app(None, None);
    let input = json!({ "name": "A", "email": "bad-email", "message": "hi" });

    let (status, _body) = send(app, post_json("/api/contact", &input)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_主経路で送信できたら200を返す() {
    let graph = MockNotificationSender::accepting(TransportKind::Graph);
    let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
    let app = test_app(Some(&graph), Some(&smtp));

    let (status, body) = send(app, post_json("/api/contact", &jo_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "message": "Email envoyé avec succès" })
    );
    assert_eq!(graph.attempts(), 1);
    assert_eq!(smtp.attempts(), 0);

    let sent = graph.sent_emails();
    assert_eq!(sent[0].to, RECIPIENT);
    assert_eq!(sent[0].reply_to.as_deref(), Some("jo@example.com"));
}

#[tokio::test]
async fn test_主経路の失敗は予備経路を試さず500を返す() {
    let graph = MockNotificationSender::rejecting_auth(TransportKind::Graph, "AADSTS7000215");
    let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
    let app = test_app(Some(&graph), Some(&smtp));

    let (status, body) = send(app, post_json("/api/contact", &jo_body())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Erreur lors de l'envoi de l'email" }));
    assert!(!body.to_string().contains("AADSTS7000215"));
    assert_eq!(graph.attempts(), 1);
    assert_eq!(smtp.attempts(), 0);
}

#[tokio::test]
async fn test_主経路がなければ予備経路のみで送信する() {
    let smtp = MockNotificationSender::accepting(TransportKind::Smtp);
    let app = test_app(None, Some(&smtp));

    let (status, _body) = send(app, post_json("/api/contact", &jo_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(smtp.attempts(), 1);
}

#[tokio::test]
async fn test_送信がタイムアウトしたら500を返す() {
    let smtp =
        MockNotificationSender::accepting(TransportKind::Smtp).with_delay(Duration::from_secs(30));
    let app = test_app(None, Some(&smtp));

    let (status, body) = send(app, post_json("/api/contact", &jo_body())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Erreur lors de l'envoi de l'email");
}

#[tokio::test]
async fn test_jsonでない本文は400で空の詳細を返す() {
    let app = test_app(None, None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .body(Body::from("name=Jo&email=jo@example.com"))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "error": "Le corps de la requête n'est pas un JSON valide",
            "details": [],
        })
    );
}

#[tokio::test]
async fn test_accept_languageが英語なら英語で返す() {
    let app = test_app(None, None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact")
        .header(CONTENT_TYPE, "application/json")
        .header("accept-language", "en-GB,en;q=0.9")
        .body(Body::from(
            json!({
                "name": "A",
                "email": "jo@example.com",
                "message": "Hello there, I need a quote",
            })
            .to_string(),
        ))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid form data");
    assert_eq!(body["details"][0]["message"], "Name must be at least 2 characters");
}

#[tokio::test]
async fn test_localeクエリはaccept_languageより優先する() {
    let app = test_app(None, None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/contact?locale=en")
        .header("accept-language", "fr-CI")
        .body(Body::from(jo_body().to_string()))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Email configuration unavailable");
}

#[tokio::test]
async fn test_商品一覧はカタログの6件を返す() {
    let app = test_app(None, None);
    let request = Request::builder()
        .uri("/api/products")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["QS125-8", "DFK-QS150ZH", "QS125-8A", "QS50-3", "QS125-10", "QS125-30"]
    );
}

#[tokio::test]
async fn test_商品は大文字小文字を区別せずに引ける() {
    let app = test_app(None, None);
    let request = Request::builder()
        .uri("/api/products/dfk-qs150zh")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "DFK-QS150ZH");
    assert_eq!(body["data"]["name"], "DFK QS150ZH");
    assert_eq!(body["data"]["subtitle"], "Tricycle cargo 150 cm³");
    assert_eq!(body["data"]["maxLoad"], "1 000 kg");
}

#[tokio::test]
async fn test_存在しない商品は404を返す() {
    let app = test_app(None, None);
    let request = Request::builder()
        .uri("/api/products/QS999?locale=en")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Product not found" }));
}
