//! # Contact Service サーバー
//!
//! サイトのお問い合わせフォームを受け付け、通知メールを配送するサービス。
//!
//! ## 送信経路
//!
//! | 優先 | 経路 | 有効になる条件 |
//! |------|------|----------------|
//! | 1 | Microsoft Graph | テナント ID・クライアント ID・シークレットがすべて設定済み |
//! | 2 | SMTP | Graph が無効で、ホスト・ユーザー・パスワードが設定済み |
//!
//! 1 件のお問い合わせで試すのは上の表で最初に有効な経路だけ。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CONTACT_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CONTACT_PORT` | No | ポート番号（デフォルト: `3000`） |
//! | `MICROSOFT_GRAPH_TENANT_ID` ほか | No | 主経路の資格情報 |
//! | `EMAIL_FROM` | Graph 使用時 | 送信元メールボックス |
//! | `SMTP_HOST` / `SMTP_USER` / `SMTP_PASS` | No | 予備経路 |
//! | `CONTACT_EMAIL` | No | お問い合わせの受信箱 |
//! | `LOG_FORMAT` | No | `json` または `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! cargo run -p karta-contact-service
//! ```

use std::net::SocketAddr;

use karta_contact_service::{
    app_builder::{AppDependencies, build_router},
    config::ContactConfig,
};
use karta_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("contact-service"));

    let config = ContactConfig::from_env()?;

    let deps = AppDependencies::from_config(&config.mail)?;
    match deps.dispatcher.active_transport() {
        Some(transport) => tracing::info!(%transport, "メール送信経路を選択しました"),
        None => tracing::warn!(
            "メール送信経路が設定されていません。お問い合わせは受け付けますが配送できません"
        ),
    }

    let app = build_router(deps);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Contact Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "シグナルハンドラの登録に失敗しました");
    }
    tracing::info!("シャットダウンします");
}
