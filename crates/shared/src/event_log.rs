//! # ビジネスイベントログの構造化ヘルパー
//!
//! `jq` で調査しやすいよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! 既存の `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.transport`: 試行した送信経路
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const CONTACT: &str = "contact";
    }

    /// イベントアクション
    pub mod action {
        /// 通知メールの送信に成功
        pub const CONTACT_DELIVERED: &str = "contact.delivered";
        /// 設定済みの送信経路で失敗
        pub const CONTACT_FAILED: &str = "contact.failed";
        /// 入力エラーで受付を拒否
        pub const CONTACT_REJECTED: &str = "contact.rejected";
        /// 送信経路が未設定
        pub const CONTACT_UNCONFIGURED: &str = "contact.unconfigured";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const INQUIRY: &str = "inquiry";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 設定不備
        pub const CONFIGURATION: &str = "configuration";
        /// 外部サービス呼び出し（Microsoft Graph、SMTP サーバー）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// サービス内部（テンプレートレンダリングなど）
        pub const INTERNAL: &str = "internal";
    }

    /// エラー種別
    pub mod kind {
        pub const MAIL_UNCONFIGURED: &str = "mail_unconfigured";
        pub const MAIL_TRANSPORT: &str = "mail_transport";
        pub const MAIL_TIMEOUT: &str = "mail_timeout";
        pub const TEMPLATE_RENDERING: &str = "template_rendering";
    }
}
