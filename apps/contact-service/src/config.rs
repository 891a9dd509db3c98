//! # Contact Service 設定
//!
//! 環境変数から Contact Service サーバーの設定を読み込む。
//!
//! 読み込みは起動時に 1 回だけ行う。値の取得は lookup 関数経由で行い、
//! テストでは `HashMap` を渡して環境変数に触れずに検証する。
//! 空文字（空白のみを含む）の値は未設定として扱う。

use std::{env, time::Duration};

use karta_domain::{inquiry::is_valid_email, locale::Locale};
use karta_infra::notification::{GraphCredentials, GraphEndpoints, SmtpSettings};
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_BRAND: &str = "KARTA COMMERCE";
const DEFAULT_SEND_TIMEOUT_SECS: u64 = 15;

/// SMTP の From 表示名
const SMTP_SENDER_NAME: &str = "KARTA COMMERCE GENERAL";

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{name} が設定されていません（{reason}）")]
    Missing {
        name:   &'static str,
        reason: &'static str,
    },

    /// 値の形式が不正
    #[error("{name} の値が不正です: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Contact Service サーバーの設定
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// バインドアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// メール送信設定
    pub mail: MailConfig,
}

/// メール送信の設定
///
/// 送信経路はそれぞれ「必要な値がすべて揃っている」場合にのみ `Some` になる。
/// どちらを使うかの判定はディスパッチャが行う。
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// 主経路（Microsoft Graph）
    pub graph:               Option<GraphRoute>,
    /// 予備経路（SMTP）
    pub smtp:                Option<SmtpRoute>,
    /// 件名のブランド表記
    pub brand:               String,
    /// 通知メールの言語
    pub notification_locale: Locale,
    /// 送信試行 1 回あたりの上限
    pub send_timeout:        Duration,
}

/// Microsoft Graph 経路の設定
#[derive(Debug, Clone)]
pub struct GraphRoute {
    pub credentials:  GraphCredentials,
    pub endpoints:    GraphEndpoints,
    /// 送信元メールボックス（`EMAIL_FROM`）
    pub from_address: String,
    /// お問い合わせの受信箱（`CONTACT_EMAIL`、未設定なら `EMAIL_FROM`）
    pub recipient:    String,
}

/// SMTP 経路の設定
#[derive(Debug, Clone)]
pub struct SmtpRoute {
    pub settings:  SmtpSettings,
    /// お問い合わせの受信箱（`CONTACT_EMAIL`、未設定なら `SMTP_USER`）
    pub recipient: String,
}

impl ContactConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の lookup 関数から設定を読み込む
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            host: vars.get("CONTACT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: vars.parse("CONTACT_PORT", DEFAULT_PORT)?,
            mail: MailConfig::from_vars(&vars)?,
        })
    }
}

impl MailConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let notification_locale = match vars.get("NOTIFICATION_LOCALE") {
            Some(code) => Locale::from_code(&code).ok_or(ConfigError::Invalid {
                name:  "NOTIFICATION_LOCALE",
                value: code,
            })?,
            None => Locale::default(),
        };

        let timeout_secs: u64 = vars.parse("MAIL_SEND_TIMEOUT_SECS", DEFAULT_SEND_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name:  "MAIL_SEND_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            graph: probe_graph(vars)?,
            smtp: probe_smtp(vars)?,
            brand: vars.get("MAIL_BRAND").unwrap_or_else(|| DEFAULT_BRAND.to_string()),
            notification_locale,
            send_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Graph の資格情報 3 点が揃っているか調べる
///
/// 一部だけ設定されている場合は未設定として扱い、警告を残す。
fn probe_graph<F>(vars: &Vars<F>) -> Result<Option<GraphRoute>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let tenant_id = vars.get("MICROSOFT_GRAPH_TENANT_ID");
    let client_id = vars.get("MICROSOFT_GRAPH_CLIENT_ID");
    let client_secret = vars.get("MICROSOFT_GRAPH_CLIENT_SECRET");

    let (tenant_id, client_id, client_secret) = match (tenant_id, client_id, client_secret) {
        (Some(t), Some(c), Some(s)) => (t, c, s),
        (None, None, None) => return Ok(None),
        (t, c, s) => {
            tracing::warn!(
                tenant_id = t.is_some(),
                client_id = c.is_some(),
                client_secret = s.is_some(),
                "Microsoft Graph の資格情報が一部のみ設定されています。主経路は無効として扱います"
            );
            return Ok(None);
        }
    };

    let from_address = vars.get("EMAIL_FROM").ok_or(ConfigError::Missing {
        name:   "EMAIL_FROM",
        reason: "Microsoft Graph を使う場合は送信元メールボックスが必要です",
    })?;

    let defaults = GraphEndpoints::default();
    let endpoints = GraphEndpoints {
        login_base_url: vars.get("GRAPH_LOGIN_BASE_URL").unwrap_or(defaults.login_base_url),
        api_base_url:   vars.get("GRAPH_API_BASE_URL").unwrap_or(defaults.api_base_url),
    };

    Ok(Some(GraphRoute {
        credentials: GraphCredentials {
            tenant_id,
            client_id,
            client_secret,
        },
        endpoints,
        recipient: vars.get("CONTACT_EMAIL").unwrap_or_else(|| from_address.clone()),
        from_address,
    }))
}

/// SMTP のホスト・ユーザー・パスワードが揃っているか調べる
fn probe_smtp<F>(vars: &Vars<F>) -> Result<Option<SmtpRoute>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (Some(host), Some(username), Some(password)) = (
        vars.get("SMTP_HOST"),
        vars.get("SMTP_USER"),
        vars.get("SMTP_PASS"),
    ) else {
        return Ok(None);
    };

    // 送信元と受信箱は SMTP_USER で補完した後に検証する
    let from_address = vars.get("SMTP_FROM").unwrap_or_else(|| username.clone());
    if !is_valid_email(&from_address) {
        return Err(ConfigError::Invalid {
            name:  "SMTP_FROM",
            value: from_address,
        });
    }

    let settings = SmtpSettings {
        port: vars.parse("SMTP_PORT", DEFAULT_SMTP_PORT)?,
        secure: vars.get("SMTP_SECURE").as_deref() == Some("true"),
        from_address,
        sender_name: SMTP_SENDER_NAME.to_string(),
        host,
        password,
        username,
    };

    let recipient = vars
        .get("CONTACT_EMAIL")
        .unwrap_or_else(|| settings.username.clone());
    if !is_valid_email(&recipient) {
        return Err(ConfigError::Invalid {
            name:  "CONTACT_EMAIL",
            value: recipient,
        });
    }

    Ok(Some(SmtpRoute {
        recipient,
        settings,
    }))
}

/// 空値を未設定とみなす lookup のラッパー
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T: std::str::FromStr>(
        &self,
        name: &'static str,
        default: T,
    ) -> Result<T, ConfigError> {
        match self.get(name) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
            None => Ok(default),
        }
    }
}
