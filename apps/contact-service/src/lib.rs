//! # Contact Service ライブラリ
//!
//! お問い合わせ送信経路の HTTP サービス。
//!
//! ## モジュール構成
//!
//! - `app_builder`: 依存の組み立てとルーター構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `usecase`: 検証・レンダリング・配送

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
