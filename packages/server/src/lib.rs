//! Hiroba chat server
//!
//! Room ごとの Coordinator がメンバーシップと履歴を管理し、
//! WebSocket で接続したクライアントにイベントを配信する。

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
