//! Ports & Adapters のポート定義
//!
//! outbound（エージェント送信・時刻・ファイル・ログ）は common のものをそのまま使う。

pub mod inbound;
