//! medagent 共通ライブラリ
//!
//! `identify` と `confidence` コマンドで共有される機能を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（患者コンテキスト・推論結果・確信度）
pub mod domain;

/// ポート（外界への依存を trait で表す）
pub mod ports;

/// ポートの標準実装
pub mod adapter;

/// LLM プロバイダと設定
pub mod llm;

/// 会話エージェント接続
pub mod agent;
