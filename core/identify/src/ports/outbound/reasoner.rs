//! 推論 Outbound ポート
//!
//! 外部 API の失敗・解析不能は実装側で定型レコードに変換済みで返る。
//! Err はリクエスト自体を組み立てられなかった場合のみ。

use common::domain::{PatientContext, ResultRecord};
use common::error::Error;

/// 患者コンテキスト（と前回結果）から推論レコードを得る
pub trait Reasoner: Send + Sync {
    fn evaluate(
        &self,
        context: &PatientContext,
        prior: Option<&ResultRecord>,
    ) -> Result<ResultRecord, Error>;
}
