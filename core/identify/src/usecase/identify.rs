//! 推論の組み立て（1 回目・2 回目の振り分けとファイル入出力）
//!
//! Reasoner の Err はここで分析失敗レコードに変える。呼び出し側へ Err は返さない。

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use common::domain::{PatientContext, ResultRecord};
use common::ports::outbound::{now_iso8601, Log, LogLevel, LogRecord};
use serde_json::{json, Value};

use crate::ports::outbound::{CaseStore, Reasoner};

/// 推論ユースケース
pub struct IdentifyUseCase {
    reasoner: Arc<dyn Reasoner>,
    store: Arc<dyn CaseStore>,
    log: Arc<dyn Log>,
}

impl IdentifyUseCase {
    pub fn new(reasoner: Arc<dyn Reasoner>, store: Arc<dyn CaseStore>, log: Arc<dyn Log>) -> Self {
        Self { reasoner, store, log }
    }

    fn log(&self, level: LogLevel, kind: &str, message: String, fields: Option<BTreeMap<String, Value>>) {
        let _ = self.log.log(&LogRecord {
            ts: now_iso8601(),
            level,
            message,
            layer: Some("usecase".to_string()),
            kind: Some(kind.to_string()),
            fields,
        });
    }

    /// 前回結果が無ければ 1 回目、あれば 2 回目として推論する
    pub fn run(&self, context: &PatientContext, prior: Option<&ResultRecord>) -> ResultRecord {
        let message = if prior.is_some() {
            "processing second round"
        } else {
            "processing initial analysis"
        };
        self.log(LogLevel::Info, "identify", message.to_string(), None);

        match self.reasoner.evaluate(context, prior) {
            Ok(record) => record,
            Err(e) => {
                self.log(LogLevel::Error, "error", format!("analysis failed: {}", e), None);
                ResultRecord::analysis_failed(e)
            }
        }
    }

    /// 入力ファイルを読み、推論し、`output_dir` があれば結果を保存する
    ///
    /// 入力（または前回結果）が読めなければ None。保存の失敗はログのみで結果は返す。
    pub fn run_file(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        prior: Option<&Path>,
    ) -> Option<(PatientContext, ResultRecord)> {
        let context = match self.store.load_context(input) {
            Ok(c) => c,
            Err(e) => {
                self.log_load_failure(input, &e.to_string());
                return None;
            }
        };
        let prior_record = match prior.map(|p| (p, self.store.load_result(p))) {
            None => None,
            Some((_, Ok(r))) => Some(r),
            Some((path, Err(e))) => {
                self.log_load_failure(path, &e.to_string());
                return None;
            }
        };

        let result = self.run(&context, prior_record.as_ref());

        if let Some(dir) = output_dir {
            let mut fields = BTreeMap::new();
            fields.insert("output_dir".to_string(), json!(dir.display().to_string()));
            match self.store.save(dir, &context, &result) {
                Ok(()) => self.log(LogLevel::Info, "io", "results saved".to_string(), Some(fields)),
                Err(e) => self.log(
                    LogLevel::Error,
                    "io",
                    format!("failed to save results: {}", e),
                    Some(fields),
                ),
            }
        }
        Some((context, result))
    }

    fn log_load_failure(&self, path: &Path, cause: &str) {
        let mut fields = BTreeMap::new();
        fields.insert("path".to_string(), json!(path.display().to_string()));
        self.log(
            LogLevel::Error,
            "io",
            format!("failed to load input: {}", cause),
            Some(fields),
        );
    }
}
