//! ファイルシステム上の CaseStore 実装（JSON を 2 スペースインデントで書く）

use std::path::Path;
use std::sync::Arc;

use common::domain::{PatientContext, ResultRecord};
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ports::outbound::case_store::{CaseStore, CONTEXT_FILE, RESULT_FILE};

/// FileSystem ポート経由で読み書きする CaseStore
pub struct FsCaseStore {
    fs: Arc<dyn FileSystem>,
}

impl FsCaseStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, Error> {
        let contents = self.fs.read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| Error::json(format!("Failed to parse '{}': {}", path.display(), e)))
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(value)?;
        self.fs.write(path, &json)
    }
}

impl CaseStore for FsCaseStore {
    fn load_context(&self, path: &Path) -> Result<PatientContext, Error> {
        self.read_json(path)
    }

    fn load_result(&self, path: &Path) -> Result<ResultRecord, Error> {
        self.read_json(path)
    }

    fn save(&self, dir: &Path, context: &PatientContext, result: &ResultRecord) -> Result<(), Error> {
        self.fs.create_dir_all(dir)?;
        self.write_json(&dir.join(CONTEXT_FILE), context)?;
        self.write_json(&dir.join(RESULT_FILE), result)
    }
}
