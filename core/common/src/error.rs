//! エラーハンドリング
//!
//! 全レイヤーで共通の `Error` 型。終了コードは sysexits に揃える。

/// 共通エラー型
///
/// 各バリアントはメッセージのみを持つ（発生元の型は境界で文字列化する）。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Json(String),
    #[error("{0}")]
    Http(String),
    #[error("{0}")]
    Env(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    /// I/O エラー
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// JSON の解析・生成エラー
    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    /// HTTP 通信エラー（接続失敗・非 2xx・読み取り失敗）
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// 環境変数・設定の不備
    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Env(_) => 78,
            Self::Io(_) | Self::Json(_) | Self::Http(_) => 74,
            Self::System(_) => 70,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
