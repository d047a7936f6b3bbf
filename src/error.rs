use thiserror::Error;

/// 会话层与导出层错误 (核心匹配逻辑本身不会失败)
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Session {0} not found")]
    SessionNotFound(u64),

    #[error("Item index {index} out of range (batch has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Item {0} cannot be paired with itself")]
    SelfPair(usize),

    #[error("Cannot start an import session without items")]
    EmptyBatch,

    #[error("No valid item to commit")]
    NothingToCommit,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
