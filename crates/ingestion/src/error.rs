//! Ingestion 错误类型

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 无法识别的轨迹文件格式
    #[error("unsupported trace format: .{extension}")]
    TraceFormat {
        /// 文件扩展名
        extension: String,
    },

    /// 轨迹数据解析失败
    #[error("failed to parse trace at line {line}: {message}")]
    TraceParse {
        /// 行号（JSON 数组为记录序号），从 1 开始
        line: usize,
        /// 错误消息
        message: String,
    },

    /// 通道已关闭
    #[error("channel closed for source {source_id}")]
    ChannelClosed {
        /// 数据源 ID
        source_id: String,
    },

    /// 数据源已在监听
    #[error("source {source_id} is already listening")]
    AlreadyListening {
        /// 数据源 ID
        source_id: String,
    },

    /// IO 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestionError {
    pub(crate) fn trace_parse(line: usize, message: impl Into<String>) -> Self {
        Self::TraceParse {
            line,
            message: message.into(),
        }
    }
}

impl From<IngestionError> for contracts::ContractError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::TraceParse { line, message } => Self::trace_parse(line, message),
            IngestionError::Io(e) => Self::Io(e),
            IngestionError::ChannelClosed { .. } => Self::SessionClosed,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
