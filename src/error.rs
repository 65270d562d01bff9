//! 错误类型
//!
//! 工作流错误（`WorkflowError`）全部在编排层/导出层就地恢复，
//! 转换为终态和面向用户的提示信息，不会作为未捕获错误向上传播。

use std::path::PathBuf;
use thiserror::Error;

/// 工作流错误
///
/// 作为 `GenerationState::Failed` 的载荷保存，因此需要 `Clone + Eq`。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// 没有选择任何文件
    #[error("尚未选择文件，请先选择要上传的批次文件")]
    NoInput,

    /// 选择的文件中没有可提交的 .txt 文件
    #[error("所选文件中没有 .txt 文件，无法生成报告")]
    NoEligibleInput,

    /// 后端返回非 2xx 状态
    #[error("服务器错误 ({status}): {detail}")]
    ServerError { status: u16, detail: String },

    /// 后端返回 2xx 但响应体无法解析或缺少 report 字段
    #[error("服务器返回的响应格式无效")]
    InvalidResponse,

    /// 网络层异常
    #[error("网络错误: {message}")]
    NetworkError { message: String },

    /// 没有可导出的报告
    #[error("尚未生成报告，请先生成报告")]
    NothingToExport,

    /// 导出触发失败（临时文件已释放）
    #[error("导出报告失败: {message}")]
    ExportFailed { message: String },
}

impl WorkflowError {
    /// 创建服务器错误
    pub fn server_error(status: u16, detail: impl Into<String>) -> Self {
        WorkflowError::ServerError {
            status,
            detail: detail.into(),
        }
    }

    /// 创建网络错误
    pub fn network_error(message: impl Into<String>) -> Self {
        WorkflowError::NetworkError {
            message: message.into(),
        }
    }
}

impl From<TransportError> for WorkflowError {
    fn from(err: TransportError) -> Self {
        WorkflowError::network_error(err.to_string())
    }
}

/// 传输层错误
///
/// 由 `ReportBackend` 实现返回，编排层统一转换为 `WorkflowError::NetworkError`。
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP 请求失败（连接、超时、读取响应体等）
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// 其他传输失败
    #[error("{0}")]
    Other(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 配置值无效
    #[error("配置项 {field} 的值无效: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 路径没有可用的文件名
    #[error("无法从路径获取文件名: {}", .path.display())]
    InvalidName { path: PathBuf },
}

/// 工作流结果类型
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_becomes_network_error() {
        let err: WorkflowError = TransportError::Other("connection reset".to_string()).into();
        assert_eq!(err, WorkflowError::network_error("connection reset"));
    }

    #[test]
    fn server_error_message_carries_status_and_detail() {
        let err = WorkflowError::server_error(500, "DB down");
        assert_eq!(err.to_string(), "服务器错误 (500): DB down");
    }
}
