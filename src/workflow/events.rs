//! 工作流事件
//!
//! 面向操作员的提示（"已选择 N 个文件"、生成成功/失败、开始导出）
//! 通过广播通道发给任意数量的监听者，核心不依赖具体 UI。

use crate::error::WorkflowError;
use std::fmt;
use std::path::PathBuf;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// 工作流事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// 选择被替换
    SelectionChanged { count: usize },
    /// 请求已发出
    GenerationStarted {
        file_count: usize,
        skipped: Vec<String>,
    },
    /// 生成成功
    GenerationSucceeded { report_len: usize },
    /// 生成失败
    GenerationFailed { error: WorkflowError },
    /// 已触发导出
    ExportStarted { path: PathBuf },
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowEvent::SelectionChanged { count } => {
                write!(f, "已选择 {} 个文件", count)
            }
            WorkflowEvent::GenerationStarted {
                file_count,
                skipped,
            } if skipped.is_empty() => write!(f, "正在提交 {} 个文件...", file_count),
            WorkflowEvent::GenerationStarted {
                file_count,
                skipped,
            } => write!(
                f,
                "正在提交 {} 个文件（跳过非 .txt 文件: {}）...",
                file_count,
                skipped.join(", ")
            ),
            WorkflowEvent::GenerationSucceeded { .. } => write!(f, "报告生成成功"),
            WorkflowEvent::GenerationFailed { error } => write!(f, "{}", error),
            WorkflowEvent::ExportStarted { path } => {
                write!(f, "报告已导出到 {}", path.display())
            }
        }
    }
}

/// 事件总线
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }

    /// 发送事件，没有监听者时直接丢弃
    pub fn emit(&self, event: WorkflowEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
