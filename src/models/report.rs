//! 报告与生成状态模型

use crate::error::WorkflowError;
use std::fmt;

/// 后端返回的原始报告文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report(String);

impl Report {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 生成状态
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(WorkflowError),
}

impl GenerationState {
    /// 是否允许再次触发生成
    pub fn can_generate(&self) -> bool {
        !matches!(self, GenerationState::InFlight)
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        match self {
            GenerationState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationState::Idle => write!(f, "空闲"),
            GenerationState::InFlight => write!(f, "生成中"),
            GenerationState::Succeeded => write!(f, "已生成"),
            GenerationState::Failed(e) => write!(f, "失败: {}", e),
        }
    }
}

/// 后端原始响应（状态码 + 响应体文本）
///
/// 不在传输层做任何解析，由编排层统一判断。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendResponse {
    pub status: u16,
    pub body: String,
}

impl BackendResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 将报告文本渲染为预览格式
///
/// 先转义 HTML 特殊字符，再把换行转换为 `<br>`。
pub fn render_preview(report: &Report) -> String {
    let mut out = String::with_capacity(report.len() + report.len() / 8);
    let mut chars = report.as_str().chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}
