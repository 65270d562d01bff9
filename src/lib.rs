//! # Batch Report Client
//!
//! 选择批次记录文件，提交给报告生成服务，预览并导出合规报告
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 与报告生成服务通信，只返回原始响应
//! - `ReportBackend` - 后端能力抽象，`HttpReportClient` 为 reqwest 实现
//!
//! ### ② 业务能力层（Services）
//! - `SelectionStore` - 保存当前选择
//! - `ReportExporter` - 导出原始报告文本
//!
//! ### ③ 编排层（Orchestration）
//! - `GenerationOrchestrator` - 校验选择、发出唯一请求、驱动生成状态机
//!
//! ### ④ 流程层（Workflow）
//! - `ReportWorkflow` - 组合以上三者，对 UI 暴露显式方法调用
//! - `WorkflowEvent` - 面向操作员的提示事件
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{HttpReportClient, ReportBackend};
pub use config::Config;
pub use error::{WorkflowError, WorkflowResult};
pub use models::{BackendResponse, GenerationState, InputFile, Report};
pub use orchestrator::{GenerateOutcome, GenerationOrchestrator};
pub use services::{DirectorySink, DownloadSink, ReportExporter, SelectionStore};
pub use workflow::{EventBus, ReportWorkflow, WorkflowEvent};
