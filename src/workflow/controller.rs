//! 上传-生成-导出工作流
//!
//! 把选择存储、生成编排器和导出服务组合在同一个事件总线上，
//! UI 层只需要调用 `set_selection` / `generate` / `export_report`。

use crate::clients::ReportBackend;
use crate::config::Config;
use crate::error::WorkflowResult;
use crate::models::{GenerationState, InputFile, Report};
use crate::orchestrator::{GenerateOutcome, GenerationOrchestrator, TriggerLabels, TriggerState};
use crate::services::{DirectorySink, DownloadSink, ReportExporter, SelectionStore};
use crate::workflow::events::{EventBus, WorkflowEvent};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// 报告工作流
pub struct ReportWorkflow<B, S = DirectorySink> {
    selection: SelectionStore,
    orchestrator: GenerationOrchestrator<B>,
    exporter: ReportExporter<S>,
    events: EventBus,
}

impl<B: ReportBackend> ReportWorkflow<B, DirectorySink> {
    /// 按配置创建工作流，导出到配置中的目录
    pub fn from_config(backend: B, config: &Config) -> Self {
        let events = EventBus::default();
        Self {
            selection: SelectionStore::new(events.clone()),
            orchestrator: GenerationOrchestrator::new(
                backend,
                config.upload_field_name.clone(),
                TriggerLabels::from_config(config),
                events.clone(),
            ),
            exporter: ReportExporter::from_config(config, events.clone()),
            events,
        }
    }
}

impl<B: ReportBackend, S: DownloadSink> ReportWorkflow<B, S> {
    /// 使用自定义下载位置创建工作流
    pub fn with_sink(backend: B, sink: S, config: &Config) -> Self {
        let events = EventBus::default();
        Self {
            selection: SelectionStore::new(events.clone()),
            orchestrator: GenerationOrchestrator::new(
                backend,
                config.upload_field_name.clone(),
                TriggerLabels::from_config(config),
                events.clone(),
            ),
            exporter: ReportExporter::new(sink, config.export_file_name.clone(), events.clone()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    /// 替换当前选择
    pub fn set_selection(&self, files: Vec<InputFile>) {
        self.selection.set_selection(files);
    }

    pub fn selection_count(&self) -> usize {
        self.selection.len()
    }

    /// 用当前选择生成报告
    pub async fn generate(&self) -> GenerateOutcome {
        self.orchestrator.generate(&self.selection).await
    }

    /// 导出最近一次成功生成的报告
    pub fn export_report(&self) -> WorkflowResult<PathBuf> {
        self.exporter.export(self.orchestrator.report().as_ref())
    }

    pub fn state(&self) -> GenerationState {
        self.orchestrator.state()
    }

    pub fn report(&self) -> Option<Report> {
        self.orchestrator.report()
    }

    pub fn preview(&self) -> Option<String> {
        self.orchestrator.preview()
    }

    pub fn trigger(&self) -> TriggerState {
        self.orchestrator.trigger()
    }

    pub fn backend(&self) -> &B {
        self.orchestrator.backend()
    }
}
