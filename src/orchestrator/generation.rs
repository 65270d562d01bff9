//! 生成编排器 - 编排层
//!
//! 核心职责：把当前选择变成一次报告生成请求，并维护生成状态
//!
//! 流程顺序：
//! 1. 校验选择（空 / 没有 .txt）
//! 2. 过滤出 .txt 文件，发出唯一一个 multipart 请求
//! 3. 解析响应 → Succeeded / Failed
//!
//! 请求进行中再次调用 `generate()` 直接忽略，不会产生第二个请求。

use crate::clients::ReportBackend;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::{partition_eligible, render_preview, BackendResponse, GenerationState, InputFile, Report};
use crate::orchestrator::trigger::{TriggerGuard, TriggerLabels, TriggerState};
use crate::services::SelectionStore;
use crate::workflow::events::{EventBus, WorkflowEvent};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// 一次 `generate()` 调用的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// 已走完状态机，携带最终状态
    Finished(GenerationState),
    /// 已有请求进行中，本次调用被忽略
    AlreadyInFlight,
}

/// 编排器内部可变状态
///
/// 只有编排器（以及它发出的 TriggerGuard）会写入。
pub(crate) struct OrchestratorInner {
    pub(crate) state: GenerationState,
    pub(crate) report: Option<Report>,
    pub(crate) preview: Option<String>,
    pub(crate) trigger: TriggerState,
}

pub(crate) fn lock_inner(mutex: &Mutex<OrchestratorInner>) -> MutexGuard<'_, OrchestratorInner> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Deserialize)]
struct SuccessBody {
    report: String,
}

/// 生成编排器
pub struct GenerationOrchestrator<B> {
    backend: B,
    field_name: String,
    labels: TriggerLabels,
    inner: Mutex<OrchestratorInner>,
    events: EventBus,
}

impl<B: ReportBackend> GenerationOrchestrator<B> {
    /// 创建新的生成编排器
    ///
    /// # 参数
    /// - `backend`: 报告生成后端
    /// - `field_name`: multipart 表单中文件共用的字段名
    /// - `labels`: 触发器文字
    /// - `events`: 事件总线
    pub fn new(backend: B, field_name: impl Into<String>, labels: TriggerLabels, events: EventBus) -> Self {
        let trigger = labels.idle_state();
        Self {
            backend,
            field_name: field_name.into(),
            labels,
            inner: Mutex::new(OrchestratorInner {
                state: GenerationState::Idle,
                report: None,
                preview: None,
                trigger,
            }),
            events,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> GenerationState {
        lock_inner(&self.inner).state.clone()
    }

    /// 最近一次成功生成的原始报告
    pub fn report(&self) -> Option<Report> {
        lock_inner(&self.inner).report.clone()
    }

    /// 报告预览（已转换换行）
    pub fn preview(&self) -> Option<String> {
        lock_inner(&self.inner).preview.clone()
    }

    pub fn trigger(&self) -> TriggerState {
        lock_inner(&self.inner).trigger.clone()
    }

    /// 生成报告
    ///
    /// 选择快照在校验通过的那一刻取得，之后的选择变化只影响下一次调用。
    pub async fn generate(&self, selection: &SelectionStore) -> GenerateOutcome {
        let (eligible, guard) = {
            let mut inner = lock_inner(&self.inner);
            if !inner.state.can_generate() {
                debug!("已有生成请求进行中，忽略本次触发");
                return GenerateOutcome::AlreadyInFlight;
            }

            // 新的尝试开始，旧报告作废
            inner.report = None;
            inner.preview = None;

            let snapshot = selection.snapshot();
            debug!("校验选择: {} 个文件", snapshot.len());

            match validate_selection(&snapshot) {
                Ok((eligible, skipped)) => {
                    inner.state = GenerationState::InFlight;
                    let guard = TriggerGuard::engage(&self.inner, &mut inner, &self.labels);

                    for name in &skipped {
                        warn!("⚠️ 跳过非 .txt 文件: {}", name);
                    }
                    info!("📤 正在提交 {} 个文件生成报告...", eligible.len());
                    self.events.emit(WorkflowEvent::GenerationStarted {
                        file_count: eligible.len(),
                        skipped,
                    });

                    (eligible, guard)
                }
                Err(error) => {
                    inner.state = GenerationState::Failed(error.clone());
                    drop(inner);
                    warn!("❌ {}", error);
                    self.events.emit(WorkflowEvent::GenerationFailed { error: error.clone() });
                    return GenerateOutcome::Finished(GenerationState::Failed(error));
                }
            }
        };

        let outcome = match self.backend.upload(&self.field_name, &eligible).await {
            Ok(response) => interpret_response(response),
            Err(e) => Err(WorkflowError::from(e)),
        };

        let state = {
            let mut inner = lock_inner(&self.inner);
            match &outcome {
                Ok(report) => {
                    inner.preview = Some(render_preview(report));
                    inner.report = Some(report.clone());
                    inner.state = GenerationState::Succeeded;
                }
                Err(error) => {
                    inner.state = GenerationState::Failed(error.clone());
                }
            }
            inner.state.clone()
        };
        drop(guard);

        match outcome {
            Ok(report) => {
                info!("✓ 报告生成成功 ({} 字节)", report.len());
                self.events.emit(WorkflowEvent::GenerationSucceeded {
                    report_len: report.len(),
                });
            }
            Err(error) => {
                warn!("❌ 报告生成失败: {}", error);
                self.events.emit(WorkflowEvent::GenerationFailed { error });
            }
        }

        GenerateOutcome::Finished(state)
    }
}

/// 校验选择并过滤出可提交文件
///
/// # 返回
/// 返回 (可提交文件, 被跳过的文件名)
fn validate_selection(files: &[InputFile]) -> WorkflowResult<(Vec<InputFile>, Vec<String>)> {
    if files.is_empty() {
        return Err(WorkflowError::NoInput);
    }

    let (eligible, skipped) = partition_eligible(files);
    if eligible.is_empty() {
        return Err(WorkflowError::NoEligibleInput);
    }

    Ok((eligible, skipped))
}

/// 解析后端响应
///
/// - 2xx 且响应体为带字符串 `report` 字段的 JSON → 报告
/// - 2xx 但响应体无效 → `InvalidResponse`
/// - 非 2xx → `ServerError`，优先使用响应体中的 `detail`
pub fn interpret_response(response: BackendResponse) -> WorkflowResult<Report> {
    if !response.is_success() {
        let detail = extract_detail(&response.body)
            .unwrap_or_else(|| format!("报告服务返回错误状态 {}", response.status));
        return Err(WorkflowError::server_error(response.status, detail));
    }

    serde_json::from_str::<SuccessBody>(&response.body)
        .map(|body| Report::new(body.report))
        .map_err(|e| {
            debug!("响应体解析失败: {}", e);
            WorkflowError::InvalidResponse
        })
}

fn extract_detail(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        // 例如校验错误返回的数组
        other => Some(other.to_string()),
    }
}
