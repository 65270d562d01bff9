//! 生成按钮（触发器）状态
//!
//! 进入 InFlight 时禁用按钮并显示忙碌文字；离开 InFlight 时无论结果如何都恢复。
//! 恢复逻辑放在 `TriggerGuard::drop` 中，请求的 future 被中途丢弃时同样生效。

use crate::config::Config;
use crate::error::WorkflowError;
use crate::models::GenerationState;
use crate::orchestrator::generation::{lock_inner, OrchestratorInner};
use std::sync::Mutex;
use tracing::warn;

/// 触发器当前状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerState {
    pub enabled: bool,
    pub label: String,
}

/// 触发器文字
#[derive(Debug, Clone)]
pub struct TriggerLabels {
    pub idle: String,
    pub busy: String,
}

impl TriggerLabels {
    pub fn from_config(config: &Config) -> Self {
        Self {
            idle: config.trigger_label.clone(),
            busy: config.busy_label.clone(),
        }
    }

    pub fn idle_state(&self) -> TriggerState {
        TriggerState {
            enabled: true,
            label: self.idle.clone(),
        }
    }
}

impl Default for TriggerLabels {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// 请求期间持有的守卫
pub(crate) struct TriggerGuard<'a> {
    inner: &'a Mutex<OrchestratorInner>,
    idle: TriggerState,
}

impl<'a> TriggerGuard<'a> {
    /// 禁用触发器
    ///
    /// 调用方已持有 `mutex` 的锁，并通过 `inner` 传入被锁住的数据。
    pub(crate) fn engage(
        mutex: &'a Mutex<OrchestratorInner>,
        inner: &mut OrchestratorInner,
        labels: &TriggerLabels,
    ) -> Self {
        inner.trigger = TriggerState {
            enabled: false,
            label: labels.busy.clone(),
        };
        Self {
            inner: mutex,
            idle: labels.idle_state(),
        }
    }
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        let mut inner = lock_inner(self.inner);
        inner.trigger = self.idle.clone();

        if inner.state == GenerationState::InFlight {
            warn!("⚠️ 生成请求在完成前被中断");
            inner.state = GenerationState::Failed(WorkflowError::network_error(
                "请求在完成前被中断",
            ));
        }
    }
}
