//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `generation` - 生成编排器
//! - 校验选择（空选择 / 没有 .txt 文件）
//! - 发出唯一的一个上传请求
//! - 解析后端响应并驱动状态机
//! - 持有 GenerationState 和 Report，外部只读
//!
//! ### `trigger` - 生成按钮状态
//! - 请求期间禁用，离开 InFlight 时必定恢复
//!
//! ## 状态机
//!
//! ```text
//! Idle / Succeeded / Failed
//!     ↓ generate()
//! validating ──(空选择)────────→ Failed(NoInput)
//!     │ ──(没有 .txt)──────────→ Failed(NoEligibleInput)
//!     ↓
//! InFlight ──(2xx + report)───→ Succeeded
//!          ──(非 2xx)──────────→ Failed(ServerError)
//!          ──(响应体无效)──────→ Failed(InvalidResponse)
//!          ──(网络异常)────────→ Failed(NetworkError)
//! ```

pub mod generation;
pub mod trigger;

pub use generation::{interpret_response, GenerateOutcome, GenerationOrchestrator};
pub use trigger::{TriggerLabels, TriggerState};
