use crate::clients::HttpReportClient;
use crate::config::Config;
use crate::models::{load_input_files, GenerationState};
use crate::orchestrator::GenerateOutcome;
use crate::utils::logging::{log_generation_result, log_selection, log_startup, truncate_text};
use crate::workflow::{ReportWorkflow, WorkflowEvent};
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

/// 运行选项
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// 成功后导出报告
    pub export: bool,
    /// 成功后把原始报告输出到标准输出
    pub print_report: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            export: true,
            print_report: false,
        }
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    workflow: ReportWorkflow<HttpReportClient>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let client = HttpReportClient::new(&config).context("无法创建 HTTP 客户端")?;
        let workflow = ReportWorkflow::from_config(client, &config);

        Ok(Self { config, workflow })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 检查报告服务是否在线
    pub async fn ping(&self) -> Result<String> {
        let message = self
            .workflow
            .backend()
            .ping()
            .await
            .with_context(|| format!("报告服务无响应: {}", self.config.backend_base_url))?;
        info!("✓ 报告服务在线: {}", message);
        Ok(message)
    }

    /// 运行应用主逻辑：选择 → 生成 → 导出
    pub async fn run(&self, paths: &[PathBuf], options: RunOptions) -> Result<GenerationState> {
        let mut events = self.workflow.subscribe();

        info!("📁 正在读取 {} 个文件...", paths.len());
        let files = load_input_files(paths).await;
        self.workflow.set_selection(files);
        log_selection(self.workflow.selection_count());
        print_events(&mut events);

        let state = match self.workflow.generate().await {
            GenerateOutcome::Finished(state) => state,
            GenerateOutcome::AlreadyInFlight => bail!("已有生成请求进行中"),
        };
        log_generation_result(&state);
        print_events(&mut events);

        if let Some(error) = state.error() {
            return Err(anyhow::Error::new(error.clone()));
        }

        if let Some(report) = self.workflow.report() {
            if report.is_empty() {
                warn!("⚠️ 报告服务返回了空报告");
            }
            debug!("报告预览: {}", truncate_text(report.as_str(), 120));
            if options.print_report {
                println!("{}", report.as_str());
            }
        }

        if options.export {
            self.workflow.export_report().context("导出报告失败")?;
            print_events(&mut events);
        } else {
            info!("ℹ️ 已跳过导出");
        }

        Ok(state)
    }
}

/// 输出所有待处理的提示事件
fn print_events(events: &mut broadcast::Receiver<WorkflowEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => println!("📣 {}", event),
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("⚠️ 丢失了 {} 条提示", skipped);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}
