/// 日志工具模块
///
/// 提供日志初始化以及格式化输出的辅助函数
use crate::config::Config;
use crate::models::GenerationState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先级: RUST_LOG > verbose 参数 > 默认 info。
/// 重复调用不会 panic（测试中会多次初始化）。
pub fn init(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 批次报告客户端启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 报告服务: {}", config.upload_url());
    info!("📁 导出位置: {}", config.export_path().display());
    info!("{}", "=".repeat(60));
}

/// 记录文件选择结果
///
/// # 参数
/// - `count`: 已选择的文件数
pub fn log_selection(count: usize) {
    if count == 0 {
        warn!("⚠️ 没有选择任何文件");
    } else {
        info!("✓ 已选择 {} 个文件，准备就绪", count);
    }
}

/// 记录生成结果
pub fn log_generation_result(state: &GenerationState) {
    info!("{}", "─".repeat(60));
    match state {
        GenerationState::Succeeded => info!("✅ 报告生成成功"),
        GenerationState::Failed(e) => warn!("❌ 报告生成失败: {}", e),
        GenerationState::Idle | GenerationState::InFlight => {
            info!("ℹ️ 当前状态: {}", state)
        }
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
