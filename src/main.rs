use anyhow::Result;
use batch_report_client::app::RunOptions;
use batch_report_client::utils::logging;
use batch_report_client::{App, Config};
use clap::Parser;
use std::path::PathBuf;

/// 批次报告生成客户端
#[derive(Parser, Debug)]
#[command(name = "batch-report", version, about)]
struct Cli {
    /// 批次记录文件（只有 .txt 会被提交）
    files: Vec<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 报告服务地址，覆盖配置
    #[arg(long)]
    endpoint: Option<String>,

    /// 导出目录，覆盖配置
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// 生成后不导出
    #[arg(long)]
    no_export: bool,

    /// 把原始报告输出到标准输出
    #[arg(long)]
    print: bool,

    /// 只检查报告服务是否在线
    #[arg(long)]
    ping: bool,

    /// 显示详细日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.backend_base_url = endpoint;
    }
    if let Some(dir) = cli.output_dir {
        config.export_dir = dir;
    }

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    let app = App::initialize(config).await?;

    if cli.ping {
        app.ping().await?;
        return Ok(());
    }

    app.run(
        &cli.files,
        RunOptions {
            export: !cli.no_export,
            print_report: cli.print,
        },
    )
    .await?;

    Ok(())
}
