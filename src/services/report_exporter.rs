//! 报告导出服务 - 业务能力层
//!
//! 把原始报告文本（不是预览）写成固定名字的纯文本文件。
//! 先写入临时文件，再交给下载位置；临时文件在交付之后一定释放，
//! 交付失败或 panic 时也一样。

use crate::config::Config;
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::Report;
use crate::workflow::events::{EventBus, WorkflowEvent};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// 下载位置
pub trait DownloadSink: Send + Sync {
    /// 把暂存文件交付到下载位置
    ///
    /// # 返回
    /// 返回最终文件路径
    fn deliver(&self, staged: &Path, file_name: &str) -> io::Result<PathBuf>;
}

/// 复制到本地目录
///
/// 先复制到同目录下的临时文件，再整体改名为目标文件名，
/// 目标文件要么完整出现，要么不出现。
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, staged: &Path, file_name: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let destination = self.dir.join(file_name);

        let mut partial = NamedTempFile::new_in(&self.dir)?;
        io::copy(&mut fs::File::open(staged)?, &mut partial)?;
        partial.flush()?;
        partial.persist(&destination).map_err(|e| e.error)?;

        Ok(destination)
    }
}

/// 报告导出服务
pub struct ReportExporter<S = DirectorySink> {
    sink: S,
    file_name: String,
    events: EventBus,
}

impl ReportExporter<DirectorySink> {
    /// 导出到配置中的目录
    pub fn from_config(config: &Config, events: EventBus) -> Self {
        Self::new(
            DirectorySink::new(&config.export_dir),
            config.export_file_name.clone(),
            events,
        )
    }
}

impl<S: DownloadSink> ReportExporter<S> {
    pub fn new(sink: S, file_name: impl Into<String>, events: EventBus) -> Self {
        Self {
            sink,
            file_name: file_name.into(),
            events,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 导出报告
    ///
    /// 每次调用最多触发一次交付。没有报告时返回 `NothingToExport`，不产生任何文件。
    pub fn export(&self, report: Option<&Report>) -> WorkflowResult<PathBuf> {
        let Some(report) = report else {
            warn!("⚠️ 没有可导出的报告");
            return Err(WorkflowError::NothingToExport);
        };

        let staged = stage_report(report).map_err(export_failed)?;
        debug!("报告已暂存到 {}", staged.path().display());

        let delivered = self.sink.deliver(staged.path(), &self.file_name);

        if let Err(e) = staged.close() {
            warn!("释放临时文件失败: {}", e);
        }

        let path = delivered.map_err(export_failed)?;
        info!("💾 报告已导出: {}", path.display());
        self.events.emit(WorkflowEvent::ExportStarted { path: path.clone() });

        Ok(path)
    }
}

fn stage_report(report: &Report) -> io::Result<NamedTempFile> {
    let mut staged = tempfile::Builder::new()
        .prefix("batch_report_")
        .suffix(".txt")
        .tempfile()?;
    staged.write_all(report.as_str().as_bytes())?;
    staged.flush()?;
    Ok(staged)
}

fn export_failed(e: io::Error) -> WorkflowError {
    WorkflowError::ExportFailed {
        message: e.to_string(),
    }
}
