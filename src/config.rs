use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 报告生成服务地址
    pub backend_base_url: String,
    /// 上传接口路径
    pub upload_path: String,
    /// multipart 表单中文件共用的字段名
    pub upload_field_name: String,
    /// 导出目录
    pub export_dir: PathBuf,
    /// 导出文件名（固定）
    pub export_file_name: String,
    /// 传输层超时（秒），为空时使用 reqwest 默认行为
    pub request_timeout_secs: Option<u64>,
    /// 生成按钮的默认文字
    pub trigger_label: String,
    /// 请求进行中按钮显示的文字
    pub busy_label: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: "http://127.0.0.1:8000".to_string(),
            upload_path: "/upload/".to_string(),
            upload_field_name: "files".to_string(),
            export_dir: PathBuf::from("."),
            export_file_name: "batch_report.txt".to_string(),
            request_timeout_secs: None,
            trigger_label: "生成报告".to_string(),
            busy_label: "生成中...".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件读取配置，文件中未出现的字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 先读配置文件（如果有），再用环境变量覆盖
    ///
    /// 环境变量中未设置或无法解析的项保留原值，覆盖之后统一校验。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 完整的上传接口地址
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}",
            self.backend_base_url.trim_end_matches('/'),
            self.upload_path.trim_start_matches('/')
        )
    }

    /// 导出文件的完整路径
    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(&self.export_file_name)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            backend_base_url: std::env::var("BACKEND_BASE_URL").unwrap_or(self.backend_base_url),
            upload_path: std::env::var("UPLOAD_PATH").unwrap_or(self.upload_path),
            upload_field_name: std::env::var("UPLOAD_FIELD_NAME").unwrap_or(self.upload_field_name),
            export_dir: std::env::var("EXPORT_DIR").map(PathBuf::from).unwrap_or(self.export_dir),
            export_file_name: std::env::var("EXPORT_FILE_NAME").unwrap_or(self.export_file_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).or(self.request_timeout_secs),
            trigger_label: std::env::var("TRIGGER_LABEL").unwrap_or(self.trigger_label),
            busy_label: std::env::var("BUSY_LABEL").unwrap_or(self.busy_label),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.upload_field_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "upload_field_name",
                value: self.upload_field_name.clone(),
            });
        }
        // 文件名固定且不能带目录
        if self.export_file_name.is_empty() || self.export_file_name.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "export_file_name",
                value: self.export_file_name.clone(),
            });
        }
        Ok(())
    }
}
