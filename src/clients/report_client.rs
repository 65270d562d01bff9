/// 报告生成服务客户端
///
/// 只负责把文件发出去、把原始响应带回来，不判断响应内容
use crate::config::Config;
use crate::error::TransportError;
use crate::models::{BackendResponse, InputFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

/// 报告生成后端
///
/// 编排层只依赖这个 trait，测试中可替换为假的实现。
#[async_trait]
pub trait ReportBackend: Send + Sync {
    /// 以 multipart 表单上传文件，所有文件共用 `field_name` 字段
    ///
    /// # 返回
    /// 返回原始状态码和响应体；只有传输层失败才返回错误
    async fn upload(
        &self,
        field_name: &str,
        files: &[InputFile],
    ) -> Result<BackendResponse, TransportError>;
}

/// 基于 reqwest 的 HTTP 客户端
pub struct HttpReportClient {
    client: reqwest::Client,
    base_url: String,
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    message: String,
}

impl HttpReportClient {
    /// 创建新的报告服务客户端
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.backend_base_url.trim_end_matches('/').to_string(),
            upload_url: config.upload_url(),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// 检查服务是否在线
    ///
    /// # 返回
    /// 返回服务根路径 `{"message": ...}` 中的文字
    pub async fn ping(&self) -> Result<String, TransportError> {
        let url = format!("{}/", self.base_url);
        debug!("检查报告服务: {}", url);

        let body: HealthBody = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(body.message)
    }

    fn build_form(field_name: &str, files: &[InputFile]) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.content.clone())
                .file_name(file.name.clone())
                .mime_str("text/plain")?;
            form = form.part(field_name.to_string(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl ReportBackend for HttpReportClient {
    async fn upload(
        &self,
        field_name: &str,
        files: &[InputFile],
    ) -> Result<BackendResponse, TransportError> {
        debug!("上传 {} 个文件到 {}", files.len(), self.upload_url);

        let form = Self::build_form(field_name, files)?;
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("报告服务响应: 状态 {} | 响应体 {} 字节", status, body.len());

        Ok(BackendResponse::new(status, body))
    }
}
