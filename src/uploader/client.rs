// ==========================================
// 生产批次导入 - 生产创建接口客户端
// ==========================================

use crate::uploader::error::ApiClientError;
use crate::uploader::request::{CreateProductRequest, CreateProductResponse};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

// ==========================================
// ProductionApi Trait
// ==========================================
// 实现者: HttpProductionApi（测试中为 Mock 实现）
#[async_trait]
pub trait ProductionApi: Send + Sync {
    /// 提交一个创建请求并等待完成
    ///
    /// # 返回
    /// - Ok(CreateProductResponse): 收到 2xx 响应（是否成功由上传器按 message 判定）
    /// - Err(ApiClientError): 非 2xx / 网络错误 / 响应体无法解析
    async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<CreateProductResponse, ApiClientError>;
}

// ==========================================
// HTTP 实现
// ==========================================
pub struct HttpProductionApi {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpProductionApi {
    pub fn new(
        url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }
}

#[async_trait]
impl ProductionApi for HttpProductionApi {
    #[instrument(skip(self, request), fields(product = %request.product_name))]
    async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<CreateProductResponse, ApiClientError> {
        let mut builder = self.client.post(&self.url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "创建接口响应");

        if !status.is_success() {
            // 尽量提取结构化错误字段
            let error = serde_json::from_str::<CreateProductResponse>(&body)
                .ok()
                .and_then(|r| r.error.or(r.message));
            return Err(ApiClientError::Server {
                status: status.as_u16(),
                error,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiClientError::Decode(e.to_string()))
    }
}
