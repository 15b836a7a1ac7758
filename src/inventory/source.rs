// ==========================================
// 生产批次导入 - 库存数据源
// ==========================================
// 外部协作方: 只读库存接口 / 本地 JSON 文件
// ==========================================

use crate::inventory::error::InventoryError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

// ==========================================
// InventorySource Trait
// ==========================================
// 实现者: HttpInventorySource, StaticInventorySource
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// 读取原始库存响应体（形态由 extract_inventory_items 统一处理）
    async fn fetch(&self) -> Result<Value, InventoryError>;
}

// ==========================================
// HTTP 库存数据源
// ==========================================
pub struct HttpInventorySource {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpInventorySource {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }
}

#[async_trait]
impl InventorySource for HttpInventorySource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Value, InventoryError> {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InventoryError::BadStatus {
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await?;
        debug!("库存接口响应读取完成");
        Ok(body)
    }
}

// ==========================================
// 静态库存数据源（JSON 文件 / 内存）
// ==========================================
pub struct StaticInventorySource {
    body: Value,
}

impl StaticInventorySource {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, InventoryError> {
        let content = std::fs::read_to_string(path)?;
        let body: Value = serde_json::from_str(&content)?;
        Ok(Self { body })
    }
}

#[async_trait]
impl InventorySource for StaticInventorySource {
    async fn fetch(&self) -> Result<Value, InventoryError> {
        Ok(self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_static_source_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, r#"{{"data": [{{"name": "Cement"}}]}}"#).unwrap();

        let source = StaticInventorySource::from_file(temp_file.path()).unwrap();
        let body = source.fetch().await.unwrap();
        assert_eq!(body, json!({ "data": [{ "name": "Cement" }] }));
    }

    #[test]
    fn test_static_source_bad_json() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "not json").unwrap();
        let result = StaticInventorySource::from_file(temp_file.path());
        assert!(matches!(result, Err(InventoryError::ParseError(_))));
    }
}
