// ==========================================
// 生产批次导入 - 导入API
// ==========================================
// 职责: 串联 导入 → 审核会话 → 上传
// ==========================================

use crate::api::error::ApiError;
use crate::config::ImportConfigReader;
use crate::importer::BatchImporter;
use crate::inventory::{HttpInventorySource, InventorySource};
use crate::review::ReviewSession;
use crate::uploader::{BatchUploader, HttpProductionApi, ProductionApi, UploadReport};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct ImportApi {
    config: Arc<dyn ImportConfigReader>,
}

impl ImportApi {
    pub fn new(config: Arc<dyn ImportConfigReader>) -> Self {
        Self { config }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.get_request_timeout_secs())
    }

    fn importer(&self) -> BatchImporter {
        BatchImporter::new(self.config.get_column_layout())
    }

    /// 按配置创建 HTTP 库存数据源
    pub fn inventory_source(&self) -> Result<HttpInventorySource, ApiError> {
        let url = self
            .config
            .get_inventory_url()
            .ok_or_else(|| ApiError::NotConfigured("api_base_url".to_string()))?;
        Ok(HttpInventorySource::new(
            url,
            self.config.get_api_token(),
            self.timeout(),
        )?)
    }

    /// 按配置创建 HTTP 生产接口客户端
    pub fn production_api(&self) -> Result<Arc<dyn ProductionApi>, ApiError> {
        let url = self
            .config
            .get_production_url()
            .ok_or_else(|| ApiError::NotConfigured("api_base_url".to_string()))?;
        Ok(Arc::new(HttpProductionApi::new(
            url,
            self.config.get_api_token(),
            self.timeout(),
        )?))
    }

    /// 导入文件并建立审核会话
    ///
    /// # 返回
    /// - Ok(ReviewSession): 可编辑的批次工作集
    /// - Err(ApiError::ImportError): 文件不可读（致命，无部分结果）
    pub async fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        source: &dyn InventorySource,
    ) -> Result<ReviewSession, ApiError> {
        let outcome = self.importer().import_file(file_path, source).await?;
        Ok(ReviewSession::new(
            outcome.batches,
            outcome.snapshot,
            self.config.get_search_limit(),
        ))
    }

    /// 导入内存中的上传内容并建立审核会话
    pub async fn import_bytes(
        &self,
        bytes: &[u8],
        extension: &str,
        source: &dyn InventorySource,
    ) -> Result<ReviewSession, ApiError> {
        let outcome = self.importer().import_bytes(bytes, extension, source).await?;
        Ok(ReviewSession::new(
            outcome.batches,
            outcome.snapshot,
            self.config.get_search_limit(),
        ))
    }

    pub fn uploader(&self, api: Arc<dyn ProductionApi>) -> BatchUploader {
        BatchUploader::new(api, self.config.get_upload_settings())
    }

    /// 上传会话中的可上传批次（单轮，受上限约束）
    pub async fn upload(
        &self,
        session: &mut ReviewSession,
        api: Arc<dyn ProductionApi>,
    ) -> UploadReport {
        let report = self.uploader(api).run(session).await;
        if report.remaining > 0 {
            info!(remaining = report.remaining, "仍有可上传批次超出本轮上限");
        }
        report
    }
}
