// ==========================================
// 生产批次导入 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为用户可读的提示
// 致命错误（解码失败）冒泡到顶层; 其余错误挂在所属批次/行上
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::inventory::InventoryError;
use crate::review::ReviewError;
use crate::uploader::ApiClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("文件导入失败: {0}")]
    ImportError(#[from] ImportError),

    #[error("批次编辑失败: {0}")]
    ReviewError(#[from] ReviewError),

    #[error("配置错误: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("库存读取失败: {0}")]
    InventoryError(#[from] InventoryError),

    #[error("生产接口错误: {0}")]
    ClientError(#[from] ApiClientError),

    #[error("未配置: {0}")]
    NotConfigured(String),
}
