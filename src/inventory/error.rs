// ==========================================
// 生产批次导入 - 库存读取错误类型
// ==========================================
// 说明: 库存读取失败不致命，导入以空快照继续
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("库存接口请求失败: {0}")]
    RequestFailed(String),

    #[error("库存接口返回错误状态: {status}")]
    BadStatus { status: u16 },

    #[error("库存数据解析失败: {0}")]
    ParseError(String),

    #[error("库存文件读取失败: {0}")]
    FileReadError(String),
}

impl From<reqwest::Error> for InventoryError {
    fn from(err: reqwest::Error) -> Self {
        InventoryError::RequestFailed(err.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(err: serde_json::Error) -> Self {
        InventoryError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(err: std::io::Error) -> Self {
        InventoryError::FileReadError(err.to_string())
    }
}
