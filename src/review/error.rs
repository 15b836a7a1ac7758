// ==========================================
// 生产批次导入 - 审核编辑错误类型
// ==========================================

use crate::domain::{BatchId, UploadStatus};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReviewError {
    #[error("批次不存在: {0}")]
    BatchNotFound(BatchId),

    #[error("批次已锁定 ({status})，不允许修改: {batch_id}")]
    BatchLocked {
        batch_id: BatchId,
        status: UploadStatus,
    },

    #[error("材料行不存在: batch={batch_id}, line={line}")]
    LineNotFound { batch_id: BatchId, line: usize },

    #[error("库存条目不存在: {0}")]
    CatalogItemNotFound(String),

    #[error("无效数值 ({field}): {value}")]
    InvalidValue { field: String, value: f64 },

    #[error("批次名称不能为空")]
    EmptyName,
}
