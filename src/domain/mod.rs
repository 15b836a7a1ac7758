// ==========================================
// 生产批次导入 - 领域模型层
// ==========================================
// 职责: 定义表格单元、批次草稿、库存条目等领域实体
// 红线: 不含解析逻辑,不含网络访问
// ==========================================

pub mod batch;
pub mod catalog;
pub mod types;

// 重导出核心类型
pub use batch::{Batch, BatchId, CostField, MaterialLine, UploadStatus};
pub use catalog::CatalogItem;
pub use types::{CellGrid, CellValue};
