// ==========================================
// 生产批次导入 - 核心库
// ==========================================
// 职责: 多区块生产批次表格 → 批次草稿 → 库存匹配 → 审核编辑 → 顺序上传
// 系统定位: 导入辅助（人工审核后上传）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 解码 / 分段 / 校验
pub mod importer;

// 库存层 - 只读快照
pub mod inventory;

// 匹配层 - 精确匹配 / 模糊检索
pub mod matcher;

// 审核层 - 可编辑工作集
pub mod review;

// 上传层 - 顺序提交
pub mod uploader;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Batch, BatchId, CatalogItem, CellGrid, CellValue, CostField, MaterialLine, UploadStatus};

// 导入
pub use importer::{BatchImporter, BatchValidator, ImportError, ImportOutcome, Segmenter};

// 库存 / 匹配
pub use inventory::{InventorySnapshot, InventorySource};
pub use matcher::{FuzzyIndex, InventoryMatcher};

// 审核 / 上传
pub use review::{ReviewError, ReviewSession};
pub use uploader::{BatchUploader, ProductionApi, UploadReport, UploadRun};

// API
pub use api::{ApiError, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产批次导入";
