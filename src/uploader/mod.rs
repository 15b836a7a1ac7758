// ==========================================
// 生产批次导入 - 批次上传层
// ==========================================
// 顺序上传: 每个批次的创建请求完成后才开始下一个
// 失败隔离: 单个批次失败不影响同一轮中的其他批次
// 上限:     每轮最多 max_batch_size 个，其余保持 pending 并报告剩余数
// ==========================================

pub mod batch_uploader;
pub mod client;
pub mod error;
pub mod request;

pub use batch_uploader::{
    BatchUploader, UploadOutcome, UploadPlan, UploadReport, UploadRun, UploadSettings,
};
pub use client::{HttpProductionApi, ProductionApi};
pub use error::ApiClientError;
pub use request::{format_quantity, CreateProductRequest, CreateProductResponse};
