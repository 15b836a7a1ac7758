// ==========================================
// 生产批次导入 - API 层
// ==========================================
// 职责: 封装导入 / 审核 / 上传流程，供 CLI 或上层界面调用
// ==========================================

pub mod error;
pub mod import_api;

pub use error::ApiError;
pub use import_api::ImportApi;
