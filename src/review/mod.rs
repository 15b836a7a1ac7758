// ==========================================
// 生产批次导入 - 审核工作集
// ==========================================
// 职责: 持有可编辑的批次工作集，提供编辑/重新映射/删除操作
// 红线: 上传中/已成功的批次不可编辑、不可删除
// ==========================================

pub mod edits;
pub mod error;
pub mod session;

pub use error::ReviewError;
pub use session::{ReviewSession, SessionSummary};
