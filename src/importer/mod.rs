// ==========================================
// 生产批次导入 - 导入层
// ==========================================
// 职责: 上传表格 → 批次草稿
// 流程: 解码 → 分段 → 匹配 → 校验
// ==========================================

// 模块声明
pub mod batch_importer;
pub mod batch_validator;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod segmenter;

// 重导出核心类型
pub use batch_importer::{BatchImporter, ImportOutcome};
pub use batch_validator::{BatchValidator, ValidationOutcome, NO_VALID_MATERIALS};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvGridParser, ExcelGridParser, UniversalGridParser};
pub use segmenter::{ColumnLayout, RowEvent, SegmentAction, SegmentOutcome, SegmentState, Segmenter};

// 重导出 Trait 接口
pub use importer_trait::{GridParser, MaterialResolver};
