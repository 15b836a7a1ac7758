// ==========================================
// 生产批次导入 - 库存匹配层
// ==========================================
// 精确优先级匹配: 分段时自动执行
// 模糊索引:       仅用于人工重新映射
// ==========================================

pub mod fuzzy_index;
pub mod inventory_matcher;

pub use fuzzy_index::{FuzzyCandidate, FuzzyIndex, DEFAULT_SEARCH_LIMIT};
pub use inventory_matcher::{InventoryMatcher, MatchHit, MatchRule};
