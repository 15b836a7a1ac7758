// ==========================================
// 生产批次导入 - 库存快照层
// ==========================================
// 职责: 导入开始时一次性读取库存，之后视为不可变
// 红线: 会话内不刷新，不观察外部库存变更
// ==========================================

pub mod error;
pub mod extract;
pub mod snapshot;
pub mod source;

pub use error::InventoryError;
pub use extract::{catalog_item_from_json, extract_inventory_items};
pub use snapshot::InventorySnapshot;
pub use source::{HttpInventorySource, InventorySource, StaticInventorySource};
