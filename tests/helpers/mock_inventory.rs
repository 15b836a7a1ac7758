// ==========================================
// Mock 库存数据源 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use bed_import::inventory::{InventoryError, InventorySource};
use serde_json::{json, Value};

/// 始终返回错误状态的数据源
pub struct FailingInventorySource {
    pub status: u16,
}

#[async_trait]
impl InventorySource for FailingInventorySource {
    async fn fetch(&self) -> Result<Value, InventoryError> {
        Err(InventoryError::BadStatus {
            status: self.status,
        })
    }
}

/// 标准测试目录（data 包装形态）
///
/// 条目: Cement 50kg / Sand (River) / Steel Rod 12mm / Aggregate 20mm
pub fn catalog_json() -> Value {
    json!({
        "data": [
            {"item_id": "CEM-50", "name": "Cement 50kg", "item_name": "cement", "total_quantity": 120},
            {"item_id": "SND-R", "name": "Sand (River)", "total_quantity": 40.5},
            {"item_id": "STL-12", "name": "Steel Rod 12mm", "item_name": "steel rod"},
            {"item_id": "AGG-20", "name": "Aggregate 20mm"}
        ]
    })
}
