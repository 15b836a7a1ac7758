// ==========================================
// 集成测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod mock_inventory;
pub mod mock_production_api;
pub mod test_data_builder;

pub use mock_inventory::{catalog_json, FailingInventorySource};
pub use mock_production_api::MockProductionApi;
pub use test_data_builder::{BatchBuilder, SheetBuilder};
