// ==========================================
// 生产批次导入 - 库存快照
// ==========================================
// 每次导入会话读取一次; 读取失败时以空快照继续（所有材料行未匹配）
// ==========================================

use crate::domain::CatalogItem;
use crate::inventory::extract::{catalog_item_from_json, extract_inventory_items};
use crate::inventory::source::InventorySource;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct InventorySnapshot {
    items: Vec<CatalogItem>,
    fetched_at: DateTime<Utc>,
    /// 读取失败而退化为空快照
    degraded: bool,
}

impl InventorySnapshot {
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            fetched_at: Utc::now(),
            degraded: false,
        }
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// 由原始响应体构造（跳过无名称条目）
    pub fn from_response(body: &Value) -> Self {
        let raw = extract_inventory_items(body);
        let total = raw.len();
        let items: Vec<CatalogItem> = raw.iter().filter_map(catalog_item_from_json).collect();
        if items.len() < total {
            warn!(skipped = total - items.len(), "库存条目缺少名称，已跳过");
        }
        Self::from_items(items)
    }

    /// 从数据源读取快照; 失败不致命
    pub async fn load(source: &dyn InventorySource) -> Self {
        match source.fetch().await {
            Ok(body) => {
                let snapshot = Self::from_response(&body);
                info!(items = snapshot.len(), "库存快照读取完成");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "库存读取失败，使用空快照继续导入");
                Self {
                    degraded: true,
                    ..Self::empty()
                }
            }
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::error::InventoryError;
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingSource;

    #[async_trait]
    impl InventorySource for FailingSource {
        async fn fetch(&self) -> Result<Value, InventoryError> {
            Err(InventoryError::BadStatus { status: 503 })
        }
    }

    #[tokio::test]
    async fn test_load_failure_yields_empty_snapshot() {
        let snapshot = InventorySnapshot::load(&FailingSource).await;
        assert!(snapshot.is_empty());
        assert!(snapshot.is_degraded());
    }

    #[test]
    fn test_from_response_skips_nameless() {
        let snapshot = InventorySnapshot::from_response(&json!({
            "results": [{ "id": 1, "name": "Cement" }, { "id": 2 }]
        }));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("1").unwrap().name, "Cement");
        assert!(!snapshot.is_degraded());
    }
}
