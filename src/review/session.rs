// ==========================================
// 生产批次导入 - 审核会话
// ==========================================
// 持有: 批次工作集 + 本次导入的库存快照（不刷新）+ 匹配器 / 模糊索引
// 编辑: 委托 review::edits 纯函数生成新批次后整体替换
// ==========================================

use crate::domain::{Batch, BatchId, CostField, UploadStatus};
use crate::inventory::InventorySnapshot;
use crate::matcher::{FuzzyCandidate, FuzzyIndex, InventoryMatcher};
use crate::review::edits;
use crate::review::error::ReviewError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 工作集统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub pending: usize,
    pub uploading: usize,
    pub success: usize,
    pub error: usize,
    /// 可上传（有效且未成功）
    pub eligible: usize,
}

pub struct ReviewSession {
    batches: Vec<Batch>,
    snapshot: Arc<InventorySnapshot>,
    matcher: InventoryMatcher,
    fuzzy_index: FuzzyIndex,
    search_limit: usize,
}

impl ReviewSession {
    pub fn new(batches: Vec<Batch>, snapshot: Arc<InventorySnapshot>, search_limit: usize) -> Self {
        Self {
            batches,
            matcher: InventoryMatcher::new(snapshot.clone()),
            fuzzy_index: FuzzyIndex::new(snapshot.clone()),
            snapshot,
            search_limit,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == id)
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    /// 可上传批次 ID（按工作集顺序）
    pub fn eligible_ids(&self) -> Vec<BatchId> {
        self.batches
            .iter()
            .filter(|b| b.is_eligible())
            .map(|b| b.id)
            .collect()
    }

    pub fn summary(&self) -> SessionSummary {
        let mut summary = SessionSummary {
            total: self.batches.len(),
            ..Default::default()
        };
        for batch in &self.batches {
            if batch.is_valid {
                summary.valid += 1;
            } else {
                summary.invalid += 1;
            }
            if batch.is_eligible() {
                summary.eligible += 1;
            }
            match batch.upload_status {
                UploadStatus::Pending => summary.pending += 1,
                UploadStatus::Uploading => summary.uploading += 1,
                UploadStatus::Success => summary.success += 1,
                UploadStatus::Error => summary.error += 1,
            }
        }
        summary
    }

    /// 人工重新映射用的库存检索
    pub fn search_catalog(&self, query: &str) -> Vec<FuzzyCandidate> {
        self.fuzzy_index.search(query, self.search_limit)
    }

    // ==========================================
    // 编辑
    // ==========================================

    fn position(&self, id: BatchId) -> Result<usize, ReviewError> {
        self.batches
            .iter()
            .position(|b| b.id == id)
            .ok_or(ReviewError::BatchNotFound(id))
    }

    fn apply<F>(&mut self, id: BatchId, edit: F) -> Result<&Batch, ReviewError>
    where
        F: FnOnce(&Batch) -> Result<Batch, ReviewError>,
    {
        let idx = self.position(id)?;
        let next = edit(&self.batches[idx]).inspect_err(|e| {
            warn!(batch_id = %id, error = %e, "批次编辑被拒绝");
        })?;
        self.batches[idx] = next;
        Ok(&self.batches[idx])
    }

    pub fn update_quantity(
        &mut self,
        id: BatchId,
        line: usize,
        quantity: f64,
    ) -> Result<&Batch, ReviewError> {
        debug!(batch_id = %id, line, quantity, "修改材料数量");
        self.apply(id, |b| edits::with_quantity(b, line, quantity))
    }

    /// 将材料行映射到指定库存条目（通常来自 search_catalog 的候选）
    pub fn remap_line(
        &mut self,
        id: BatchId,
        line: usize,
        catalog_id: &str,
    ) -> Result<&Batch, ReviewError> {
        let item = self
            .snapshot
            .get(catalog_id)
            .cloned()
            .ok_or_else(|| ReviewError::CatalogItemNotFound(catalog_id.to_string()))?;
        info!(batch_id = %id, line, catalog_id, item = %item.name, "人工重新映射");
        self.apply(id, |b| edits::with_remap(b, line, &item))
    }

    pub fn update_cost(
        &mut self,
        id: BatchId,
        field: CostField,
        value: f64,
    ) -> Result<&Batch, ReviewError> {
        debug!(batch_id = %id, %field, value, "修改成本字段");
        self.apply(id, |b| edits::with_cost(b, field, value))
    }

    pub fn rename(&mut self, id: BatchId, name: &str) -> Result<&Batch, ReviewError> {
        self.apply(id, |b| edits::with_name(b, name))
    }

    /// 对单个批次的未匹配行重新执行精确匹配
    pub fn rematch(&mut self, id: BatchId) -> Result<&Batch, ReviewError> {
        let idx = self.position(id)?;
        let next = edits::with_rematch(&self.batches[idx], &self.matcher)?;
        self.batches[idx] = next;
        Ok(&self.batches[idx])
    }

    /// 对所有可编辑批次重新匹配，返回被更新的批次数
    pub fn rematch_all(&mut self) -> usize {
        let mut updated = 0;
        for idx in 0..self.batches.len() {
            if let Ok(next) = edits::with_rematch(&self.batches[idx], &self.matcher) {
                if next != self.batches[idx] {
                    self.batches[idx] = next;
                    updated += 1;
                }
            }
        }
        info!(updated, "重新匹配完成");
        updated
    }

    /// 从工作集移除批次（上传中/已成功的批次拒绝）
    pub fn remove_batch(&mut self, id: BatchId) -> Result<Batch, ReviewError> {
        let idx = self.position(id)?;
        let batch = &self.batches[idx];
        if batch.upload_status.is_locked() {
            warn!(batch_id = %id, status = %batch.upload_status, "拒绝删除锁定批次");
            return Err(ReviewError::BatchLocked {
                batch_id: id,
                status: batch.upload_status,
            });
        }
        info!(batch_id = %id, batch = %batch.name, "移除批次");
        Ok(self.batches.remove(idx))
    }

    // ==========================================
    // 上传状态（仅上传器使用）
    // ==========================================

    /// 推进上传状态; 非法转换（如 success 回退）被忽略并返回 false
    pub(crate) fn transition_status(
        &mut self,
        id: BatchId,
        next: UploadStatus,
        error_message: Option<String>,
    ) -> bool {
        let Some(batch) = self.batches.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        if !batch.upload_status.can_transition_to(next) {
            warn!(batch_id = %id, from = %batch.upload_status, to = %next, "非法的上传状态转换");
            return false;
        }
        batch.upload_status = next;
        batch.error_message = error_message;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogItem, MaterialLine};
    use crate::importer::batch_validator::BatchValidator;

    fn session() -> (ReviewSession, BatchId, BatchId) {
        let snapshot = Arc::new(InventorySnapshot::from_items(vec![
            CatalogItem::new("c1", "Cement Grade A"),
            CatalogItem::new("s1", "River Sand"),
        ]));

        let mut valid = Batch::new("Bed Alpha");
        valid.materials = vec![MaterialLine::matched("Cement", 10.0, "c1", "Cement Grade A")];
        let valid = BatchValidator::finalize(valid);

        let mut invalid = Batch::new("Bed Beta");
        invalid.materials = vec![MaterialLine::unmatched("Sand?", 2.0)];
        let invalid = BatchValidator::finalize(invalid);

        let (a, b) = (valid.id, invalid.id);
        (ReviewSession::new(vec![valid, invalid], snapshot, 50), a, b)
    }

    #[test]
    fn test_summary_and_eligibility() {
        let (session, a, _) = session();
        let summary = session.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.pending, 2);
        assert_eq!(session.eligible_ids(), vec![a]);
    }

    #[test]
    fn test_search_then_remap() {
        let (mut session, _, b) = session();
        let candidates = session.search_catalog("sand");
        assert_eq!(candidates[0].item.id, "s1");

        let batch = session.remap_line(b, 0, &candidates[0].item.id).unwrap();
        assert!(batch.is_valid);
        assert_eq!(session.eligible_ids().len(), 2);
    }

    #[test]
    fn test_remap_unknown_catalog_item() {
        let (mut session, _, b) = session();
        assert_eq!(
            session.remap_line(b, 0, "nope").unwrap_err(),
            ReviewError::CatalogItemNotFound("nope".to_string())
        );
    }

    #[test]
    fn test_remove_blocked_when_locked() {
        let (mut session, a, b) = session();
        assert!(session.transition_status(a, UploadStatus::Uploading, None));
        assert!(matches!(
            session.remove_batch(a),
            Err(ReviewError::BatchLocked { .. })
        ));

        assert!(session.transition_status(a, UploadStatus::Success, None));
        assert!(session.remove_batch(a).is_err());

        let removed = session.remove_batch(b).unwrap();
        assert_eq!(removed.name, "Bed Beta");
        assert_eq!(session.batches().len(), 1);
        assert_eq!(
            session.remove_batch(b).unwrap_err(),
            ReviewError::BatchNotFound(b)
        );
    }

    #[test]
    fn test_success_is_terminal() {
        let (mut session, a, _) = session();
        assert!(!session.transition_status(a, UploadStatus::Success, None));
        assert!(session.transition_status(a, UploadStatus::Uploading, None));
        assert!(session.transition_status(a, UploadStatus::Success, None));
        assert!(!session.transition_status(a, UploadStatus::Uploading, None));
        assert!(!session.transition_status(a, UploadStatus::Pending, None));
        assert!(session
            .update_cost(a, CostField::Labour, 10.0)
            .is_err());
        assert_eq!(session.get(a).unwrap().upload_status, UploadStatus::Success);
    }

    #[test]
    fn test_rename_batch() {
        let (mut session, a, _) = session();
        assert_eq!(session.rename(a, "Bed Gamma").unwrap().name, "Bed Gamma");
        assert_eq!(session.rename(a, "   ").unwrap_err(), ReviewError::EmptyName);
        assert_eq!(session.get(a).unwrap().name, "Bed Gamma");
    }

    #[test]
    fn test_rematch_all_skips_nothing_to_do() {
        let (mut session, _, _) = session();
        // "Sand?" 规范化后为 "sand?"，不被任何库存名包含，也不包含任何库存名
        assert_eq!(session.rematch_all(), 0);
    }
}
