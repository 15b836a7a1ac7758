// ==========================================
// 生产批次导入 - 批次编辑（纯函数）
// ==========================================
// 每个操作接收当前批次，返回新的批次值; 不修改输入
// 所有操作在上传中/已成功的批次上被拒绝
// 影响匹配状态的操作（改数量 / 重新映射 / 重新匹配）返回前重新校验
// ==========================================

use crate::domain::{Batch, CatalogItem, CostField};
use crate::importer::batch_validator::BatchValidator;
use crate::matcher::InventoryMatcher;
use crate::review::error::ReviewError;

fn ensure_editable(batch: &Batch) -> Result<(), ReviewError> {
    if batch.upload_status.is_locked() {
        return Err(ReviewError::BatchLocked {
            batch_id: batch.id,
            status: batch.upload_status,
        });
    }
    Ok(())
}

fn ensure_line(batch: &Batch, line: usize) -> Result<(), ReviewError> {
    if line >= batch.materials.len() {
        return Err(ReviewError::LineNotFound {
            batch_id: batch.id,
            line,
        });
    }
    Ok(())
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ReviewError> {
    if !value.is_finite() {
        return Err(ReviewError::InvalidValue {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// 修改材料行数量
///
/// 数量 ≤ 0 的行保留在批次中，不计入上传载荷; 未匹配行仍使批次无效
pub fn with_quantity(batch: &Batch, line: usize, quantity: f64) -> Result<Batch, ReviewError> {
    ensure_editable(batch)?;
    ensure_line(batch, line)?;
    ensure_finite("quantity", quantity)?;

    let mut next = batch.clone();
    next.materials[line].quantity = quantity;
    Ok(BatchValidator::revalidate(&next))
}

/// 人工重新映射: 将材料行指向选定的库存条目
pub fn with_remap(batch: &Batch, line: usize, item: &CatalogItem) -> Result<Batch, ReviewError> {
    ensure_editable(batch)?;
    ensure_line(batch, line)?;

    let mut next = batch.clone();
    let target = &mut next.materials[line];
    target.is_matched = true;
    target.matched_catalog_id = Some(item.id.clone());
    target.matched_catalog_name = Some(item.name.clone());
    Ok(BatchValidator::revalidate(&next))
}

/// 修改成本字段（不影响校验结果）
pub fn with_cost(batch: &Batch, field: CostField, value: f64) -> Result<Batch, ReviewError> {
    ensure_editable(batch)?;
    ensure_finite(&field.to_string(), value)?;

    let mut next = batch.clone();
    match field {
        CostField::Labour => next.labour_cost = value,
        CostField::Transport => next.transport_cost = value,
        CostField::Other => next.other_cost = value,
        CostField::WastagePercent => next.wastage_percent = value,
    }
    Ok(next)
}

/// 修改批次名称（即创建请求中的 product_name）
pub fn with_name(batch: &Batch, name: &str) -> Result<Batch, ReviewError> {
    ensure_editable(batch)?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ReviewError::EmptyName);
    }

    let mut next = batch.clone();
    next.name = name.to_string();
    Ok(next)
}

/// 对所有未匹配行重新执行精确匹配
pub fn with_rematch(batch: &Batch, matcher: &InventoryMatcher) -> Result<Batch, ReviewError> {
    ensure_editable(batch)?;

    let mut next = batch.clone();
    for line in next.materials.iter_mut().filter(|m| !m.is_matched) {
        if let Some(hit) = matcher.resolve(&line.raw_name) {
            line.is_matched = true;
            line.matched_catalog_id = Some(hit.item.id.clone());
            line.matched_catalog_name = Some(hit.item.name.clone());
        }
    }
    Ok(BatchValidator::revalidate(&next))
}
