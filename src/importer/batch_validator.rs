// ==========================================
// 生产批次导入 - 批次校验器
// ==========================================
// 规则: is_valid = 存在可计数材料行 且 所有材料行均已匹配
// 可计数: 数量为有限正数
// 每次编辑后重新执行; 只重算布尔值与错误列表，不修改材料行
// ==========================================

use crate::domain::{Batch, MaterialLine};
use tracing::debug;

/// 无有效材料时的结构性错误
pub const NO_VALID_MATERIALS: &str = "No valid materials found.";

/// 校验结果
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub struct BatchValidator;

impl BatchValidator {
    /// 纯函数: 由材料行计算校验结果
    pub fn evaluate(materials: &[MaterialLine]) -> ValidationOutcome {
        let mut errors = Vec::new();
        if !materials.iter().any(|m| m.has_countable_quantity()) {
            errors.push(NO_VALID_MATERIALS.to_string());
        }

        // 未匹配行不论数量均使批次无效
        errors.extend(
            materials
                .iter()
                .filter(|m| !m.is_matched)
                .map(|m| format!("Unmatched material: {}", m.raw_name)),
        );

        ValidationOutcome {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// 重新校验批次，返回新的批次值
    pub fn revalidate(batch: &Batch) -> Batch {
        let outcome = Self::evaluate(&batch.materials);
        Batch {
            is_valid: outcome.is_valid,
            validation_errors: outcome.errors,
            ..batch.clone()
        }
    }

    /// 分段结束时定稿: 剔除数量非正/非数值的行，再校验
    pub fn finalize(mut batch: Batch) -> Batch {
        let before = batch.materials.len();
        batch.materials.retain(|m| m.has_countable_quantity());
        let dropped = before - batch.materials.len();

        let outcome = Self::evaluate(&batch.materials);
        batch.is_valid = outcome.is_valid;
        batch.validation_errors = outcome.errors;

        debug!(
            batch = %batch.name,
            lines = batch.materials.len(),
            dropped,
            is_valid = batch.is_valid,
            "批次定稿"
        );
        batch
    }
}
