// ==========================================
// 生产批次导入 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段的接口（不包含实现）
// ==========================================

use crate::domain::{CellGrid, MaterialLine};
use crate::importer::error::ImportResult;

// ==========================================
// GridParser Trait
// ==========================================
// 用途: 表格解码接口（阶段 0）
// 实现者: ExcelGridParser, CsvGridParser
pub trait GridParser: Send + Sync {
    /// 将上传内容解码为行优先表格
    ///
    /// # 返回
    /// - Ok(CellGrid): 第一个工作表的全部行
    /// - Err: 内容不可读（对整次导入致命）
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<CellGrid>;
}

// ==========================================
// MaterialResolver Trait
// ==========================================
// 用途: 分段器在数据行上解析材料名（阶段 2）
// 实现者: InventoryMatcher
pub trait MaterialResolver: Send + Sync {
    /// 将原始材料名解析为材料行（匹配或未匹配）
    ///
    /// # 参数
    /// - raw_name: 表格中的原始名称（已 TRIM）
    /// - quantity: 已解析的数量
    fn resolve_line(&self, raw_name: &str, quantity: f64) -> MaterialLine;
}
