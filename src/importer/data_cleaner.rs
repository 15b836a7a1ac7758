// ==========================================
// 生产批次导入 - 数据清洗
// ==========================================
// 职责: 名称规范化 / 数值解析 / 行内关键字查找
// ==========================================

use crate::domain::CellValue;

/// 名称规范化: 小写 + 去除所有空白
///
/// 用于材料名、库存名称/别名/编码的统一比较
pub fn normalize_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// 解析数值单元格
///
/// # 规则
/// - Number: 有限值原样返回
/// - Text: TRIM + 去千分位逗号后按 f64 解析
/// - 其他 / 非有限值: None
pub fn parse_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// 行内第一个非空单元格的文本
pub fn first_non_empty(row: &[CellValue]) -> Option<String> {
    row.iter()
        .find(|c| !c.is_empty())
        .map(|c| c.to_string().trim().to_string())
}

/// 查找第一个包含关键字（不区分大小写）的单元格位置
pub fn find_cell_containing(row: &[CellValue], keywords: &[&str]) -> Option<usize> {
    row.iter().position(|cell| {
        let text = cell.to_string().to_lowercase();
        keywords.iter().any(|k| text.contains(k))
    })
}

/// 行内是否存在包含关键字的单元格
pub fn row_contains(row: &[CellValue], keywords: &[&str]) -> bool {
    find_cell_containing(row, keywords).is_some()
}

/// 按列号取单元格，越界视为空
pub fn cell_at(row: &[CellValue], index: usize) -> &CellValue {
    static EMPTY: CellValue = CellValue::Empty;
    row.get(index).unwrap_or(&EMPTY)
}
