// ==========================================
// 生产批次导入 - 表格分段器
// ==========================================
// 阶段 1: 行优先表格 → 批次草稿序列
// 状态机: Seeking（无打开批次） / InBatch（正在累积）
// 事件:   HeaderRow / TotalRow / DataRow / EndOfGrid
// ==========================================
// 区块形态:
//   [标题行][表头行: 含 "material name"，可含 "quantity"/"qty"、"rate"]
//   [材料/成本行 ...][含 "total" 的合计行]
// 区块之间可以没有空行
// ==========================================

use crate::domain::{Batch, CellGrid, CellValue};
use crate::importer::batch_validator::BatchValidator;
use crate::importer::data_cleaner::{
    cell_at, find_cell_containing, first_non_empty, parse_number, row_contains,
};
use crate::importer::importer_trait::MaterialResolver;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

const HEADER_KEYWORDS: &[&str] = &["material name"];
const QUANTITY_KEYWORDS: &[&str] = &["quantity", "qty"];
const RATE_KEYWORDS: &[&str] = &["rate"];
const TOTAL_KEYWORDS: &[&str] = &["total"];

// ==========================================
// 列布局 (Column Layout)
// ==========================================
// 默认值为固定列位置; 每遇到表头行即被覆写
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub material_name: usize,
    pub quantity: usize,
    pub rate: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            material_name: 2,
            quantity: 3,
            rate: 4,
        }
    }
}

impl ColumnLayout {
    /// 由表头行更新列位置（未出现的列保持原值）
    pub fn update_from_header(&mut self, row: &[CellValue]) {
        if let Some(idx) = find_cell_containing(row, HEADER_KEYWORDS) {
            self.material_name = idx;
        }
        if let Some(idx) = find_cell_containing(row, QUANTITY_KEYWORDS) {
            self.quantity = idx;
        }
        if let Some(idx) = find_cell_containing(row, RATE_KEYWORDS) {
            self.rate = idx;
        }
    }
}

// ==========================================
// 状态机定义
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    Seeking,
    InBatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEvent {
    HeaderRow,
    TotalRow,
    DataRow,
    EndOfGrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAction {
    /// 不处理该行
    Ignore,
    /// 打开新批次
    OpenBatch,
    /// 定稿当前批次（有材料行时），再打开新批次
    FinalizeNonEmptyAndOpen,
    /// 定稿当前批次（不论大小），回到 Seeking
    FinalizeAndClose,
    /// 累积到当前批次
    Accumulate,
    /// 定稿当前批次（有材料行时）
    FinalizeNonEmpty,
}

/// 行分类: 表头优先于合计
pub fn classify_row(row: &[CellValue]) -> RowEvent {
    if row_contains(row, HEADER_KEYWORDS) {
        RowEvent::HeaderRow
    } else if row_contains(row, TOTAL_KEYWORDS) {
        RowEvent::TotalRow
    } else {
        RowEvent::DataRow
    }
}

/// 状态转换表
pub fn transition(state: SegmentState, event: RowEvent) -> (SegmentState, SegmentAction) {
    use RowEvent::*;
    use SegmentAction::*;
    use SegmentState::*;

    match (state, event) {
        (Seeking, HeaderRow) => (InBatch, OpenBatch),
        (InBatch, HeaderRow) => (InBatch, FinalizeNonEmptyAndOpen),
        (InBatch, TotalRow) => (Seeking, FinalizeAndClose),
        (InBatch, DataRow) => (InBatch, Accumulate),
        (InBatch, EndOfGrid) => (Seeking, FinalizeNonEmpty),
        (Seeking, TotalRow) | (Seeking, DataRow) | (Seeking, EndOfGrid) => (Seeking, Ignore),
    }
}

// ==========================================
// 分段结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SegmentOutcome {
    pub batches: Vec<Batch>,
    /// 材料名与数量均为空而跳过的数据行
    pub skipped_rows: usize,
    /// 识别为损耗 (wastage) 但未计入的行
    pub discarded_wastage_rows: usize,
    /// 无材料行而被丢弃的批次（被下一个表头或表格结束关闭）
    pub discarded_empty_batches: usize,
}

// ==========================================
// Segmenter
// ==========================================
pub struct Segmenter<'a> {
    layout: ColumnLayout,
    resolver: &'a dyn MaterialResolver,
}

impl<'a> Segmenter<'a> {
    pub fn new(layout: ColumnLayout, resolver: &'a dyn MaterialResolver) -> Self {
        Self { layout, resolver }
    }

    /// 遍历表格，输出批次草稿（已定稿并校验）
    pub fn segment(&self, grid: &CellGrid) -> SegmentOutcome {
        let mut outcome = SegmentOutcome::default();
        let mut columns = self.layout;
        let mut state = SegmentState::Seeking;
        let mut current: Option<Batch> = None;

        for (row_idx, row) in grid.rows().iter().enumerate() {
            let event = classify_row(row);
            let (next_state, action) = transition(state, event);
            trace!(row = row_idx + 1, ?event, ?action, "分段事件");

            match action {
                SegmentAction::Ignore => {}
                SegmentAction::OpenBatch | SegmentAction::FinalizeNonEmptyAndOpen => {
                    if let Some(open) = current.take() {
                        Self::finalize_non_empty(open, &mut outcome);
                    }
                    columns.update_from_header(row);

                    // 批次名: 上一行第一个非空单元格，缺省为 "Bed {已输出批次数 + 1}"
                    let name = row_idx
                        .checked_sub(1)
                        .and_then(|prev| grid.row(prev))
                        .and_then(first_non_empty)
                        .unwrap_or_else(|| format!("Bed {}", outcome.batches.len() + 1));
                    debug!(row = row_idx + 1, batch = %name, ?columns, "打开批次");
                    current = Some(Batch::new(name));
                }
                SegmentAction::FinalizeAndClose => {
                    if let Some(open) = current.take() {
                        debug!(row = row_idx + 1, batch = %open.name, "合计行关闭批次");
                        outcome.batches.push(BatchValidator::finalize(open));
                    }
                }
                SegmentAction::Accumulate => {
                    if let Some(open) = current.as_mut() {
                        self.accumulate(open, row, &columns, &mut outcome);
                    }
                }
                SegmentAction::FinalizeNonEmpty => {
                    if let Some(open) = current.take() {
                        Self::finalize_non_empty(open, &mut outcome);
                    }
                }
            }
            state = next_state;
        }

        // 表格结束
        let (_, action) = transition(state, RowEvent::EndOfGrid);
        if action == SegmentAction::FinalizeNonEmpty {
            if let Some(open) = current.take() {
                Self::finalize_non_empty(open, &mut outcome);
            }
        }

        info!(
            rows = grid.len(),
            batches = outcome.batches.len(),
            skipped_rows = outcome.skipped_rows,
            wastage_rows = outcome.discarded_wastage_rows,
            empty_batches = outcome.discarded_empty_batches,
            "表格分段完成"
        );
        outcome
    }

    fn finalize_non_empty(batch: Batch, outcome: &mut SegmentOutcome) {
        if batch.materials.is_empty() {
            debug!(batch = %batch.name, "批次无材料行，丢弃");
            outcome.discarded_empty_batches += 1;
        } else {
            outcome.batches.push(BatchValidator::finalize(batch));
        }
    }

    /// 处理一条数据行
    fn accumulate(
        &self,
        batch: &mut Batch,
        row: &[CellValue],
        columns: &ColumnLayout,
        outcome: &mut SegmentOutcome,
    ) {
        let name_cell = cell_at(row, columns.material_name);
        let quantity_cell = cell_at(row, columns.quantity);
        if name_cell.is_empty() && quantity_cell.is_empty() {
            outcome.skipped_rows += 1;
            return;
        }

        let raw_name = name_cell.to_string().trim().to_string();
        let quantity = parse_number(quantity_cell);
        let lowered = raw_name.to_lowercase();

        if lowered.contains("labour") {
            batch.labour_cost += Self::cost_contribution(row, columns, quantity);
        } else if lowered.contains("transport") {
            batch.transport_cost += Self::cost_contribution(row, columns, quantity);
        } else if lowered.contains("wastage") {
            // TODO: 损耗行的数量/单价尚未映射到 wastage_percent，待业务确认口径
            debug!(batch = %batch.name, raw = %raw_name, "损耗行未计入");
            outcome.discarded_wastage_rows += 1;
        } else {
            // 非数值数量以 NaN 占位，定稿时剔除
            let line = self
                .resolver
                .resolve_line(&raw_name, quantity.unwrap_or(f64::NAN));
            batch.materials.push(line);
        }
    }

    /// 成本行贡献 = 数量 × 单价
    ///
    /// 单价取 rate 列; rate 列为空时取数量列右侧一格
    fn cost_contribution(row: &[CellValue], columns: &ColumnLayout, quantity: Option<f64>) -> f64 {
        let rate_cell = cell_at(row, columns.rate);
        let rate = if rate_cell.is_empty() {
            parse_number(cell_at(row, columns.quantity + 1))
        } else {
            parse_number(rate_cell)
        };

        match (quantity, rate) {
            (Some(q), Some(r)) => q * r,
            _ => 0.0,
        }
    }
}
