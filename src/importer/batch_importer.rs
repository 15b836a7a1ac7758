// ==========================================
// 生产批次导入 - 导入管道
// ==========================================
// 流程: 解码（致命） → 库存快照（非致命） → 分段 + 匹配 → 校验
// ==========================================

use crate::domain::{Batch, CellGrid};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalGridParser;
use crate::importer::segmenter::{ColumnLayout, Segmenter};
use crate::inventory::{InventorySnapshot, InventorySource};
use crate::matcher::InventoryMatcher;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// 一次导入的结果
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub batches: Vec<Batch>,
    pub snapshot: Arc<InventorySnapshot>,
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub discarded_wastage_rows: usize,
    pub discarded_empty_batches: usize,
    pub elapsed: Duration,
}

impl ImportOutcome {
    pub fn valid_count(&self) -> usize {
        self.batches.iter().filter(|b| b.is_valid).count()
    }

    pub fn unmatched_lines(&self) -> usize {
        self.batches.iter().map(|b| b.unmatched_count()).sum()
    }
}

pub struct BatchImporter {
    parser: UniversalGridParser,
    layout: ColumnLayout,
}

impl BatchImporter {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            parser: UniversalGridParser,
            layout,
        }
    }

    /// 导入内存中的上传内容
    #[instrument(skip(self, bytes, source), fields(size = bytes.len()))]
    pub async fn import_bytes(
        &self,
        bytes: &[u8],
        extension: &str,
        source: &dyn InventorySource,
    ) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();

        // === 步骤 1: 解码 ===
        debug!("步骤 1: 解码表格");
        let grid = self.parser.parse_bytes(bytes, extension)?;

        // === 步骤 2: 库存快照 ===
        debug!("步骤 2: 读取库存快照");
        let snapshot = Arc::new(InventorySnapshot::load(source).await);

        // === 步骤 3: 分段 + 匹配 + 校验 ===
        Ok(self.import_grid(&grid, snapshot, start_time))
    }

    /// 导入文件
    pub async fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        source: &dyn InventorySource,
    ) -> ImportResult<ImportOutcome> {
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入生产批次");

        let start_time = Instant::now();
        let grid = self.parser.parse_file(path)?;
        let snapshot = Arc::new(InventorySnapshot::load(source).await);
        Ok(self.import_grid(&grid, snapshot, start_time))
    }

    /// 由已解码表格与快照完成分段
    pub fn import_grid(
        &self,
        grid: &CellGrid,
        snapshot: Arc<InventorySnapshot>,
        start_time: Instant,
    ) -> ImportOutcome {
        debug!("步骤 3: 分段与匹配");
        let matcher = InventoryMatcher::new(snapshot.clone());
        let segmented = Segmenter::new(self.layout, &matcher).segment(grid);

        let outcome = ImportOutcome {
            batches: segmented.batches,
            snapshot,
            total_rows: grid.len(),
            skipped_rows: segmented.skipped_rows,
            discarded_wastage_rows: segmented.discarded_wastage_rows,
            discarded_empty_batches: segmented.discarded_empty_batches,
            elapsed: start_time.elapsed(),
        };

        info!(
            total_rows = outcome.total_rows,
            batches = outcome.batches.len(),
            valid = outcome.valid_count(),
            unmatched_lines = outcome.unmatched_lines(),
            catalog_items = outcome.snapshot.len(),
            elapsed_ms = outcome.elapsed.as_millis(),
            "生产批次导入完成"
        );
        outcome
    }
}
