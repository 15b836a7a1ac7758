// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use bed_import::domain::{Batch, MaterialLine};

// ==========================================
// 表格构建器（输出 CSV 文本）
// ==========================================
// 列布局与默认分段配置一致: 2=物料名, 3=数量, 4=单价
// 标题行: 第一个非空单元格即批次名
pub struct SheetBuilder {
    rows: Vec<Vec<String>>,
}

impl SheetBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    fn push(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn bed(self, name: &str) -> Self {
        self.push(&["", name, "", "", ""])
    }

    pub fn header(self) -> Self {
        self.push(&["", "", "Material Name", "Quantity", "Rate"])
    }

    pub fn material(self, name: &str, qty: &str) -> Self {
        self.push(&["", "", name, qty, ""])
    }

    pub fn labour(self, qty: &str, rate: &str) -> Self {
        self.push(&["", "", "Labour", qty, rate])
    }

    pub fn transport(self, qty: &str, rate: &str) -> Self {
        self.push(&["", "", "Transport charges", qty, rate])
    }

    pub fn total(self) -> Self {
        self.push(&["", "", "Total", "", ""])
    }

    pub fn blank(self) -> Self {
        self.push(&["", "", "", "", ""])
    }

    pub fn to_csv(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if cell.contains(',') || cell.contains('"') {
                            format!("\"{}\"", cell.replace('"', "\"\""))
                        } else {
                            cell.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_csv().into_bytes()
    }
}

// ==========================================
// Batch 构建器
// ==========================================
pub struct BatchBuilder {
    batch: Batch,
}

impl BatchBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            batch: Batch::new(name),
        }
    }

    pub fn matched(mut self, raw: &str, catalog_id: &str, catalog_name: &str, qty: f64) -> Self {
        self.batch
            .materials
            .push(MaterialLine::matched(raw, qty, catalog_id, catalog_name));
        self
    }

    pub fn unmatched(mut self, raw: &str, qty: f64) -> Self {
        self.batch.materials.push(MaterialLine::unmatched(raw, qty));
        self
    }

    pub fn labour(mut self, cost: f64) -> Self {
        self.batch.labour_cost = cost;
        self
    }

    pub fn build(self) -> Batch {
        bed_import::importer::BatchValidator::revalidate(&self.batch)
    }
}
