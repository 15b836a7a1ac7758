// ==========================================
// 生产批次导入 - 表格解码器实现
// ==========================================
// 阶段 0: 上传内容 → 行优先单元格表格（仅第一个工作表）
// 支持: Excel (.xlsx/.xls/.xlsb/.ods) / CSV (.csv)
// ==========================================

use crate::domain::{CellGrid, CellValue};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::GridParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelGridParser;

impl ExcelGridParser {
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::text(s.as_str()),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        }
    }
}

impl GridParser for ExcelGridParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<CellGrid> {
        // 格式由内容自动识别 (xlsx/xls/xlsb/ods)
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or(ImportError::NoWorksheet)??;

        // calamine 的 Range 从第一个有数据的单元格开始，需补齐左上角偏移以保持列号与表格一致
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
        for data_row in range.rows() {
            let mut row = vec![CellValue::Empty; col_offset];
            row.extend(data_row.iter().map(Self::convert_cell));
            rows.push(row);
        }

        debug!(rows = rows.len(), row_offset, col_offset, "Excel 表格解码完成");
        Ok(CellGrid::new(rows))
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 无表头行: 区块表头由分段器识别
pub struct CsvGridParser;

impl GridParser for CsvGridParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<CellGrid> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|value| match value.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => CellValue::Number(n),
                    _ => CellValue::text(value),
                })
                .collect();
            rows.push(row);
        }

        debug!(rows = rows.len(), "CSV 表格解码完成");
        Ok(CellGrid::new(rows))
    }
}

// ==========================================
// 通用解码器（根据扩展名自动选择）
// ==========================================
pub struct UniversalGridParser;

impl UniversalGridParser {
    /// 按扩展名解码内存中的上传内容
    pub fn parse_bytes(&self, bytes: &[u8], extension: &str) -> ImportResult<CellGrid> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => CsvGridParser.parse_bytes(bytes),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => ExcelGridParser.parse_bytes(bytes),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 读取文件并解码
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<CellGrid> {
        let path = file_path.as_ref();

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes, &ext)
    }
}
