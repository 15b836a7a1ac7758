// ==========================================
// 生产批次导入 - 创建请求载荷
// ==========================================
// 载荷: {product_name, stock_needed, username, wastage_percent,
//        transport_cost, labour_cost, other_cost}
// stock_needed: 库存规范名 → 数量字符串
// ==========================================

use crate::domain::Batch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub product_name: String,
    pub stock_needed: BTreeMap<String, String>,
    pub username: String,
    pub wastage_percent: f64,
    pub transport_cost: f64,
    pub labour_cost: f64,
    pub other_cost: f64,
}

impl CreateProductRequest {
    /// 由批次构造请求
    ///
    /// 仅包含数量为正的行（有效批次中所有行均已匹配）; 同一库存条目出现多次时数量累加
    pub fn from_batch(batch: &Batch, username: &str) -> Self {
        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for line in batch
            .materials
            .iter()
            .filter(|m| m.has_countable_quantity())
        {
            let Some(name) = line.matched_catalog_name.as_ref() else {
                continue;
            };
            *totals.entry(name.clone()).or_insert(0.0) += line.quantity;
        }

        Self {
            product_name: batch.name.clone(),
            stock_needed: totals
                .into_iter()
                .map(|(name, qty)| (name, format_quantity(qty)))
                .collect(),
            username: username.to_string(),
            wastage_percent: batch.wastage_percent,
            transport_cost: batch.transport_cost,
            labour_cost: batch.labour_cost,
            other_cost: batch.other_cost,
        }
    }
}

/// 创建接口响应体（宽松解析）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateProductResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CreateProductResponse {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }
}

/// 数量格式化: 整数不带小数位
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        format!("{}", quantity)
    }
}
