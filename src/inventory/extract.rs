// ==========================================
// 生产批次导入 - 库存响应提取
// ==========================================
// 库存接口可能返回多种嵌套形态，统一在边界处按固定优先级提取:
//   1. 顶层数组
//   2. data → results → items → inventory 中第一个为数组的字段
//   3. 其他: 空
// ==========================================

use crate::domain::CatalogItem;
use serde_json::Value;

const NESTED_KEYS: &[&str] = &["data", "results", "items", "inventory"];

/// 从响应体中提取库存条目数组
pub fn extract_inventory_items(body: &Value) -> Vec<Value> {
    if let Some(items) = body.as_array() {
        return items.clone();
    }

    NESTED_KEYS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

/// 字符串或数值字段统一读取为字符串
fn string_field(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 数值或数值字符串字段读取为 f64
fn number_field(item: &Value, key: &str) -> Option<f64> {
    match item.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 单个库存 JSON 对象 → CatalogItem
///
/// # 字段优先级
/// - id: id → item_id
/// - name: name → item_name → item_id
/// - 别名: name 与 item_name 同时存在时的 item_name
/// - 编码: item_id → code
/// - 可用数量: total_quantity → quantity
///
/// 没有任何名称字段的条目返回 None
pub fn catalog_item_from_json(item: &Value) -> Option<CatalogItem> {
    let name_fields: Vec<String> = ["name", "item_name"]
        .iter()
        .filter_map(|key| string_field(item, key))
        .collect();
    let name = name_fields
        .first()
        .cloned()
        .or_else(|| string_field(item, "item_id"))?;

    let id = string_field(item, "id")
        .or_else(|| string_field(item, "item_id"))
        .unwrap_or_else(|| name.clone());

    let mut aliases: Vec<String> = Vec::new();
    for alias in name_fields.iter().skip(1) {
        if alias != &name && !aliases.contains(alias) {
            aliases.push(alias.clone());
        }
    }

    Some(CatalogItem {
        id,
        name,
        aliases,
        code: string_field(item, "item_id").or_else(|| string_field(item, "code")),
        unit: string_field(item, "unit"),
        cost_per_unit: number_field(item, "cost_per_unit"),
        available_qty: number_field(item, "total_quantity")
            .or_else(|| number_field(item, "quantity")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_bare_array() {
        let body = json!([{ "name": "Cement" }]);
        assert_eq!(extract_inventory_items(&body).len(), 1);
    }

    #[test]
    fn test_extract_nested_precedence() {
        // data 不是数组时继续查找下一个键
        let body = json!({
            "data": { "count": 2 },
            "results": [{ "name": "Sand" }],
            "items": [{ "name": "Cement" }, { "name": "Lime" }]
        });
        let items = extract_inventory_items(&body);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Sand");
    }

    #[test]
    fn test_extract_inventory_key() {
        let body = json!({ "inventory": [{ "name": "Cement" }] });
        assert_eq!(extract_inventory_items(&body).len(), 1);
    }

    #[test]
    fn test_extract_unknown_shape() {
        assert!(extract_inventory_items(&json!({ "rows": [] })).is_empty());
        assert!(extract_inventory_items(&json!("oops")).is_empty());
    }

    #[test]
    fn test_catalog_item_full_record() {
        let item = catalog_item_from_json(&json!({
            "id": 7,
            "name": "Cement Grade A",
            "item_name": "OPC 53",
            "item_id": "CEM-001",
            "unit": "bag",
            "cost_per_unit": "350.5",
            "total_quantity": 120
        }))
        .unwrap();

        assert_eq!(item.id, "7");
        assert_eq!(item.name, "Cement Grade A");
        assert_eq!(item.aliases, vec!["OPC 53"]);
        assert_eq!(item.code.as_deref(), Some("CEM-001"));
        assert_eq!(item.unit.as_deref(), Some("bag"));
        assert_eq!(item.cost_per_unit, Some(350.5));
        assert_eq!(item.available_qty, Some(120.0));
    }

    #[test]
    fn test_catalog_item_fallbacks() {
        let item = catalog_item_from_json(&json!({
            "item_id": "SAND-01",
            "item_name": "River Sand",
            "quantity": 3
        }))
        .unwrap();

        assert_eq!(item.id, "SAND-01");
        assert_eq!(item.name, "River Sand");
        assert_eq!(item.available_qty, Some(3.0));
    }

    #[test]
    fn test_catalog_item_without_name_skipped() {
        assert!(catalog_item_from_json(&json!({ "id": 1, "unit": "kg" })).is_none());
    }
}
