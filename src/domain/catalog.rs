// ==========================================
// 生产批次导入 - 库存条目 (只读)
// ==========================================
// 来源: 导入开始时一次性读取的库存快照
// 红线: 本系统从不修改库存条目
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    /// 规范名称（用于展示与上传请求）
    pub name: String,
    /// 其他名称字段（item_name 等），参与匹配
    #[serde(default)]
    pub aliases: Vec<String>,
    /// 次级标识（物料编码），仅参与精确匹配
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub cost_per_unit: Option<f64>,
    #[serde(default)]
    pub available_qty: Option<f64>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
            code: None,
            unit: None,
            cost_per_unit: None,
            available_qty: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// 名称 + 别名（按声明顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|a| a.as_str()))
    }
}
