// ==========================================
// 生产批次导入 - 批次草稿实体
// ==========================================
// 批次 (Batch / bed): 表格中一个区块解析出的生产配方草稿
// 生命周期: 分段时创建 → 人工编辑 → 上传（状态单向流转）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==========================================
// BatchId - 会话内唯一标识
// ==========================================
// 仅作查找键使用，不对应任何服务端实体；删除后不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(Uuid);

impl BatchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// 上传状态 (Upload Status)
// ==========================================
// pending → uploading → {success | error}
// success 为终态; error 可在下一次上传时重新进入 uploading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    #[default]
    Pending,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    /// 是否锁定（上传中/已成功的批次不允许编辑或删除）
    pub fn is_locked(self) -> bool {
        matches!(self, UploadStatus::Uploading | UploadStatus::Success)
    }

    /// 状态转换是否合法
    pub fn can_transition_to(self, next: UploadStatus) -> bool {
        use UploadStatus::*;
        matches!(
            (self, next),
            (Pending, Uploading) | (Error, Uploading) | (Uploading, Success) | (Uploading, Error)
        )
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Pending => write!(f, "pending"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Success => write!(f, "success"),
            UploadStatus::Error => write!(f, "error"),
        }
    }
}

// ==========================================
// 材料行 (Material Line)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub raw_name: String,
    pub quantity: f64,
    pub is_matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_catalog_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_catalog_name: Option<String>,
}

impl MaterialLine {
    pub fn unmatched(raw_name: impl Into<String>, quantity: f64) -> Self {
        Self {
            raw_name: raw_name.into(),
            quantity,
            is_matched: false,
            matched_catalog_id: None,
            matched_catalog_name: None,
        }
    }

    pub fn matched(
        raw_name: impl Into<String>,
        quantity: f64,
        catalog_id: impl Into<String>,
        catalog_name: impl Into<String>,
    ) -> Self {
        Self {
            raw_name: raw_name.into(),
            quantity,
            is_matched: true,
            matched_catalog_id: Some(catalog_id.into()),
            matched_catalog_name: Some(catalog_name.into()),
        }
    }

    /// 计入校验的行: 数量为有限正数
    pub fn has_countable_quantity(&self) -> bool {
        self.quantity.is_finite() && self.quantity > 0.0
    }
}

// ==========================================
// 成本字段 (Cost Field)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostField {
    Labour,
    Transport,
    Other,
    WastagePercent,
}

impl fmt::Display for CostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostField::Labour => write!(f, "labour_cost"),
            CostField::Transport => write!(f, "transport_cost"),
            CostField::Other => write!(f, "other_cost"),
            CostField::WastagePercent => write!(f, "wastage_percent"),
        }
    }
}

// ==========================================
// 批次草稿 (Batch)
// ==========================================
// 不变量: is_valid ⇔ 存在可计数材料行 且 所有可计数行均已匹配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub name: String,
    pub materials: Vec<MaterialLine>,
    pub labour_cost: f64,
    pub transport_cost: f64,
    pub other_cost: f64,
    pub wastage_percent: f64,
    pub is_valid: bool,
    pub validation_errors: Vec<String>,
    pub upload_status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Batch {
    /// 创建空批次（校验结果由 Validator 填充）
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BatchId::new(),
            name: name.into(),
            materials: Vec::new(),
            labour_cost: 0.0,
            transport_cost: 0.0,
            other_cost: 0.0,
            wastage_percent: 0.0,
            is_valid: false,
            validation_errors: Vec::new(),
            upload_status: UploadStatus::Pending,
            error_message: None,
        }
    }

    /// 是否可上传: 校验通过且尚未成功
    pub fn is_eligible(&self) -> bool {
        self.is_valid && self.upload_status != UploadStatus::Success
    }

    pub fn cost(&self, field: CostField) -> f64 {
        match field {
            CostField::Labour => self.labour_cost,
            CostField::Transport => self.transport_cost,
            CostField::Other => self.other_cost,
            CostField::WastagePercent => self.wastage_percent,
        }
    }

    pub fn unmatched_count(&self) -> usize {
        self.materials.iter().filter(|m| !m.is_matched).count()
    }
}
