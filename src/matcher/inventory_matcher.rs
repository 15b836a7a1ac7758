// ==========================================
// 生产批次导入 - 库存精确匹配器
// ==========================================
// 候选名 c 与库存规范名/别名 n（均已规范化）按以下顺序逐条规则扫描全部库存:
//   a. c == n
//   b. n 包含 c
//   c. c 包含 n
//   d. c == 规范化编码
// 先命中的规则优先; 同一规则内按库存顺序取第一个
// ==========================================

use crate::domain::{CatalogItem, MaterialLine};
use crate::importer::data_cleaner::normalize_name;
use crate::importer::importer_trait::MaterialResolver;
use crate::inventory::InventorySnapshot;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Exact,
    CatalogContainsCandidate,
    CandidateContainsCatalog,
    Code,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRule::Exact => write!(f, "exact"),
            MatchRule::CatalogContainsCandidate => write!(f, "catalog_contains"),
            MatchRule::CandidateContainsCatalog => write!(f, "candidate_contains"),
            MatchRule::Code => write!(f, "code"),
        }
    }
}

/// 命中结果
#[derive(Debug, Clone, Copy)]
pub struct MatchHit<'a> {
    pub item: &'a CatalogItem,
    pub rule: MatchRule,
}

/// 规范化后的库存条目
struct NormalizedEntry {
    names: Vec<String>,
    code: Option<String>,
}

impl NormalizedEntry {
    fn matches(&self, rule: MatchRule, candidate: &str) -> bool {
        match rule {
            MatchRule::Exact => self.names.iter().any(|n| n == candidate),
            MatchRule::CatalogContainsCandidate => self.names.iter().any(|n| n.contains(candidate)),
            MatchRule::CandidateContainsCatalog => {
                self.names.iter().any(|n| candidate.contains(n.as_str()))
            }
            MatchRule::Code => self.code.as_deref() == Some(candidate),
        }
    }
}

pub struct InventoryMatcher {
    snapshot: Arc<InventorySnapshot>,
    entries: Vec<NormalizedEntry>,
}

impl InventoryMatcher {
    pub fn new(snapshot: Arc<InventorySnapshot>) -> Self {
        let entries = snapshot
            .items()
            .iter()
            .map(|item| NormalizedEntry {
                names: item
                    .names()
                    .map(normalize_name)
                    .filter(|n| !n.is_empty())
                    .collect(),
                code: item
                    .code
                    .as_deref()
                    .map(normalize_name)
                    .filter(|c| !c.is_empty()),
            })
            .collect();

        Self { snapshot, entries }
    }

    pub fn snapshot(&self) -> &InventorySnapshot {
        &self.snapshot
    }

    /// 按优先级规则解析原始名称
    pub fn resolve(&self, raw_name: &str) -> Option<MatchHit<'_>> {
        let candidate = normalize_name(raw_name);
        if candidate.is_empty() {
            return None;
        }

        const RULES: [MatchRule; 4] = [
            MatchRule::Exact,
            MatchRule::CatalogContainsCandidate,
            MatchRule::CandidateContainsCatalog,
            MatchRule::Code,
        ];

        for rule in RULES {
            if let Some(idx) = self.entries.iter().position(|e| e.matches(rule, &candidate)) {
                let item = &self.snapshot.items()[idx];
                trace!(candidate = %candidate, item = %item.name, %rule, "库存匹配命中");
                return Some(MatchHit { item, rule });
            }
        }

        None
    }
}

impl MaterialResolver for InventoryMatcher {
    fn resolve_line(&self, raw_name: &str, quantity: f64) -> MaterialLine {
        match self.resolve(raw_name) {
            Some(hit) => MaterialLine::matched(raw_name, quantity, &hit.item.id, &hit.item.name),
            None => {
                debug!(raw = %raw_name, "材料未匹配到库存");
                MaterialLine::unmatched(raw_name, quantity)
            }
        }
    }
}
