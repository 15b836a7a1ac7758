// ==========================================
// 生产批次导入 - 模糊检索索引
// ==========================================
// 用途: 人工重新映射时按自由文本检索库存
// 语义: 查询按空白切分为词元，所有词元都需命中（AND）
//       单个词元: skim 子序列匹配 或 与名称中任一单词 Jaro-Winkler ≥ 阈值（容错拼写）
//       词元之间互不约束顺序
// ==========================================

use crate::domain::CatalogItem;
use crate::inventory::InventorySnapshot;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;
use std::sync::Arc;
use strsim::jaro_winkler;
use tracing::debug;

/// 默认返回条数上限
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// 拼写容错阈值
const TYPO_SIMILARITY: f64 = 0.85;

#[derive(Debug, Clone, Serialize)]
pub struct FuzzyCandidate {
    pub item: CatalogItem,
    pub score: i64,
}

struct IndexEntry {
    /// 名称/别名/编码拼接后的小写文本
    haystack: String,
    words: Vec<String>,
}

pub struct FuzzyIndex {
    snapshot: Arc<InventorySnapshot>,
    entries: Vec<IndexEntry>,
    matcher: SkimMatcherV2,
}

impl FuzzyIndex {
    pub fn new(snapshot: Arc<InventorySnapshot>) -> Self {
        let entries = snapshot
            .items()
            .iter()
            .map(|item| {
                let haystack = item
                    .names()
                    .chain(item.code.as_deref())
                    .collect::<Vec<_>>()
                    .join(" ")
                    .to_lowercase();
                let words = haystack
                    .split(|c: char| !c.is_alphanumeric())
                    .filter(|w| !w.is_empty())
                    .map(str::to_string)
                    .collect();
                IndexEntry { haystack, words }
            })
            .collect();

        Self {
            snapshot,
            entries,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// 检索库存，按得分降序返回，最多 limit 条
    ///
    /// 空查询按库存顺序返回前 limit 条
    pub fn search(&self, query: &str, limit: usize) -> Vec<FuzzyCandidate> {
        let tokens: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let items = self.snapshot.items();
        if tokens.is_empty() {
            return items
                .iter()
                .take(limit)
                .map(|item| FuzzyCandidate {
                    item: item.clone(),
                    score: 0,
                })
                .collect();
        }

        let mut scored: Vec<(usize, i64)> = self
            .entries
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                tokens
                    .iter()
                    .map(|token| self.score_token(entry, token))
                    .sum::<Option<i64>>()
                    .map(|score| (idx, score))
            })
            .collect();

        // 稳定排序: 同分保持库存顺序
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        debug!(query = %query, hits = scored.len(), limit, "库存模糊检索");
        scored
            .into_iter()
            .take(limit)
            .map(|(idx, score)| FuzzyCandidate {
                item: items[idx].clone(),
                score,
            })
            .collect()
    }

    fn score_token(&self, entry: &IndexEntry, token: &str) -> Option<i64> {
        if let Some(score) = self.matcher.fuzzy_match(&entry.haystack, token) {
            return Some(score);
        }

        let best = entry
            .words
            .iter()
            .map(|w| jaro_winkler(w, token))
            .fold(0.0_f64, f64::max);
        (best >= TYPO_SIMILARITY).then(|| (best * 100.0).round() as i64)
    }
}
