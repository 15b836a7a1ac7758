// ==========================================
// 生产批次导入 - 批次上传器
// ==========================================
// 状态机: pending → uploading → {success | error}（不自动重试）
// 选择:   is_valid && status != success，按工作集顺序截取前 max_batch_size 个
// 执行:   UploadRun 逐个拉取 (batch, outcome)，调用方可在每次拉取后刷新展示
// ==========================================

use crate::domain::{BatchId, UploadStatus};
use crate::review::ReviewSession;
use crate::uploader::client::ProductionApi;
use crate::uploader::error::ApiClientError;
use crate::uploader::request::{CreateProductRequest, CreateProductResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// 默认每轮上传上限
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20;
/// 创建成功时响应 message 的固定值
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Product created successfully";
/// 无可用错误信息时的兜底文案
pub const DEFAULT_FALLBACK_ERROR: &str = "Upload failed";

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_batch_size: usize,
    pub success_message: String,
    pub fallback_error: String,
    pub username: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            success_message: DEFAULT_SUCCESS_MESSAGE.to_string(),
            fallback_error: DEFAULT_FALLBACK_ERROR.to_string(),
            username: String::new(),
        }
    }
}

// ==========================================
// 上传计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPlan {
    pub selected: Vec<BatchId>,
    /// 超出上限、本轮不处理的可上传批次数
    pub remaining: usize,
}

impl UploadPlan {
    pub fn select(session: &ReviewSession, max_batch_size: usize) -> Self {
        let mut eligible = session.eligible_ids();
        let remaining = eligible.len().saturating_sub(max_batch_size);
        eligible.truncate(max_batch_size);
        Self {
            selected: eligible,
            remaining,
        }
    }
}

// ==========================================
// 上传结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadOutcome {
    pub batch_id: BatchId,
    pub batch_name: String,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 超出上限仍为 pending 的可上传批次数
    pub remaining: usize,
    pub outcomes: Vec<UploadOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

// ==========================================
// UploadRun - 单轮上传（拉取式迭代）
// ==========================================
pub struct UploadRun<'a> {
    session: &'a mut ReviewSession,
    api: &'a dyn ProductionApi,
    settings: &'a UploadSettings,
    queue: VecDeque<BatchId>,
    remaining: usize,
    outcomes: Vec<UploadOutcome>,
    started_at: DateTime<Utc>,
}

impl<'a> UploadRun<'a> {
    /// 本轮尚未处理的批次数
    pub fn pending_in_run(&self) -> usize {
        self.queue.len()
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// 处理下一个批次并返回结果; 本轮结束返回 None
    pub async fn next(&mut self) -> Option<UploadOutcome> {
        while let Some(id) = self.queue.pop_front() {
            let Some(batch) = self.session.get(id) else {
                continue;
            };
            if !batch.is_eligible() {
                continue;
            }

            let request = CreateProductRequest::from_batch(batch, &self.settings.username);
            let batch_name = batch.name.clone();

            if !self
                .session
                .transition_status(id, UploadStatus::Uploading, None)
            {
                continue;
            }
            info!(batch_id = %id, batch = %batch_name, "开始上传批次");

            let result = self.api.create_product(&request).await;
            let outcome = match interpret_response(result, self.settings) {
                Ok(()) => {
                    self.session
                        .transition_status(id, UploadStatus::Success, None);
                    info!(batch_id = %id, batch = %batch_name, "批次上传成功");
                    UploadOutcome {
                        batch_id: id,
                        batch_name,
                        status: UploadStatus::Success,
                        error_message: None,
                    }
                }
                Err(message) => {
                    self.session.transition_status(
                        id,
                        UploadStatus::Error,
                        Some(message.clone()),
                    );
                    warn!(batch_id = %id, batch = %batch_name, error = %message, "批次上传失败");
                    UploadOutcome {
                        batch_id: id,
                        batch_name,
                        status: UploadStatus::Error,
                        error_message: Some(message),
                    }
                }
            };

            self.outcomes.push(outcome.clone());
            return Some(outcome);
        }
        None
    }

    /// 结束本轮并生成报告
    pub fn finish(self) -> UploadReport {
        let succeeded = self
            .outcomes
            .iter()
            .filter(|o| o.status == UploadStatus::Success)
            .count();
        UploadReport {
            attempted: self.outcomes.len(),
            succeeded,
            failed: self.outcomes.len() - succeeded,
            remaining: self.remaining,
            outcomes: self.outcomes,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// 判定响应
///
/// 仅当 message 与固定成功文案完全一致时为成功; 否则错误信息按优先级:
/// 服务端结构化错误字段 → 错误自身信息 → 兜底文案
fn interpret_response(
    result: Result<CreateProductResponse, ApiClientError>,
    settings: &UploadSettings,
) -> Result<(), String> {
    let non_empty = |s: Option<String>| s.filter(|m| !m.trim().is_empty());

    match result {
        Ok(resp) if resp.message.as_deref() == Some(settings.success_message.as_str()) => Ok(()),
        Ok(resp) => Err(non_empty(resp.error)
            .or_else(|| non_empty(resp.message))
            .unwrap_or_else(|| settings.fallback_error.clone())),
        Err(err) => Err(err
            .server_error()
            .map(str::to_string)
            .or_else(|| non_empty(Some(err.to_string())))
            .unwrap_or_else(|| settings.fallback_error.clone())),
    }
}

// ==========================================
// BatchUploader
// ==========================================
pub struct BatchUploader {
    api: Arc<dyn ProductionApi>,
    settings: UploadSettings,
}

impl BatchUploader {
    pub fn new(api: Arc<dyn ProductionApi>, settings: UploadSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    /// 选择本轮批次并返回拉取式上传迭代
    pub fn start<'a>(&'a self, session: &'a mut ReviewSession) -> UploadRun<'a> {
        let plan = UploadPlan::select(session, self.settings.max_batch_size);
        info!(
            selected = plan.selected.len(),
            remaining = plan.remaining,
            max_batch_size = self.settings.max_batch_size,
            "上传批次选择完成"
        );

        UploadRun {
            session,
            api: self.api.as_ref(),
            settings: &self.settings,
            queue: plan.selected.into(),
            remaining: plan.remaining,
            outcomes: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// 顺序执行整轮上传
    #[instrument(skip(self, session))]
    pub async fn run(&self, session: &mut ReviewSession) -> UploadReport {
        let mut run = self.start(session);
        while run.next().await.is_some() {}
        let report = run.finish();

        info!(
            attempted = report.attempted,
            succeeded = report.succeeded,
            failed = report.failed,
            remaining = report.remaining,
            "上传完成"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> UploadSettings {
        UploadSettings::default()
    }

    #[test]
    fn test_interpret_success_exact_message() {
        let ok = Ok(CreateProductResponse::with_message(DEFAULT_SUCCESS_MESSAGE));
        assert_eq!(interpret_response(ok, &settings()), Ok(()));

        let close = Ok(CreateProductResponse::with_message("product created successfully"));
        assert_eq!(
            interpret_response(close, &settings()),
            Err("product created successfully".to_string())
        );
    }

    #[test]
    fn test_interpret_error_priority() {
        let structured = Err(ApiClientError::Server {
            status: 400,
            error: Some("Insufficient stock".to_string()),
        });
        assert_eq!(
            interpret_response(structured, &settings()),
            Err("Insufficient stock".to_string())
        );

        let transport = Err(ApiClientError::Transport("connection refused".to_string()));
        assert_eq!(
            interpret_response(transport, &settings()),
            Err("请求发送失败: connection refused".to_string())
        );

        let empty = Ok(CreateProductResponse::default());
        assert_eq!(
            interpret_response(empty, &settings()),
            Err(DEFAULT_FALLBACK_ERROR.to_string())
        );
    }
}
