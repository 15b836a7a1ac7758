// ==========================================
// Mock 生产创建接口 - 用于集成测试
// ==========================================
// 记录每个请求，按批次名注入失败，并统计并发请求数
// ==========================================

use async_trait::async_trait;
use bed_import::uploader::{
    ApiClientError, CreateProductRequest, CreateProductResponse, ProductionApi,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 按批次名注入的响应
#[derive(Debug, Clone)]
pub enum Scripted {
    /// 非 2xx，带结构化错误字段
    ServerError(u16, Option<String>),
    /// 2xx，但 message 不是成功文案
    Message(String),
}

pub struct MockProductionApi {
    requests: Mutex<Vec<CreateProductRequest>>,
    scripted: Mutex<HashMap<String, Scripted>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockProductionApi {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            scripted: Mutex::new(HashMap::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn fail_with_server_error(self, product_name: &str, error: Option<&str>) -> Self {
        self.scripted.lock().unwrap().insert(
            product_name.to_string(),
            Scripted::ServerError(500, error.map(str::to_string)),
        );
        self
    }

    pub fn respond_with_message(self, product_name: &str, message: &str) -> Self {
        self.scripted.lock().unwrap().insert(
            product_name.to_string(),
            Scripted::Message(message.to_string()),
        );
        self
    }

    /// 清除某批次的失败注入（模拟修复后重试）
    pub fn clear_failure(&self, product_name: &str) {
        self.scripted.lock().unwrap().remove(product_name);
    }

    pub fn requests(&self) -> Vec<CreateProductRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_names(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| r.product_name)
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductionApi for MockProductionApi {
    async fn create_product(
        &self,
        request: &CreateProductRequest,
    ) -> Result<CreateProductResponse, ApiClientError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        tokio::task::yield_now().await;

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get(&request.product_name)
            .cloned();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match scripted {
            None => Ok(CreateProductResponse::with_message(
                "Product created successfully",
            )),
            Some(Scripted::Message(message)) => Ok(CreateProductResponse::with_message(message)),
            Some(Scripted::ServerError(status, error)) => {
                Err(ApiClientError::Server { status, error })
            }
        }
    }
}
