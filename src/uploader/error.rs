// ==========================================
// 生产批次导入 - 生产接口错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiClientError {
    /// 服务端返回非成功状态; error 为响应体中的结构化错误字段
    #[error("服务端返回错误状态 {status}")]
    Server { status: u16, error: Option<String> },

    #[error("请求发送失败: {0}")]
    Transport(String),

    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl ApiClientError {
    /// 服务端提供的结构化错误信息（若有）
    pub fn server_error(&self) -> Option<&str> {
        match self {
            ApiClientError::Server { error: Some(e), .. } if !e.trim().is_empty() => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiClientError::Decode(err.to_string())
        } else {
            ApiClientError::Transport(err.to_string())
        }
    }
}
