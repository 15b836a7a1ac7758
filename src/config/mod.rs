// ==========================================
// 生产批次导入 - 配置层
// ==========================================
// 职责: 导入/匹配/上传参数管理
// 存储: TOML 配置文件 + 环境变量覆写
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager, ImportConfig};
pub use import_config_trait::ImportConfigReader;
