// ==========================================
// 生产批次导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::segmenter::ColumnLayout;
use crate::uploader::UploadSettings;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager
pub trait ImportConfigReader: Send + Sync {
    // ===== 分段配置 =====

    /// 获取默认列布局（遇到表头行前使用）
    ///
    /// # 默认值
    /// - material_name=2, quantity=3, rate=4
    fn get_column_layout(&self) -> ColumnLayout;

    // ===== 匹配配置 =====

    /// 获取人工重新映射检索的返回条数上限
    ///
    /// # 默认值
    /// - 50
    fn get_search_limit(&self) -> usize;

    // ===== 上传配置 =====

    /// 获取上传参数（每轮上限 / 成功文案 / 兜底错误 / 用户名）
    ///
    /// # 默认值
    /// - max_batch_size=20
    fn get_upload_settings(&self) -> UploadSettings;

    // ===== 接口配置 =====

    /// 库存读取地址（未配置 API 地址时为 None）
    fn get_inventory_url(&self) -> Option<String>;

    /// 生产创建地址（未配置 API 地址时为 None）
    fn get_production_url(&self) -> Option<String>;

    /// 接口鉴权令牌
    fn get_api_token(&self) -> Option<String>;

    /// 请求超时（秒）
    ///
    /// # 默认值
    /// - 30
    fn get_request_timeout_secs(&self) -> u64;
}
