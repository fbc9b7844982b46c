// ==========================================
// 物资申领报表 - 报表运行参数
// ==========================================

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 报表运行参数（由 ConfigManager 从 config_kv 加载）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    /// 名称补全的并发上限（>= 1）
    pub enrichment_concurrency: usize,
    /// 单次目录查询超时（毫秒）
    pub enrichment_timeout_ms: u64,
    /// 汇总按分组 key 升序输出；false 时保持首次出现顺序
    pub sort_summaries_by_key: bool,
    pub locale: String,
}

impl ReportConfig {
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_millis(self.enrichment_timeout_ms)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enrichment_concurrency: 8,
            enrichment_timeout_ms: 2000,
            sort_summaries_by_key: true,
            locale: "zh-CN".to_string(),
        }
    }
}
