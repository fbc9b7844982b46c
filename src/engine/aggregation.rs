// ==========================================
// 物资申领报表 - 聚合引擎
// ==========================================
// 职责: 按部门（申领部门）、按站点（收货站点）分别分组计数，
//       组内再按状态二次分组，最后经目录服务补全名称
// 红线:
// - 名称补全只能在分组之后进行
// - 补全失败不得丢组，统一使用兜底名称
// - 组内不存在的状态不补零
// ==========================================

use crate::config::ReportConfig;
use crate::domain::report::{DepartmentSummary, ReportResult, StationSummary};
use crate::domain::requisition::Requisition;
use crate::domain::visibility::NamedLocation;
use crate::engine::error::ReportError;
use crate::engine::ports::DirectoryService;
use crate::repository::error::RepositoryResult;
use futures::StreamExt;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// 单个分组的计数结果（未补全名称）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupTally {
    pub key: i64,
    pub count: u32,
    pub status_counts: BTreeMap<String, u32>,
}

/// 按 key 分组计数
///
/// 输出顺序: sort_by_key 为 true 时按 key 升序，否则保持首次出现顺序。
pub fn tally_by<F>(records: &[Requisition], key_of: F, sort_by_key: bool) -> Vec<GroupTally>
where
    F: Fn(&Requisition) -> i64,
{
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<GroupTally> = Vec::new();

    for record in records {
        let key = key_of(record);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(GroupTally {
                key,
                count: 0,
                status_counts: BTreeMap::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[slot];
        group.count += 1;
        *group
            .status_counts
            .entry(record.status.as_str().to_string())
            .or_insert(0) += 1;
    }

    if sort_by_key {
        groups.sort_by_key(|g| g.key);
    }
    groups
}

// ==========================================
// AggregationEngine - 聚合引擎
// ==========================================
pub struct AggregationEngine {
    directory: Arc<dyn DirectoryService>,
    concurrency: usize,
    timeout: Duration,
    sort_by_key: bool,
}

impl AggregationEngine {
    pub fn new(directory: Arc<dyn DirectoryService>, config: &ReportConfig) -> Self {
        Self {
            directory,
            concurrency: config.enrichment_concurrency.max(1),
            timeout: config.enrichment_timeout(),
            sort_by_key: config.sort_summaries_by_key,
        }
    }

    /// 两个维度聚合（互相独立，名称补全并发执行）
    pub async fn aggregate(&self, records: &[Requisition]) -> ReportResult {
        let (by_department, by_station) =
            futures::join!(self.by_department(records), self.by_station(records));

        ReportResult {
            by_department,
            by_station,
        }
    }

    /// 按申领部门聚合
    pub async fn by_department(&self, records: &[Requisition]) -> Vec<DepartmentSummary> {
        let tallies = tally_by(records, Requisition::department_key, self.sort_by_key);
        debug!(groups = tallies.len(), "部门维度分组完成");

        let names: Vec<String> = futures::stream::iter(tallies.iter().map(|t| t.key))
            .map(|id| self.department_name(id))
            .buffered(self.concurrency)
            .collect()
            .await;

        tallies
            .into_iter()
            .zip(names)
            .map(|(tally, department_name)| DepartmentSummary {
                department_id: tally.key,
                department_name,
                count: tally.count,
                status_counts: tally.status_counts,
            })
            .collect()
    }

    /// 按收货站点聚合
    pub async fn by_station(&self, records: &[Requisition]) -> Vec<StationSummary> {
        let tallies = tally_by(records, Requisition::station_key, self.sort_by_key);
        debug!(groups = tallies.len(), "站点维度分组完成");

        let names: Vec<String> = futures::stream::iter(tallies.iter().map(|t| t.key))
            .map(|id| self.station_name(id))
            .buffered(self.concurrency)
            .collect()
            .await;

        tallies
            .into_iter()
            .zip(names)
            .map(|(tally, station_name)| StationSummary {
                station_id: tally.key,
                station_name,
                count: tally.count,
                status_counts: tally.status_counts,
            })
            .collect()
    }

    async fn department_name(&self, department_id: i64) -> String {
        let lookup = self.directory.lookup_department(department_id);
        self.resolve_name("department", department_id, lookup)
            .await
            .unwrap_or_else(|| DepartmentSummary::fallback_name(department_id))
    }

    async fn station_name(&self, station_id: i64) -> String {
        let lookup = self.directory.lookup_station(station_id);
        self.resolve_name("station", station_id, lookup)
            .await
            .unwrap_or_else(|| StationSummary::fallback_name(station_id))
    }

    /// 带超时的目录查询；未找到、失败、超时都返回 None
    async fn resolve_name<Fut>(&self, kind: &'static str, id: i64, lookup: Fut) -> Option<String>
    where
        Fut: Future<Output = RepositoryResult<Option<NamedLocation>>>,
    {
        let unavailable = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(found)) => {
                return found
                    .map(|location| location.name)
                    .filter(|name| !name.trim().is_empty());
            }
            Ok(Err(e)) => ReportError::EnrichmentUnavailable {
                kind,
                id,
                reason: e.to_string(),
            },
            Err(_) => ReportError::EnrichmentUnavailable {
                kind,
                id,
                reason: format!("查询超时 ({}ms)", self.timeout.as_millis()),
            },
        };

        warn!(error = %unavailable, "名称补全失败，使用兜底名称");
        None
    }
}
