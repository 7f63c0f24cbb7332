//! 叶子规则处理器
//!
//! 每个处理器只负责一种叶子规则。`try_process` 区分"条件不成立"（`Ok(false)`）
//! 与"规则无法求值"（`Err`）；`process` 把两者都折叠为 `false`。

mod data;
mod plugin_version;
mod plugins_activated;
mod publish_time;

pub use data::DataRuleProcessor;
pub use plugin_version::PluginVersionRuleProcessor;
pub use plugins_activated::PluginsActivatedRuleProcessor;
pub use publish_time::PublishTimeRuleProcessor;

use crate::error::Result;
use tracing::debug;

/// 记录一次失败关闭并返回 `false`
pub(crate) fn fail_closed(reason: &'static str) -> bool {
    metrics::counter!("inbox_rule_fail_closed_total", "reason" => reason).increment(1);
    false
}

/// 将无法求值的结果折叠为 `false`
pub(crate) fn fold(kind: &'static str, outcome: Result<bool>) -> bool {
    outcome.unwrap_or_else(|e| {
        debug!(kind, error = %e, "叶子规则无法求值");
        fail_closed(e.reason())
    })
}
