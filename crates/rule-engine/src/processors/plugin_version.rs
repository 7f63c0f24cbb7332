use crate::error::{Result, RuleError};
use crate::models::PluginVersionRule;
use crate::operators::ComparisonOperator;
use crate::plugins::PluginsProvider;
use crate::version::Version;
use tracing::debug;

use super::{fail_closed, fold};

/// 插件版本规则处理器
pub struct PluginVersionRuleProcessor<'a> {
    provider: &'a dyn PluginsProvider,
}

impl<'a> PluginVersionRuleProcessor<'a> {
    pub fn new(provider: &'a dyn PluginsProvider) -> Self {
        Self { provider }
    }

    /// 比较已启用插件的版本与规则要求的版本
    ///
    /// 未启用、无版本信息、版本号无法解析、操作符未知都返回 `false`。
    pub fn process(&self, rule: &PluginVersionRule) -> bool {
        fold("plugin_version", self.try_process(rule))
    }

    /// 插件未启用或没有版本信息时条件不成立；版本号无法解析或操作符未知时返回 `Err`
    pub fn try_process(&self, rule: &PluginVersionRule) -> Result<bool> {
        if !self.provider.is_active(&rule.plugin) {
            debug!(plugin = %rule.plugin, "插件未启用");
            return Ok(fail_closed("plugin_inactive"));
        }

        let Some(installed) = self.provider.get_version(&rule.plugin) else {
            debug!(plugin = %rule.plugin, "插件已启用但没有版本信息");
            return Ok(fail_closed("plugin_version_missing"));
        };

        Self::compare_versions(&rule.operator, &installed, &rule.version)
    }

    fn compare_versions(
        operator: &ComparisonOperator,
        installed: &str,
        required: &str,
    ) -> Result<bool> {
        let installed: Version = installed.parse()?;
        let required: Version = required.parse()?;
        let ordering = installed.cmp(&required);

        match operator {
            ComparisonOperator::Eq => Ok(ordering.is_eq()),
            ComparisonOperator::Neq => Ok(ordering.is_ne()),
            ComparisonOperator::Lt => Ok(ordering.is_lt()),
            ComparisonOperator::Lte => Ok(ordering.is_le()),
            ComparisonOperator::Gt => Ok(ordering.is_gt()),
            ComparisonOperator::Gte => Ok(ordering.is_ge()),
            ComparisonOperator::Unsupported(symbol) => {
                Err(RuleError::UnsupportedOperator(symbol.clone()))
            }
        }
    }
}
