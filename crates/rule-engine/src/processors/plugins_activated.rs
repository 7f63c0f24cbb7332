use crate::error::Result;
use crate::models::PluginsActivatedRule;
use crate::plugins::PluginsProvider;
use tracing::debug;

use super::{fail_closed, fold};

/// 插件启用规则处理器
pub struct PluginsActivatedRuleProcessor<'a> {
    provider: &'a dyn PluginsProvider,
}

impl<'a> PluginsActivatedRuleProcessor<'a> {
    pub fn new(provider: &'a dyn PluginsProvider) -> Self {
        Self { provider }
    }

    /// 列出的插件全部启用才通过，空列表不通过
    pub fn process(&self, rule: &PluginsActivatedRule) -> bool {
        fold("plugins_activated", self.try_process(rule))
    }

    /// 插件启用状态总能判定，不会返回 `Err`
    pub fn try_process(&self, rule: &PluginsActivatedRule) -> Result<bool> {
        if rule.plugins.is_empty() {
            debug!("plugins_activated 规则未列出任何插件");
            return Ok(fail_closed("empty_plugin_list"));
        }

        match rule
            .plugins
            .iter()
            .find(|slug| !self.provider.is_active(slug))
        {
            Some(slug) => {
                debug!(plugin = %slug, "插件未启用");
                Ok(fail_closed("plugin_inactive"))
            }
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::MockPluginsProvider;

    fn rule(plugins: &[&str]) -> PluginsActivatedRule {
        PluginsActivatedRule {
            plugins: plugins.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_all_active_passes() {
        let mut provider = MockPluginsProvider::new();
        provider.expect_is_active().times(2).return_const(true);

        let processor = PluginsActivatedRuleProcessor::new(&provider);
        assert!(processor.process(&rule(&["jetpack", "woocommerce-payments"])));
    }

    #[test]
    fn test_one_inactive_fails_and_stops() {
        let mut provider = MockPluginsProvider::new();
        provider
            .expect_is_active()
            .times(2)
            .returning(|slug| slug == "jetpack");

        let processor = PluginsActivatedRuleProcessor::new(&provider);
        assert!(!processor.process(&rule(&["jetpack", "mailpoet", "akismet"])));
    }

    #[test]
    fn test_empty_list_fails_closed() {
        let mut provider = MockPluginsProvider::new();
        provider.expect_is_active().never();

        let processor = PluginsActivatedRuleProcessor::new(&provider);
        assert!(!processor.process(&rule(&[])));
    }
}
