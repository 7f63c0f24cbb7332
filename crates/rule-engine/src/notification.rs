//! 候选通知定义
//!
//! 每条通知带有一组规则，按隐式 AND 组合。规则在加载时解析一次，
//! 解析失败的规则以原始 JSON 保留，求值时让该通知不通过。

use crate::evaluator::RuleEvaluator;
use crate::models::Rule;
use crate::processors::fail_closed;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// 通知中的一条规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecRule {
    Parsed(Rule),
    Malformed(Value),
}

/// 候选通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSpec {
    pub slug: String,
    #[serde(default)]
    pub rules: Vec<SpecRule>,
}

impl NotificationSpec {
    pub fn new(slug: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            slug: slug.into(),
            rules: rules.into_iter().map(SpecRule::Parsed).collect(),
        }
    }

    /// 是否存在解析失败的规则
    pub fn has_malformed_rules(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| matches!(rule, SpecRule::Malformed(_)))
    }

    /// 所有规则通过才展示该通知；没有规则时直接通过
    pub fn is_satisfied(&self, evaluator: &RuleEvaluator<'_>) -> bool {
        for (i, rule) in self.rules.iter().enumerate() {
            let passed = match rule {
                SpecRule::Parsed(rule) => evaluator.evaluate(rule),
                SpecRule::Malformed(raw) => {
                    let reason = Rule::from_value(raw.clone())
                        .err()
                        .map(|e| e.to_string())
                        .unwrap_or_default();
                    warn!(slug = %self.slug, index = i, reason = %reason, "通知规则格式错误");
                    fail_closed("malformed_rule")
                }
            };

            if !passed {
                debug!(slug = %self.slug, index = i, "通知规则未通过");
                return false;
            }
        }
        true
    }
}
