//! 规则求值器
//!
//! 自顶向下遍历规则树：叶子交给对应处理器，and / or 短路求值，not 取反。
//! 节点求值结果为 `Result<bool>`：`Ok(false)` 表示条件不成立，`Err` 表示规则无法求值。
//! `not` 只对前者取反；到达顶层的 `Err` 折叠为 `false`，不会向调用方抛出错误。

use crate::error::{Result, RuleError};
use crate::models::{CompositeRule, EvaluationContext, NotRule, Rule};
use crate::plugins::PluginsProvider;
use crate::processors::{
    DataRuleProcessor, PluginVersionRuleProcessor, PluginsActivatedRuleProcessor,
    PublishTimeRuleProcessor, fail_closed,
};
use serde_json::Value;
use tracing::{debug, trace, warn};

/// 规则求值器
///
/// 只借用上下文和插件信息，可在多个线程间共享。
pub struct RuleEvaluator<'a> {
    context: &'a EvaluationContext,
    provider: &'a dyn PluginsProvider,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(context: &'a EvaluationContext, provider: &'a dyn PluginsProvider) -> Self {
        Self { context, provider }
    }

    pub fn context(&self) -> &EvaluationContext {
        self.context
    }

    /// 对整棵规则树求值
    pub fn evaluate(&self, rule: &Rule) -> bool {
        let verdict = self.evaluate_node(rule, "root").unwrap_or_else(|e| {
            debug!(kind = rule.kind(), error = %e, "规则无法求值");
            false
        });

        metrics::counter!(
            "inbox_rule_evaluations_total",
            "verdict" => if verdict { "pass" } else { "fail" }
        )
        .increment(1);
        debug!(kind = rule.kind(), verdict, "规则求值完成");

        verdict
    }

    /// 解析并求值一条原始 JSON 规则，解析失败视为不通过
    pub fn evaluate_json(&self, raw: &Value) -> bool {
        match Rule::from_value(raw.clone()) {
            Ok(rule) => self.evaluate(&rule),
            Err(e) => {
                warn!(error = %e, "规则解析失败");
                fail_closed("malformed_rule")
            }
        }
    }

    /// 递归评估规则节点
    fn evaluate_node(&self, rule: &Rule, path: &str) -> Result<bool> {
        let outcome = match rule {
            Rule::Data(data) => DataRuleProcessor::try_process(data, self.context),
            Rule::PluginVersion(version) => {
                PluginVersionRuleProcessor::new(self.provider).try_process(version)
            }
            Rule::PluginsActivated(plugins) => {
                PluginsActivatedRuleProcessor::new(self.provider).try_process(plugins)
            }
            Rule::PublishAfterTime(after) => {
                PublishTimeRuleProcessor::try_process_after(after, self.context)
            }
            Rule::PublishBeforeTime(before) => {
                PublishTimeRuleProcessor::try_process_before(before, self.context)
            }
            Rule::Pass => Ok(true),
            Rule::Fail => Ok(false),
            Rule::Unsupported => Err(RuleError::UnsupportedRule),
            Rule::And(group) => return self.evaluate_and(group, path),
            Rule::Or(group) => return self.evaluate_or(group, path),
            Rule::Not(not) => return self.evaluate_not(not, path),
        };

        if let Err(e) = &outcome {
            debug!(path, kind = rule.kind(), error = %e, "叶子规则无法求值");
            fail_closed(e.reason());
        }
        trace!(path, kind = rule.kind(), outcome = ?outcome, "节点求值");
        outcome
    }

    /// AND: 遇到 false 或无法求值的子规则立即返回，空列表为 true
    fn evaluate_and(&self, group: &CompositeRule, path: &str) -> Result<bool> {
        for (i, operand) in group.operands.iter().enumerate() {
            let child_path = format!("{}.operands[{}]", path, i);
            if !self.evaluate_node(operand, &child_path)? {
                trace!(path, index = i, "AND 短路");
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// OR: 遇到 true 立即返回，空列表为 false
    ///
    /// 没有子规则成立且其中有无法求值的，整组视为无法求值。
    fn evaluate_or(&self, group: &CompositeRule, path: &str) -> Result<bool> {
        let mut unsupported = None;
        for (i, operand) in group.operands.iter().enumerate() {
            let child_path = format!("{}.operands[{}]", path, i);
            match self.evaluate_node(operand, &child_path) {
                Ok(true) => {
                    trace!(path, index = i, "OR 短路");
                    return Ok(true);
                }
                Ok(false) => {}
                Err(e) => {
                    unsupported.get_or_insert(e);
                }
            }
        }
        unsupported.map_or(Ok(false), Err)
    }

    /// NOT: 只对"条件不成立"取反
    ///
    /// 子树含未知种类或未知操作符（即使未被求值到），或子规则无法求值时，结果仍为无法求值。
    fn evaluate_not(&self, not: &NotRule, path: &str) -> Result<bool> {
        if !not.operand.is_well_formed() {
            debug!(path, "not 的子规则格式错误");
            fail_closed("malformed_negation");
            return Err(RuleError::MalformedRule(path.to_string()));
        }

        let child_path = format!("{}.operand", path);
        self.evaluate_node(&not.operand, &child_path)
            .map(|verdict| !verdict)
    }
}
