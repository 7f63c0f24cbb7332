use crate::comparator::Comparator;
use crate::error::Result;
use crate::models::{DataRule, EvaluationContext};
use tracing::debug;

use super::{fail_closed, fold};

/// 数据规则处理器
pub struct DataRuleProcessor;

impl DataRuleProcessor {
    /// 在上下文中查找字段并与规则中的字面量比较，无法比较时为 `false`
    pub fn process(rule: &DataRule, context: &EvaluationContext) -> bool {
        fold("data", Self::try_process(rule, context))
    }

    /// 字段缺失说明条件不成立，返回 `Ok(false)`；
    /// 未知操作符或类型不支持的比较返回 `Err`。
    pub fn try_process(rule: &DataRule, context: &EvaluationContext) -> Result<bool> {
        let Some(actual) = context.get(&rule.index) else {
            debug!(index = %rule.index, "数据字段不存在");
            return Ok(fail_closed("missing_field"));
        };

        Comparator::compare(&rule.operation, actual, &rule.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FactValue, Rule};
    use serde_json::json;

    fn data_rule(value: serde_json::Value) -> DataRule {
        match Rule::from_value(value).unwrap() {
            Rule::Data(rule) => rule,
            other => panic!("expected data rule, got {:?}", other),
        }
    }

    fn there_are_products(operation: &str, value: impl Into<FactValue>) -> DataRule {
        DataRule {
            index: "there_are_products".to_string(),
            operation: operation.into(),
            value: value.into(),
        }
    }

    fn product_count(operation: &str) -> DataRule {
        DataRule {
            index: "product_count".to_string(),
            operation: operation.into(),
            value: 100.into(),
        }
    }

    fn with_count(count: i64) -> EvaluationContext {
        EvaluationContext::new().with("product_count", count)
    }

    #[test]
    fn test_empty_data_evaluates_to_false() {
        let rule = data_rule(json!({
            "type": "data",
            "index": "there_are_products",
            "operation": "=",
            "value": true
        }));

        assert!(!DataRuleProcessor::process(&rule, &EvaluationContext::new()));
    }

    #[test]
    fn test_no_matching_data_keys_evaluates_to_false() {
        let rule = there_are_products("=", true);
        let ctx = EvaluationContext::new().with("non_matching_key", "test");

        assert!(!DataRuleProcessor::process(&rule, &ctx));
    }

    #[test]
    fn test_unrecognized_operator_fails() {
        let rule = there_are_products("@@@", true);
        let ctx = EvaluationContext::new().with("there_are_products", true);

        assert!(!DataRuleProcessor::process(&rule, &ctx));
    }

    #[test]
    fn test_boolean_equality() {
        let rule = there_are_products("=", true);

        assert!(!DataRuleProcessor::process(
            &rule,
            &EvaluationContext::new().with("there_are_products", false)
        ));
        assert!(DataRuleProcessor::process(
            &rule,
            &EvaluationContext::new().with("there_are_products", true)
        ));
    }

    #[test]
    fn test_string_equality() {
        let rule = there_are_products("=", "yes there are");

        assert!(!DataRuleProcessor::process(
            &rule,
            &EvaluationContext::new().with("there_are_products", "no there is not")
        ));
        assert!(DataRuleProcessor::process(
            &rule,
            &EvaluationContext::new().with("there_are_products", "yes there are")
        ));
    }

    #[test]
    fn test_integer_equality() {
        let rule = there_are_products("=", 123);
        let ctx = EvaluationContext::new().with("there_are_products", 123);

        assert!(DataRuleProcessor::process(&rule, &ctx));
    }

    #[test]
    fn test_equality_fails_on_different_types() {
        let ctx = EvaluationContext::new().with("there_are_products", 123.45);

        assert!(!DataRuleProcessor::process(&there_are_products("=", 123), &ctx));
        assert!(DataRuleProcessor::process(&there_are_products("!=", 123), &ctx));
    }

    #[test]
    fn test_ordering_operators() {
        let cases = [
            ("<", 120, false),
            ("<", 80, true),
            (">", 80, false),
            (">", 120, true),
            (">=", 80, false),
            (">=", 100, true),
            ("<=", 120, false),
            ("<=", 100, true),
            ("!=", 100, false),
            ("!=", 110, true),
        ];

        for (operation, count, expected) in cases {
            assert_eq!(
                DataRuleProcessor::process(&product_count(operation), &with_count(count)),
                expected,
                "product_count={} {} 100",
                count,
                operation
            );
        }
    }

    #[test]
    fn test_ordering_on_string_field_fails_closed() {
        let rule = product_count("<");
        let ctx = EvaluationContext::new().with("product_count", "80");

        assert!(!DataRuleProcessor::process(&rule, &ctx));
    }

    #[test]
    fn test_missing_field_is_not_an_error() {
        let rule = product_count("<");

        assert!(matches!(
            DataRuleProcessor::try_process(&rule, &EvaluationContext::new()),
            Ok(false)
        ));
    }

    #[test]
    fn test_unsupported_comparison_is_an_error() {
        let ctx = with_count(120);
        let non_numeric = DataRule {
            index: "product_count".to_string(),
            operation: "<".into(),
            value: "abc".into(),
        };

        assert!(DataRuleProcessor::try_process(&non_numeric, &ctx).is_err());
        assert!(
            DataRuleProcessor::try_process(
                &there_are_products("@@@", true),
                &EvaluationContext::new().with("there_are_products", true)
            )
            .is_err()
        );
    }
}
