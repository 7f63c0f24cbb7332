//! 标量比较
//!
//! `=` / `!=` 要求类型严格一致；排序操作符只对数值有定义。
//! 返回 `Err` 表示比较不受支持，调用方一律按 `false` 处理。

use crate::error::{Result, RuleError};
use crate::models::FactValue;
use crate::operators::ComparisonOperator;
use std::cmp::Ordering;

/// 标量比较器
pub struct Comparator;

impl Comparator {
    /// 比较两个事实值
    ///
    /// # Arguments
    /// * `operator` - 比较操作符
    /// * `left` - 从上下文中获取的字段值
    /// * `right` - 规则中定义的期望值
    pub fn compare(
        operator: &ComparisonOperator,
        left: &FactValue,
        right: &FactValue,
    ) -> Result<bool> {
        match operator {
            ComparisonOperator::Eq => Ok(Self::strict_eq(left, right)),
            ComparisonOperator::Neq => Ok(!Self::strict_eq(left, right)),
            ComparisonOperator::Lt => Self::order(operator, left, right).map(Ordering::is_lt),
            ComparisonOperator::Lte => Self::order(operator, left, right).map(Ordering::is_le),
            ComparisonOperator::Gt => Self::order(operator, left, right).map(Ordering::is_gt),
            ComparisonOperator::Gte => Self::order(operator, left, right).map(Ordering::is_ge),
            ComparisonOperator::Unsupported(symbol) => {
                Err(RuleError::UnsupportedOperator(symbol.clone()))
            }
        }
    }

    /// 类型与值都相等才算相等
    fn strict_eq(left: &FactValue, right: &FactValue) -> bool {
        match (left, right) {
            (FactValue::Bool(a), FactValue::Bool(b)) => a == b,
            (FactValue::Int(a), FactValue::Int(b)) => a == b,
            (FactValue::Float(a), FactValue::Float(b)) => a == b,
            (FactValue::String(a), FactValue::String(b)) => a == b,
            _ => false,
        }
    }

    /// 数值排序，整数之间不经过浮点转换
    fn order(
        operator: &ComparisonOperator,
        left: &FactValue,
        right: &FactValue,
    ) -> Result<Ordering> {
        if let (FactValue::Int(a), FactValue::Int(b)) = (left, right) {
            return Ok(a.cmp(b));
        }

        let a = Self::numeric(operator, left)?;
        let b = Self::numeric(operator, right)?;

        a.partial_cmp(&b).ok_or_else(|| RuleError::TypeMismatch {
            expected: "comparable number".to_string(),
            actual: "NaN".to_string(),
        })
    }

    fn numeric(operator: &ComparisonOperator, value: &FactValue) -> Result<f64> {
        value.as_f64().ok_or_else(|| RuleError::InvalidOperator {
            operator: operator.to_string(),
            value_type: value.type_name().to_string(),
        })
    }
}
