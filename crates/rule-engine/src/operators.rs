//! 比较操作符定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 比较操作符
///
/// 规则中以符号形式出现（`=`、`!=`、`<` ...）。无法识别的符号不会导致解析失败，
/// 而是保留在 `Unsupported` 中，求值时按失败处理。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComparisonOperator {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Unsupported(String),
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Unsupported(symbol) => symbol,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl From<&str> for ComparisonOperator {
    fn from(symbol: &str) -> Self {
        match symbol {
            "=" => Self::Eq,
            "!=" => Self::Neq,
            "<" => Self::Lt,
            "<=" => Self::Lte,
            ">" => Self::Gt,
            ">=" => Self::Gte,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for ComparisonOperator {
    fn from(symbol: String) -> Self {
        Self::from(symbol.as_str())
    }
}

impl From<ComparisonOperator> for String {
    fn from(operator: ComparisonOperator) -> Self {
        operator.as_str().to_string()
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
