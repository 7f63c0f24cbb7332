//! 插件版本号解析与排序
//!
//! 版本号按 `.` 分段，每段取开头的十进制数字；没有数字开头的段记为 0，
//! 缺失的尾部分段同样视为 0（`1.2` == `1.2.0`）。整串不含任何数字时无法解析。
//! 某段在数字之后还跟有其他字符（`0-beta`）时，该段之后的内容全部忽略，
//! 因此 `2.0.0-beta.1` == `2.0.0`。

use crate::error::{Result, RuleError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// 点分数字版本号
#[derive(Debug, Clone)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, position: usize) -> u64 {
        self.components.get(position).copied().unwrap_or(0)
    }

    /// 拆出分段开头的数字与其后的后缀
    fn split_leading_number(segment: &str) -> (&str, &str) {
        let end = segment
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(segment.len());
        segment.split_at(end)
    }
}

impl FromStr for Version {
    type Err = RuleError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix(['v', 'V'])
            .unwrap_or(trimmed);

        if !body.chars().any(|c| c.is_ascii_digit()) {
            return Err(RuleError::InvalidVersion(raw.to_string()));
        }

        let mut components = Vec::new();
        for segment in body.split('.') {
            let (digits, suffix) = Self::split_leading_number(segment);
            let value = if digits.is_empty() {
                0
            } else {
                digits
                    .parse::<u64>()
                    .map_err(|_| RuleError::InvalidVersion(raw.to_string()))?
            };
            components.push(value);

            if !digits.is_empty() && !suffix.is_empty() {
                break;
            }
        }

        Ok(Self { components })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}
