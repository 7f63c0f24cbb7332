use crate::error::{Result, RuleError};
use crate::models::{EvaluationContext, PublishAfterTimeRule, PublishBeforeTimeRule};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::fold;

/// 发布时间窗口规则处理器
///
/// 与上下文中的评估时钟比较，时间戳无法解析时不通过。
pub struct PublishTimeRuleProcessor;

impl PublishTimeRuleProcessor {
    /// `now >= publish_after`
    pub fn process_after(rule: &PublishAfterTimeRule, context: &EvaluationContext) -> bool {
        fold("publish_after_time", Self::try_process_after(rule, context))
    }

    /// `now < publish_before`
    pub fn process_before(rule: &PublishBeforeTimeRule, context: &EvaluationContext) -> bool {
        fold("publish_before_time", Self::try_process_before(rule, context))
    }

    pub fn try_process_after(
        rule: &PublishAfterTimeRule,
        context: &EvaluationContext,
    ) -> Result<bool> {
        Ok(context.now() >= Self::parse_timestamp(&rule.publish_after)?)
    }

    pub fn try_process_before(
        rule: &PublishBeforeTimeRule,
        context: &EvaluationContext,
    ) -> Result<bool> {
        Ok(context.now() < Self::parse_timestamp(&rule.publish_before)?)
    }

    /// 解析日期时间
    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        let s = raw.trim();

        // 尝试解析 ISO 8601 格式
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        // 不带时区的日期时间按 UTC 处理
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt.and_utc());
        }

        // 纯日期按当天零点处理
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }

        Err(RuleError::InvalidTimestamp(raw.to_string()))
    }
}
