//! 规则引擎错误类型
//!
//! 求值路径上的错误表示规则本身无法求值，在求值器内部传播，最终折叠为 `false`；
//! 加载与存储路径上的错误才会返回给调用方。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则解析失败: {0}")]
    ParseError(String),

    #[error("不支持的操作符: {0}")]
    UnsupportedOperator(String),

    #[error("无效的操作符: {operator} 不支持类型 {value_type}")]
    InvalidOperator {
        operator: String,
        value_type: String,
    },

    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("无法解析版本号: '{0}'")]
    InvalidVersion(String),

    #[error("无法解析日期时间: '{0}'")]
    InvalidTimestamp(String),

    #[error("不支持的规则类型")]
    UnsupportedRule,

    #[error("规则格式错误: {0}")]
    MalformedRule(String),

    #[error("通知未找到: {0}")]
    SpecNotFound(String),

    #[error("读取文件失败 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RuleError {
    /// 失败关闭计数使用的原因标签
    pub fn reason(&self) -> &'static str {
        match self {
            Self::ParseError(_) => "parse_error",
            Self::UnsupportedOperator(_) => "unsupported_operator",
            Self::InvalidOperator { .. } => "invalid_operator",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::InvalidVersion(_) => "invalid_version",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::UnsupportedRule => "unsupported_rule",
            Self::MalformedRule(_) => "malformed_rule",
            Self::SpecNotFound(_) => "spec_not_found",
            Self::Io { .. } => "io",
            Self::JsonError(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
