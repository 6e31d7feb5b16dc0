//! 领域层统一错误定义
//!
//! 覆盖发号器、实体生命周期、层级结构、序列化与配置加载，
//! 各层统一转换为 `DomainError`，核心内部不吞错、不回退默认值。
//!
use crate::snowflake::Id;
use thiserror::Error;

/// 统一错误类型
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 发号器 ---
    #[error("invalid worker id: {worker_id} (expected 0..={max})")]
    InvalidWorkerId { worker_id: i64, max: u16 },
    #[error("clock moved backwards: last={last_millis}ms, now={now_millis}ms")]
    ClockRollback { last_millis: u64, now_millis: u64 },
    #[error("timestamp out of range: {now_millis}ms (epoch={epoch_millis}ms)")]
    TimestampOutOfRange { now_millis: u64, epoch_millis: u64 },

    // --- 层级结构 ---
    #[error("cycle detected: attaching {child} under {parent}")]
    CycleDetected { parent: Id, child: Id },
    #[error("hierarchy corrupt: kind={kind}, start={start}, reason={reason}")]
    HierarchyCorrupt {
        kind: &'static str,
        start: Id,
        reason: String,
    },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    #[error("parse error: {reason}")]
    Parse { reason: String },

    // --- 实体/仓储 ---
    #[error("not found: kind={kind}, id={id}")]
    NotFound { kind: &'static str, id: Id },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("repository error: {reason}")]
    Repository { reason: String },

    // --- 配置 ---
    #[error("config error: {reason}")]
    Config { reason: String },
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: Id) -> Self {
        DomainError::NotFound { kind, id }
    }

    pub fn corrupt(kind: &'static str, start: Id, reason: impl Into<String>) -> Self {
        DomainError::HierarchyCorrupt {
            kind,
            start,
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config {
            reason: err.to_string(),
        }
    }
}

impl From<std::num::ParseIntError> for DomainError {
    fn from(err: std::num::ParseIntError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

impl From<chrono::ParseError> for DomainError {
    fn from(err: chrono::ParseError) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}
