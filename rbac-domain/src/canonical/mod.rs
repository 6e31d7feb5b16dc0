//! 规范序列化（canonical）
//!
//! 将实体或实体图渲染为 JSON，所有时间戳字段统一输出为参考时区下的
//! `"YYYY-MM-DD HH:MM:SS"`。
//!
//! 格式化通过字段类型 [`Timestamp`] 的 `Serialize` 实现完成，而非对通用 JSON
//! 输出做文本替换，因此恰好形似时间戳的普通字符串不会被改写。
//! 失败统一返回 [`DomainError::Serialization`]，不返回部分结果。
//!
mod timestamp;

pub use timestamp::{CANONICAL_FORMAT, REFERENCE_OFFSET_SECS, Timestamp, reference_zone};

use crate::error::{DomainError, DomainResult};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;

/// 渲染为紧凑 JSON
pub fn serialize<T>(value: &T) -> DomainResult<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(DomainError::from)
}

/// 渲染为带缩进的 JSON
pub fn serialize_pretty<T>(value: &T) -> DomainResult<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string_pretty(value).map_err(DomainError::from)
}

/// 渲染为 `serde_json::Value`，便于在上层再组合
pub fn to_value<T>(value: &T) -> DomainResult<serde_json::Value>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value).map_err(DomainError::from)
}

/// 从 JSON 还原实体（时间戳接受规范格式与 RFC 3339）
pub fn deserialize<T>(text: &str) -> DomainResult<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str(text).map_err(DomainError::from)
}

/// 解析扁平的字符串字典，例如 `{"name":"admin","platform":"p1"}`
pub fn parse_string_map(text: &str) -> DomainResult<HashMap<String, String>> {
    deserialize(text)
}
