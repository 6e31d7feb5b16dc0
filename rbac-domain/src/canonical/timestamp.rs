use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// 规范时间格式（秒精度，无时区后缀）
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 参考时区偏移（UTC+08:00），所有时间戳均换算到该时区后输出
pub const REFERENCE_OFFSET_SECS: i32 = 8 * 3600;

/// 参考时区
pub fn reference_zone() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// 实体时间戳
///
/// 内部以 UTC 保存完整精度；序列化时按字段类型格式化为
/// `"YYYY-MM-DD HH:MM:SS"`（参考时区），反序列化同时接受规范格式与 RFC 3339。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// 参考时区下的规范文本
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    /// 解析规范格式（按参考时区解释）或 RFC 3339
    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        match NaiveDateTime::parse_from_str(text, CANONICAL_FORMAT) {
            Ok(naive) => {
                let local = naive
                    .and_local_timezone(reference_zone())
                    .single()
                    .unwrap_or_else(|| reference_zone().from_utc_datetime(&naive));
                Ok(Self(local.with_timezone(&Utc)))
            }
            Err(_) => DateTime::parse_from_rfc3339(text).map(Self::from),
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.with_timezone(&Utc))
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0.with_timezone(&reference_zone()).format(CANONICAL_FORMAT)
        )
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text).map_err(|e| de::Error::custom(format!("{text:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_reference_zone_without_fraction() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T10:15:30.123456789+08:00").unwrap();
        let ts = Timestamp::from(at);
        assert_eq!(ts.to_canonical_string(), "2024-03-05 10:15:30");
        assert_eq!(serde_json::to_string(&ts).unwrap(), "\"2024-03-05 10:15:30\"");
    }

    #[test]
    fn other_offsets_are_converted() {
        let at = DateTime::parse_from_rfc3339("2024-03-05T02:15:30Z").unwrap();
        assert_eq!(Timestamp::from(at).to_string(), "2024-03-05 10:15:30");

        let at = DateTime::parse_from_rfc3339("2024-03-04T21:15:30-05:00").unwrap();
        assert_eq!(Timestamp::from(at).to_string(), "2024-03-05 10:15:30");
    }

    #[test]
    fn parses_canonical_and_rfc3339() {
        let a = Timestamp::parse("2024-03-05 10:15:30").unwrap();
        let b = Timestamp::parse("2024-03-05T02:15:30Z").unwrap();
        assert_eq!(a, b);
        assert!(Timestamp::parse("yesterday").is_err());

        let c: Timestamp = serde_json::from_str("\"2024-03-05 10:15:30\"").unwrap();
        assert_eq!(c, a);
    }
}
