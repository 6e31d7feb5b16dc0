use super::{
    EPOCH_MILLIS, MAX_TIMESTAMP_OFFSET, MAX_WORKER_ID, SEQUENCE_MASK, TIMESTAMP_SHIFT,
    WORKER_ID_SHIFT,
};
use crate::error::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use rbac_macros::entity_id;

/// 实体标识
///
/// 零值为哨兵：表示“根”（容器无父级）或“尚未分配”（实体未持久化），
/// 发号器永远不会产生零值。
#[entity_id]
#[derive(Copy, PartialOrd, Ord)]
pub struct Id(u64);

/// 标识拆解结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdParts {
    /// Unix 毫秒时间戳（已加回纪元）
    pub timestamp_millis: u64,
    pub worker_id: u16,
    pub sequence: u16,
}

impl Id {
    /// 根 / 未分配 哨兵
    pub const ROOT: Id = Id(0);

    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    pub const fn is_root(&self) -> bool {
        self.0 == 0
    }

    /// 按位布局拆解
    pub fn decompose(&self) -> IdParts {
        IdParts {
            timestamp_millis: (self.0 >> TIMESTAMP_SHIFT) + EPOCH_MILLIS,
            worker_id: ((self.0 >> WORKER_ID_SHIFT) as u16) & MAX_WORKER_ID,
            sequence: (self.0 as u16) & SEQUENCE_MASK,
        }
    }

    /// 按位布局组装，任一分量越界时返回错误
    pub fn compose(parts: IdParts) -> DomainResult<Self> {
        let offset = parts
            .timestamp_millis
            .checked_sub(EPOCH_MILLIS)
            .filter(|offset| *offset <= MAX_TIMESTAMP_OFFSET)
            .ok_or_else(|| DomainError::TimestampOutOfRange {
                now_millis: parts.timestamp_millis,
                epoch_millis: EPOCH_MILLIS,
            })?;
        if parts.worker_id > MAX_WORKER_ID {
            return Err(DomainError::InvalidWorkerId {
                worker_id: i64::from(parts.worker_id),
                max: MAX_WORKER_ID,
            });
        }
        if parts.sequence > SEQUENCE_MASK {
            return Err(DomainError::InvalidValue {
                reason: format!("sequence {} exceeds {}", parts.sequence, SEQUENCE_MASK),
            });
        }

        Ok(Self(
            (offset << TIMESTAMP_SHIFT)
                | (u64::from(parts.worker_id) << WORKER_ID_SHIFT)
                | u64::from(parts.sequence),
        ))
    }

    /// 发号时刻（毫秒精度）
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        let millis = i64::try_from(self.decompose().timestamp_millis).ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_decompose_roundtrip() {
        let parts = IdParts {
            timestamp_millis: EPOCH_MILLIS + 123_456,
            worker_id: 1,
            sequence: 42,
        };
        let id = Id::compose(parts).unwrap();
        assert_eq!(id.decompose(), parts);
        assert_eq!(id.as_u64() >> 63, 0);
        assert_eq!(id.as_u64(), (123_456 << 22) | (1 << 12) | 42);
    }

    #[test]
    fn compose_rejects_out_of_range_parts() {
        let before_epoch = IdParts {
            timestamp_millis: EPOCH_MILLIS - 1,
            worker_id: 0,
            sequence: 0,
        };
        assert!(matches!(
            Id::compose(before_epoch),
            Err(DomainError::TimestampOutOfRange { .. })
        ));

        let bad_worker = IdParts {
            timestamp_millis: EPOCH_MILLIS,
            worker_id: 1024,
            sequence: 0,
        };
        assert!(matches!(
            Id::compose(bad_worker),
            Err(DomainError::InvalidWorkerId { worker_id: 1024, .. })
        ));

        let bad_sequence = IdParts {
            timestamp_millis: EPOCH_MILLIS,
            worker_id: 0,
            sequence: 4096,
        };
        assert!(matches!(
            Id::compose(bad_sequence),
            Err(DomainError::InvalidValue { .. })
        ));
    }

    #[test]
    fn max_timestamp_keeps_sign_bit_clear() {
        let id = Id::compose(IdParts {
            timestamp_millis: EPOCH_MILLIS + MAX_TIMESTAMP_OFFSET,
            worker_id: MAX_WORKER_ID,
            sequence: SEQUENCE_MASK,
        })
        .unwrap();
        assert_eq!(id.as_u64(), i64::MAX as u64);
    }

    #[test]
    fn root_sentinel_and_text_forms() {
        assert!(Id::ROOT.is_root());
        assert_eq!(Id::default(), Id::ROOT);

        let id: Id = "4096".parse().unwrap();
        assert_eq!(id, Id::new(4096));
        assert_eq!(id.to_string(), "4096");
        assert_eq!(serde_json::to_string(&id).unwrap(), "4096");
    }

    #[test]
    fn issued_at_matches_timestamp_bits() {
        let id = Id::compose(IdParts {
            timestamp_millis: 1_709_604_930_123,
            worker_id: 3,
            sequence: 0,
        })
        .unwrap();
        let at = id.issued_at().unwrap();
        assert_eq!(at.timestamp_millis(), 1_709_604_930_123);
    }
}
