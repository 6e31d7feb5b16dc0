//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑。
//!
use crate::error::{DomainError, DomainResult};
use crate::snowflake::MAX_WORKER_ID;
use rbac_macros::value_object;
use std::fmt;

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 发号器实例编号（0..=1023）
///
/// 反序列化同样经过范围校验。
///
/// # 示例
///
/// ```
/// use rbac_domain::value_object::WorkerId;
///
/// let w = WorkerId::new(1).unwrap();
/// assert_eq!(w.value(), 1);
/// assert!(WorkerId::new(1024).is_err());
/// assert!(WorkerId::new(-1).is_err());
/// ```
#[value_object(try_from = i64)]
#[derive(Copy, PartialOrd, Ord, Hash)]
pub struct WorkerId(u16);

impl WorkerId {
    pub fn new(worker_id: i64) -> DomainResult<Self> {
        let invalid = || DomainError::InvalidWorkerId {
            worker_id,
            max: MAX_WORKER_ID,
        };
        let raw = u16::try_from(worker_id).map_err(|_| invalid())?;
        let id = Self(raw);
        id.validate().map_err(|_| invalid())?;
        Ok(id)
    }

    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl ValueObject for WorkerId {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.0 > MAX_WORKER_ID {
            return Err(DomainError::InvalidWorkerId {
                worker_id: i64::from(self.0),
                max: MAX_WORKER_ID,
            });
        }
        Ok(())
    }
}

impl TryFrom<i64> for WorkerId {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkerId> for u16 {
    fn from(worker_id: WorkerId) -> Self {
        worker_id.value()
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_full_range() {
        assert_eq!(WorkerId::new(0).unwrap().value(), 0);
        assert_eq!(WorkerId::new(1023).unwrap().value(), 1023);
    }

    #[test]
    fn rejects_out_of_range() {
        for bad in [-1, 1024, 70_000, i64::MAX] {
            match WorkerId::new(bad) {
                Err(DomainError::InvalidWorkerId { worker_id, max }) => {
                    assert_eq!(worker_id, bad);
                    assert_eq!(max, 1023);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn deserialize_validates_range() {
        let ok: WorkerId = serde_json::from_str("7").unwrap();
        assert_eq!(ok.value(), 7);
        assert!(serde_json::from_str::<WorkerId>("2048").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "7");
    }

    #[test]
    fn display_and_ordering() {
        let a = WorkerId::new(1).unwrap();
        let b = WorkerId::new(2).unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "worker-1");
    }
}
