//! 实体（Entity）基础抽象
//!
//! 每个持久化实体都嵌入一个 [`EntityBase`]：标识、创建/更新/软删除时间与可选描述。
//! 构造不做任何校验；`touch`/`soft_delete` 是更新时间字段的唯一途径。
//!
use crate::canonical::Timestamp;
use crate::error::{DomainError, DomainResult};
use crate::snowflake::Id;
use serde::{Deserialize, Serialize};

/// 实体公共信封
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityBase {
    id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl EntityBase {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<Timestamp> {
        self.deleted_at
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 未软删除即为存活
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// 为尚未分配标识（零值）的实体分配标识；已分配时报错
    pub fn assign_id(&mut self, id: Id) -> DomainResult<()> {
        if !self.id.is_root() {
            return Err(DomainError::InvalidState {
                reason: format!("identifier already assigned: {}", self.id),
            });
        }
        if id.is_root() {
            return Err(DomainError::InvalidValue {
                reason: "cannot assign the zero identifier".to_string(),
            });
        }
        self.id = id;
        Ok(())
    }

    pub fn touch(&mut self) {
        self.touch_at(Timestamp::now());
    }

    pub fn touch_at(&mut self, at: Timestamp) {
        self.updated_at = Some(at);
    }

    /// 首次持久化时写入创建时间（此后不再改变），并刷新更新时间
    pub fn mark_persisted(&mut self, at: Timestamp) {
        if self.created_at.is_none() {
            self.created_at = Some(at);
        }
        self.touch_at(at);
    }

    /// 以已存储的信封为准恢复创建时间与软删除状态
    pub(crate) fn carry_persisted(&mut self, stored: &EntityBase) {
        self.created_at = stored.created_at;
        if stored.deleted_at.is_some() {
            self.deleted_at = stored.deleted_at;
        }
    }

    /// 软删除；返回本次调用是否改变了状态（重复删除保留首次删除时间）
    pub fn soft_delete(&mut self) -> bool {
        self.soft_delete_at(Timestamp::now())
    }

    pub fn soft_delete_at(&mut self, at: Timestamp) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        self.deleted_at = Some(at);
        self.touch_at(at);
        true
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }
}

/// 具备标识与公共信封的实体
///
/// 通常由 `#[entity]` 宏实现，手写时只需提供 `KIND/new/base/base_mut`。
pub trait Entity: Send + Sync {
    /// 实体种类名，用于错误信息与日志
    const KIND: &'static str;

    /// 使用给定标识创建实体，其余字段取默认值
    fn new(id: Id) -> Self
    where
        Self: Sized;

    fn base(&self) -> &EntityBase;

    fn base_mut(&mut self) -> &mut EntityBase;

    fn id(&self) -> Id {
        self.base().id()
    }

    fn is_live(&self) -> bool {
        self.base().is_live()
    }

    fn touch(&mut self) {
        self.base_mut().touch();
    }

    fn soft_delete(&mut self) -> bool {
        self.base_mut().soft_delete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ts(text: &str) -> Timestamp {
        Timestamp::from(DateTime::parse_from_rfc3339(text).unwrap())
    }

    #[test]
    fn new_base_is_live_and_untimed() {
        let base = EntityBase::new(Id::new(9));
        assert_eq!(base.id(), Id::new(9));
        assert!(base.is_live());
        assert!(base.created_at().is_none());
        assert!(base.updated_at().is_none());
        assert!(base.description().is_none());
    }

    #[test]
    fn created_at_is_immutable_after_first_persist() {
        let mut base = EntityBase::new(Id::new(1));
        base.mark_persisted(ts("2024-01-01T00:00:00Z"));
        base.mark_persisted(ts("2024-02-01T00:00:00Z"));
        assert_eq!(base.created_at(), Some(ts("2024-01-01T00:00:00Z")));
        assert_eq!(base.updated_at(), Some(ts("2024-02-01T00:00:00Z")));
    }

    #[test]
    fn stored_envelope_wins_over_stale_copy() {
        let mut stored = EntityBase::new(Id::new(1));
        stored.mark_persisted(ts("2024-01-01T00:00:00Z"));
        let mut stale = stored.clone();
        assert!(stored.soft_delete_at(ts("2024-03-01T00:00:00Z")));

        stale.created_at = Some(ts("2001-01-01T00:00:00Z"));
        stale.carry_persisted(&stored);
        assert_eq!(stale.created_at(), Some(ts("2024-01-01T00:00:00Z")));
        assert_eq!(stale.deleted_at(), Some(ts("2024-03-01T00:00:00Z")));
        assert!(!stale.is_live());
    }

    #[test]
    fn soft_delete_keeps_first_timestamp() {
        let mut base = EntityBase::new(Id::new(1));
        assert!(base.soft_delete_at(ts("2024-01-01T00:00:00Z")));
        assert!(!base.soft_delete_at(ts("2024-06-01T00:00:00Z")));
        assert!(!base.is_live());
        assert_eq!(base.deleted_at(), Some(ts("2024-01-01T00:00:00Z")));
        assert_eq!(base.updated_at(), Some(ts("2024-01-01T00:00:00Z")));
    }

    #[test]
    fn assign_id_only_once() {
        let mut base = EntityBase::default();
        assert!(matches!(
            base.assign_id(Id::ROOT),
            Err(DomainError::InvalidValue { .. })
        ));
        base.assign_id(Id::new(5)).unwrap();
        assert!(matches!(
            base.assign_id(Id::new(6)),
            Err(DomainError::InvalidState { .. })
        ));
        assert_eq!(base.id(), Id::new(5));
    }

    #[test]
    fn description_update_touches() {
        let mut base = EntityBase::new(Id::new(1));
        base.set_description(Some("ops".into()));
        assert_eq!(base.description(), Some("ops"));
        assert!(base.updated_at().is_some());
    }

    #[test]
    fn serialization_omits_absent_fields() {
        let mut base = EntityBase::new(Id::new(3));
        base.mark_persisted(ts("2024-03-05T10:15:30.123456789+08:00"));
        let json = serde_json::to_value(&base).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["created_at"], "2024-03-05 10:15:30");
        assert!(json.get("deleted_at").is_none());
        assert!(json.get("description").is_none());
    }
}
