use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::snowflake::Id;
use std::collections::BTreeMap;

/// 按标识索引的实体表
///
/// 常规读取（`get/require/iter`）跳过已软删除的实体，`*_with_deleted` 不做过滤。
#[derive(Debug, Clone)]
pub struct EntityTable<E> {
    rows: BTreeMap<Id, E>,
}

impl<E> Default for EntityTable<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<E> EntityTable<E>
where
    E: Entity,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或替换，返回旧值；零值标识被拒绝
    pub fn insert(&mut self, entity: E) -> DomainResult<Option<E>> {
        let id = entity.id();
        if id.is_root() {
            return Err(DomainError::InvalidValue {
                reason: format!("{} without identifier", E::KIND),
            });
        }
        Ok(self.rows.insert(id, entity))
    }

    pub fn get(&self, id: Id) -> Option<&E> {
        self.rows.get(&id).filter(|e| e.is_live())
    }

    pub fn get_with_deleted(&self, id: Id) -> Option<&E> {
        self.rows.get(&id)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut E> {
        self.rows.get_mut(&id).filter(|e| e.is_live())
    }

    pub fn require(&self, id: Id) -> DomainResult<&E> {
        self.get(id).ok_or_else(|| DomainError::not_found(E::KIND, id))
    }

    pub fn contains(&self, id: Id) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values().filter(|e| e.is_live())
    }

    pub fn iter_with_deleted(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    /// 软删除；实体不存在时返回 `NotFound`，重复删除返回 `false`
    pub fn soft_delete(&mut self, id: Id) -> DomainResult<bool> {
        let entity = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(E::KIND, id))?;
        Ok(entity.soft_delete())
    }

    /// 含已删除实体的总数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn reads_skip_soft_deleted_rows() {
        let mut roles = EntityTable::new();
        roles.insert(Role::named(Id::new(1), "平台1", "管理员")).unwrap();
        roles.insert(Role::named(Id::new(2), "平台1", "角色1")).unwrap();

        assert!(roles.soft_delete(Id::new(2)).unwrap());
        assert!(!roles.soft_delete(Id::new(2)).unwrap());

        assert!(roles.get(Id::new(2)).is_none());
        assert!(roles.get_with_deleted(Id::new(2)).is_some());
        assert_eq!(roles.iter().count(), 1);
        assert_eq!(roles.len(), 2);
        assert!(matches!(
            roles.require(Id::new(2)),
            Err(DomainError::NotFound { kind: "role", .. })
        ));
    }

    #[test]
    fn zero_identifier_rejected() {
        let mut roles = EntityTable::new();
        assert!(roles.insert(Role::named(Id::ROOT, "平台1", "x")).is_err());
        assert!(matches!(
            roles.soft_delete(Id::new(9)),
            Err(DomainError::NotFound { .. })
        ));
    }
}
