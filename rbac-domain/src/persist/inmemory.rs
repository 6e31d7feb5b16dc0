use super::Repository;
use crate::canonical::Timestamp;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use crate::snowflake::{Clock, Id, IdGenerator, SystemClock};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::debug;

/// 基于内存的仓储实现
/// - 以 `DashMap` 分片存储，可在多任务间共享
/// - 首次保存时通过共享的发号器为零值标识分配编号
/// - 再次保存保留已存储的创建时间；已软删除的行保持删除状态
pub struct InMemoryRepository<E, C = SystemClock> {
    rows: DashMap<Id, E>,
    ids: Arc<IdGenerator<C>>,
}

impl<E, C> InMemoryRepository<E, C>
where
    E: Entity + Clone + 'static,
    C: Clock,
{
    pub fn new(ids: Arc<IdGenerator<C>>) -> Self {
        Self {
            rows: DashMap::new(),
            ids,
        }
    }

    /// 含已软删除实体的总数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[async_trait]
impl<E, C> Repository<E> for InMemoryRepository<E, C>
where
    E: Entity + Clone + 'static,
    C: Clock + 'static,
{
    async fn find(&self, id: Id) -> Result<Option<E>> {
        Ok(self
            .rows
            .get(&id)
            .filter(|row| row.is_live())
            .map(|row| row.value().clone()))
    }

    async fn find_with_deleted(&self, id: Id) -> Result<Option<E>> {
        Ok(self.rows.get(&id).map(|row| row.value().clone()))
    }

    async fn list(&self) -> Result<Vec<E>> {
        let mut out: Vec<E> = self
            .rows
            .iter()
            .filter(|row| row.is_live())
            .map(|row| row.value().clone())
            .collect();
        out.sort_by_key(|e| e.id());
        Ok(out)
    }

    async fn save(&self, mut entity: E) -> Result<E> {
        if entity.id().is_root() {
            let id = self.ids.next_id()?;
            entity.base_mut().assign_id(id)?;
            debug!(kind = E::KIND, %id, "identifier assigned on first save");
        }

        let id = entity.id();
        // 已存储行的创建时间与软删除状态不被调用方副本覆盖
        match self.rows.entry(id) {
            Entry::Occupied(mut row) => {
                entity.base_mut().carry_persisted(row.get().base());
                entity.base_mut().mark_persisted(Timestamp::now());
                row.insert(entity.clone());
            }
            Entry::Vacant(row) => {
                entity.base_mut().mark_persisted(Timestamp::now());
                row.insert(entity.clone());
            }
        }
        debug!(kind = E::KIND, %id, "entity saved");
        Ok(entity)
    }

    async fn soft_delete(&self, id: Id) -> Result<bool> {
        let mut row = self
            .rows
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(E::KIND, id))?;
        let changed = row.soft_delete();
        if changed {
            debug!(kind = E::KIND, %id, "entity soft-deleted");
        }
        Ok(changed)
    }
}
