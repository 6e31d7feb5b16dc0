use crate::entity::Entity;
use crate::error::DomainResult as Result;
use crate::snowflake::Id;
use async_trait::async_trait;
use std::sync::Arc;

/// 实体仓储协议
///
/// 实现方需原样保存父标识、关联与软删除状态；常规读取不返回已软删除的实体。
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity + Clone + 'static,
{
    /// 按标识读取存活实体
    async fn find(&self, id: Id) -> Result<Option<E>>;

    /// 按标识读取，包括已软删除的实体
    async fn find_with_deleted(&self, id: Id) -> Result<Option<E>>;

    /// 全部存活实体，按标识升序
    async fn list(&self) -> Result<Vec<E>>;

    /// 保存并返回最终落库的实体
    ///
    /// 零值标识在首次保存时分配；`created_at` 只在首次保存时写入。
    async fn save(&self, entity: E) -> Result<E>;

    /// 软删除；不存在时返回 `NotFound`，重复删除返回 `false`
    async fn soft_delete(&self, id: Id) -> Result<bool>;
}

#[async_trait]
impl<E, T> Repository<E> for Arc<T>
where
    E: Entity + Clone + 'static,
    T: Repository<E> + ?Sized,
{
    async fn find(&self, id: Id) -> Result<Option<E>> {
        (**self).find(id).await
    }

    async fn find_with_deleted(&self, id: Id) -> Result<Option<E>> {
        (**self).find_with_deleted(id).await
    }

    async fn list(&self) -> Result<Vec<E>> {
        (**self).list().await
    }

    async fn save(&self, entity: E) -> Result<E> {
        (**self).save(entity).await
    }

    async fn soft_delete(&self, id: Id) -> Result<bool> {
        (**self).soft_delete(id).await
    }
}
