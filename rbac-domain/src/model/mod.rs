//! RBAC 实体模型
//!
//! - 叶子实体：[`User`]、[`Permission`]、[`Role`]
//! - 容器实体：[`UserGroup`]、[`PermissionGroup`]、[`RoleGroup`]，
//!   通过 `parent_id` 组成同类森林（零值表示根），并各自容纳对应种类的叶子
//!
//! 子分组与成员均为派生关系，不在实体上冗余保存，由 `hierarchy` 模块按标识查找计算。
//!
mod group;
mod permission;
mod role;
mod user;

pub use group::{PermissionGroup, RoleGroup, UserGroup};
pub use permission::Permission;
pub use role::Role;
pub use user::User;

use crate::entity::Entity;
use crate::snowflake::Id;

pub(crate) mod sealed {
    use crate::snowflake::Id;

    /// 父标识写入凭据，仅本 crate 可构造
    #[derive(Debug, Clone, Copy)]
    pub struct ParentToken(pub(crate) ());

    /// 父标识写入口；外部只能经由 `Forest::attach_child/detach_child` 改变父级
    pub trait ParentLink {
        fn set_parent_id(&mut self, parent: Id, token: ParentToken);
    }
}

/// 容器实体：可嵌套同类容器，并容纳 `Member` 种类的叶子实体
pub trait Container: Entity + Clone + sealed::ParentLink {
    type Member: Entity + Clone;

    fn name(&self) -> &str;

    /// 父容器标识，`Id::ROOT` 表示根
    fn parent_id(&self) -> Id;

    fn is_root(&self) -> bool {
        self.parent_id().is_root()
    }
}
