use super::sealed::{ParentLink, ParentToken};
use super::{Container, Permission, Role, User};
use crate::entity::Entity;
use crate::snowflake::Id;
use rbac_macros::entity;

macro_rules! container {
    ($(#[$meta:meta])* $name:ident => $member:ty) => {
        $(#[$meta])*
        #[entity]
        pub struct $name {
            name: String,
            #[serde(default)]
            parent_id: Id,
        }

        impl $name {
            /// 创建根分组
            pub fn named(id: Id, name: impl Into<String>) -> Self {
                let mut group = <Self as Entity>::new(id);
                group.name = name.into();
                group
            }

            /// 以指定父分组构造（仅用于组装/还原，挂载请走 `Forest::attach_child`）
            pub fn with_parent(mut self, parent: Id) -> Self {
                self.parent_id = parent;
                self
            }

            pub fn rename(&mut self, name: impl Into<String>) {
                self.name = name.into();
                self.touch();
            }
        }

        impl Container for $name {
            type Member = $member;

            fn name(&self) -> &str {
                &self.name
            }

            fn parent_id(&self) -> Id {
                self.parent_id
            }
        }

        impl ParentLink for $name {
            fn set_parent_id(&mut self, parent: Id, _token: ParentToken) {
                self.parent_id = parent;
            }
        }
    };
}

container! {
    /// 用户分组
    UserGroup => User
}

container! {
    /// 权限分组
    PermissionGroup => Permission
}

container! {
    /// 角色分组
    RoleGroup => Role
}
