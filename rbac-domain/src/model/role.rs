use crate::entity::Entity;
use crate::snowflake::Id;
use rbac_macros::entity;

/// 角色：按平台划分，经关联获得权限并授予用户
#[entity]
pub struct Role {
    platform: String,
    name: String,
}

impl Role {
    pub fn named(id: Id, platform: impl Into<String>, name: impl Into<String>) -> Self {
        let mut role = <Self as Entity>::new(id);
        role.platform = platform.into();
        role.name = name.into();
        role
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }
}
