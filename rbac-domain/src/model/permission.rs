use crate::entity::Entity;
use crate::snowflake::Id;
use rbac_macros::entity;

/// 权限：平台内的一条受控资源路径
#[entity]
pub struct Permission {
    platform: String,
    name: String,
    path: String,
}

impl Permission {
    pub fn named(
        id: Id,
        platform: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        let mut permission = <Self as Entity>::new(id);
        permission.platform = platform.into();
        permission.name = name.into();
        permission.path = path.into();
        permission
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_path_touches() {
        let mut p = Permission::named(Id::new(1), "平台1", "线路查看", "/Line/View");
        assert!(p.base().updated_at().is_none());
        p.set_path("/Line/List");
        assert_eq!(p.path(), "/Line/List");
        assert!(p.base().updated_at().is_some());
        assert_eq!(Permission::KIND, "permission");
    }
}
