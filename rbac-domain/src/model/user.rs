use crate::entity::Entity;
use crate::snowflake::Id;
use rbac_macros::entity;

/// 用户账号
///
/// `password_hash` 只参与还原，不会出现在序列化输出中。
#[entity(debug = false)]
pub struct User {
    account: String,
    #[serde(default, skip_serializing)]
    password_hash: String,
    name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    qq: String,
}

impl User {
    pub fn named(id: Id, account: impl Into<String>, name: impl Into<String>) -> Self {
        let mut user = <Self as Entity>::new(id);
        user.account = account.into();
        user.name = name.into();
        user
    }

    pub fn with_password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn with_qq(mut self, qq: impl Into<String>) -> Self {
        self.qq = qq.into();
        self
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qq(&self) -> &str {
        &self.qq
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.touch();
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("base", &self.base)
            .field("account", &self.account)
            .field("name", &self.name)
            .field("qq", &self.qq)
            .finish_non_exhaustive()
    }
}
