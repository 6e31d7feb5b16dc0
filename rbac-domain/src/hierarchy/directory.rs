use super::{AssociationSet, EntityTable, Forest, GroupNode, Membership, RoleGrants};
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::model::{Container, Permission, PermissionGroup, Role, RoleGroup, User, UserGroup};
use crate::snowflake::Id;
use std::collections::BTreeSet;
use tracing::debug;

/// 同类分组森林 + 叶子归属
#[derive(Debug, Clone)]
pub struct GroupTree<G>
where
    G: Container,
{
    forest: Forest<G>,
    membership: Membership<G::Member>,
}

impl<G> Default for GroupTree<G>
where
    G: Container,
{
    fn default() -> Self {
        Self {
            forest: Forest::new(),
            membership: Membership::new(),
        }
    }
}

impl<G> GroupTree<G>
where
    G: Container,
{
    pub fn forest(&self) -> &Forest<G> {
        &self.forest
    }

    pub fn forest_mut(&mut self) -> &mut Forest<G> {
        &mut self.forest
    }

    pub fn membership(&self) -> &Membership<G::Member> {
        &self.membership
    }

    /// 把叶子放入分组（独占，重复分配即移动），返回原分组
    ///
    /// 叶子与分组都必须存在且未软删除。
    pub fn assign(
        &mut self,
        leaf: Id,
        group: Id,
        leaves: &EntityTable<G::Member>,
    ) -> DomainResult<Option<Id>> {
        leaves.require(leaf)?;
        self.require_live(group)?;
        let previous = self.membership.assign(leaf, group);
        debug!(kind = G::KIND, %leaf, %group, "member assigned");
        Ok(previous)
    }

    pub fn unassign(&mut self, leaf: Id) -> Option<Id> {
        self.membership.unassign(leaf)
    }

    /// 叶子当前所在分组
    pub fn group_of(&self, leaf: Id) -> Option<&G> {
        self.membership
            .container_of(leaf)
            .and_then(|id| self.forest.get(id))
    }

    /// 以 `root` 为根构造树视图，已软删除的分组及其子树、成员均不出现
    pub fn node<'a>(
        &'a self,
        root: Id,
        leaves: &'a EntityTable<G::Member>,
    ) -> DomainResult<GroupNode<'a, G>> {
        let group = self.require_live(root)?;
        // 先完整走一遍：数据成环时在此报告 HierarchyCorrupt，后续递归必然有界
        for node in self.forest.descendants(root)? {
            node?;
        }
        Ok(self.build(group, leaves))
    }

    /// 全部存活根分组的树视图
    pub fn nodes<'a>(
        &'a self,
        leaves: &'a EntityTable<G::Member>,
    ) -> DomainResult<Vec<GroupNode<'a, G>>> {
        self.forest
            .roots()
            .filter(|g| g.is_live())
            .map(|g| self.node(g.id(), leaves))
            .collect()
    }

    fn build<'a>(&'a self, group: &'a G, leaves: &'a EntityTable<G::Member>) -> GroupNode<'a, G> {
        let members = self
            .membership
            .members_of(group.id())
            .filter_map(|id| leaves.get(id))
            .collect();
        let children = self
            .forest
            .children(group.id())
            .filter(|g| g.is_live())
            .map(|g| self.build(g, leaves))
            .collect();
        GroupNode {
            group,
            members,
            children,
        }
    }

    fn require_live(&self, id: Id) -> DomainResult<&G> {
        self.forest
            .get(id)
            .filter(|g| g.is_live())
            .ok_or_else(|| DomainError::not_found(G::KIND, id))
    }
}

/// RBAC 目录：六类实体、三棵分组森林与两组关联边
///
/// 所有建边操作都会校验两端实体存在且存活（否则 `NotFound`）；
/// 软删除从不级联，关联与归属原样保留，只在读取视图时过滤。
#[derive(Debug, Clone, Default)]
pub struct Directory {
    users: EntityTable<User>,
    permissions: EntityTable<Permission>,
    roles: EntityTable<Role>,
    user_groups: GroupTree<UserGroup>,
    permission_groups: GroupTree<PermissionGroup>,
    role_groups: GroupTree<RoleGroup>,
    role_permissions: AssociationSet<Role, Permission>,
    role_users: AssociationSet<Role, User>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- 实体表 ----

    pub fn users(&self) -> &EntityTable<User> {
        &self.users
    }

    pub fn users_mut(&mut self) -> &mut EntityTable<User> {
        &mut self.users
    }

    pub fn permissions(&self) -> &EntityTable<Permission> {
        &self.permissions
    }

    pub fn permissions_mut(&mut self) -> &mut EntityTable<Permission> {
        &mut self.permissions
    }

    pub fn roles(&self) -> &EntityTable<Role> {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut EntityTable<Role> {
        &mut self.roles
    }

    // ---- 分组 ----

    pub fn user_groups(&self) -> &GroupTree<UserGroup> {
        &self.user_groups
    }

    pub fn user_groups_mut(&mut self) -> &mut GroupTree<UserGroup> {
        &mut self.user_groups
    }

    pub fn permission_groups(&self) -> &GroupTree<PermissionGroup> {
        &self.permission_groups
    }

    pub fn permission_groups_mut(&mut self) -> &mut GroupTree<PermissionGroup> {
        &mut self.permission_groups
    }

    pub fn role_groups(&self) -> &GroupTree<RoleGroup> {
        &self.role_groups
    }

    pub fn role_groups_mut(&mut self) -> &mut GroupTree<RoleGroup> {
        &mut self.role_groups
    }

    pub fn assign_user(&mut self, user: Id, group: Id) -> DomainResult<Option<Id>> {
        self.user_groups.assign(user, group, &self.users)
    }

    pub fn assign_permission(&mut self, permission: Id, group: Id) -> DomainResult<Option<Id>> {
        self.permission_groups
            .assign(permission, group, &self.permissions)
    }

    pub fn assign_role(&mut self, role: Id, group: Id) -> DomainResult<Option<Id>> {
        self.role_groups.assign(role, group, &self.roles)
    }

    pub fn user_group_tree(&self) -> DomainResult<Vec<GroupNode<'_, UserGroup>>> {
        self.user_groups.nodes(&self.users)
    }

    pub fn permission_group_tree(&self) -> DomainResult<Vec<GroupNode<'_, PermissionGroup>>> {
        self.permission_groups.nodes(&self.permissions)
    }

    pub fn role_group_tree(&self) -> DomainResult<Vec<GroupNode<'_, RoleGroup>>> {
        self.role_groups.nodes(&self.roles)
    }

    // ---- 关联 ----

    /// 为角色授予权限；已授予时返回 `false`
    pub fn grant_permission(&mut self, role: Id, permission: Id) -> DomainResult<bool> {
        self.roles.require(role)?;
        self.permissions.require(permission)?;
        let changed = self.role_permissions.associate(role, permission);
        debug!(%role, %permission, changed, "permission granted");
        Ok(changed)
    }

    /// 撤销；未授予时返回 `false`
    pub fn revoke_permission(&mut self, role: Id, permission: Id) -> bool {
        self.role_permissions.dissociate(role, permission)
    }

    /// 把用户加入角色；已加入时返回 `false`
    pub fn grant_role(&mut self, role: Id, user: Id) -> DomainResult<bool> {
        self.roles.require(role)?;
        self.users.require(user)?;
        let changed = self.role_users.associate(role, user);
        debug!(%role, %user, changed, "role granted");
        Ok(changed)
    }

    pub fn revoke_role(&mut self, role: Id, user: Id) -> bool {
        self.role_users.dissociate(role, user)
    }

    pub fn role_permissions(&self) -> &AssociationSet<Role, Permission> {
        &self.role_permissions
    }

    pub fn role_users(&self) -> &AssociationSet<Role, User> {
        &self.role_users
    }

    /// 角色及其存活的权限与用户
    pub fn role_grants(&self, role: Id) -> DomainResult<RoleGrants<'_>> {
        let role = self.roles.require(role)?;
        Ok(RoleGrants {
            role,
            permissions: self
                .role_permissions
                .rights_of(role.id())
                .filter_map(|id| self.permissions.get(id))
                .collect(),
            users: self
                .role_users
                .rights_of(role.id())
                .filter_map(|id| self.users.get(id))
                .collect(),
        })
    }

    /// 用户经由全部存活角色获得的权限（去重，按标识排序）
    pub fn effective_permissions(&self, user: Id) -> DomainResult<Vec<&Permission>> {
        self.users.require(user)?;
        let ids: BTreeSet<Id> = self
            .role_users
            .lefts_of(user)
            .filter(|role| self.roles.contains(*role))
            .flat_map(|role| self.role_permissions.rights_of(role))
            .collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| self.permissions.get(id))
            .collect())
    }

    /// 校验三棵分组森林
    pub fn validate(&self) -> DomainResult<()> {
        self.user_groups.forest().validate()?;
        self.permission_groups.forest().validate()?;
        self.role_groups.forest().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Directory {
        let mut dir = Directory::new();
        dir.users_mut()
            .insert(User::named(Id::new(1), "admin", "张津杰"))
            .unwrap();
        dir.users_mut()
            .insert(User::named(Id::new(2), "admin1", "王"))
            .unwrap();
        dir.roles_mut()
            .insert(Role::named(Id::new(10), "平台1", "管理员"))
            .unwrap();
        dir.roles_mut()
            .insert(Role::named(Id::new(11), "平台1", "角色1"))
            .unwrap();
        for (id, name, path) in [(20, "查看", "/Line/View"), (21, "编辑", "/Line/Edit")] {
            dir.permissions_mut()
                .insert(Permission::named(Id::new(id), "平台1", name, path))
                .unwrap();
        }
        dir
    }

    #[test]
    fn grants_check_both_ends() {
        let mut dir = seeded();
        assert!(dir.grant_permission(Id::new(10), Id::new(20)).unwrap());
        assert!(!dir.grant_permission(Id::new(10), Id::new(20)).unwrap());
        assert!(matches!(
            dir.grant_permission(Id::new(10), Id::new(99)),
            Err(DomainError::NotFound {
                kind: "permission",
                ..
            })
        ));
        assert!(matches!(
            dir.grant_role(Id::new(99), Id::new(1)),
            Err(DomainError::NotFound { kind: "role", .. })
        ));
        assert!(dir.revoke_permission(Id::new(10), Id::new(20)));
        assert!(!dir.revoke_permission(Id::new(10), Id::new(20)));
    }

    #[test]
    fn effective_permissions_follow_live_roles() {
        let mut dir = seeded();
        dir.grant_permission(Id::new(10), Id::new(20)).unwrap();
        dir.grant_permission(Id::new(10), Id::new(21)).unwrap();
        dir.grant_permission(Id::new(11), Id::new(21)).unwrap();
        dir.grant_role(Id::new(10), Id::new(1)).unwrap();
        dir.grant_role(Id::new(11), Id::new(1)).unwrap();

        let paths: Vec<&str> = dir
            .effective_permissions(Id::new(1))
            .unwrap()
            .into_iter()
            .map(Permission::path)
            .collect();
        assert_eq!(paths, vec!["/Line/View", "/Line/Edit"]);

        dir.roles_mut().soft_delete(Id::new(10)).unwrap();
        let paths: Vec<&str> = dir
            .effective_permissions(Id::new(1))
            .unwrap()
            .into_iter()
            .map(Permission::path)
            .collect();
        assert_eq!(paths, vec!["/Line/Edit"]);
        // 关联边本身不随软删除移除
        assert!(dir.role_permissions().contains(Id::new(10), Id::new(20)));
    }

    #[test]
    fn role_grants_view() {
        let mut dir = seeded();
        dir.grant_permission(Id::new(10), Id::new(20)).unwrap();
        dir.grant_role(Id::new(10), Id::new(1)).unwrap();
        dir.grant_role(Id::new(10), Id::new(2)).unwrap();
        dir.users_mut().soft_delete(Id::new(2)).unwrap();

        let grants = dir.role_grants(Id::new(10)).unwrap();
        assert_eq!(grants.permissions.len(), 1);
        assert_eq!(grants.users.len(), 1);

        let json = serde_json::to_value(&grants).unwrap();
        assert_eq!(json["name"], "管理员");
        assert_eq!(json["permissions"][0]["path"], "/Line/View");
        assert_eq!(json["users"][0]["account"], "admin");
    }

    #[test]
    fn group_tree_view_hides_deleted_nodes() {
        let mut dir = seeded();
        let groups = dir.role_groups_mut().forest_mut();
        groups.insert(RoleGroup::named(Id::new(30), "分组1")).unwrap();
        groups
            .insert(RoleGroup::named(Id::new(31), "2级分组").with_parent(Id::new(30)))
            .unwrap();
        groups
            .insert(RoleGroup::named(Id::new(32), "分组2").with_parent(Id::new(30)))
            .unwrap();

        assert_eq!(dir.assign_role(Id::new(10), Id::new(31)).unwrap(), None);
        assert_eq!(
            dir.assign_role(Id::new(10), Id::new(32)).unwrap(),
            Some(Id::new(31))
        );
        dir.assign_role(Id::new(11), Id::new(31)).unwrap();
        dir.role_groups_mut()
            .forest_mut()
            .soft_delete(Id::new(32))
            .unwrap();

        let tree = dir.role_group_tree().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].size(), 2);
        assert_eq!(tree[0].children[0].members[0].name(), "角色1");
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json[0]["name"], "分组1");
        assert_eq!(json[0]["children"][0]["name"], "2级分组");

        // 已删除分组不能再接收成员
        assert!(matches!(
            dir.assign_role(Id::new(11), Id::new(32)),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn corrupt_group_store_surfaces_in_views() {
        let mut dir = seeded();
        let groups = dir.user_groups_mut().forest_mut();
        groups.insert(UserGroup::named(Id::new(40), "根")).unwrap();
        groups
            .insert(UserGroup::named(Id::new(41), "a").with_parent(Id::new(42)))
            .unwrap();
        groups
            .insert(UserGroup::named(Id::new(42), "b").with_parent(Id::new(41)))
            .unwrap();

        assert!(matches!(
            dir.user_groups().node(Id::new(41), dir.users()),
            Err(DomainError::HierarchyCorrupt { .. })
        ));
        assert!(dir.validate().is_err());
    }
}
