use anyhow::Context;
use rbac_domain::canonical;
use rbac_domain::config::Settings;
use rbac_domain::entity::Entity;
use rbac_domain::hierarchy::Directory;
use rbac_domain::model::{Permission, Role, RoleGroup, User};
use rbac_domain::persist::{InMemoryRepository, Repository};
use rbac_domain::snowflake::Id;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const PASSWORD_HASH: &str = "e10adc3949ba59abbe56e057f20f883e";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("demo/rbac.toml"));
    let settings = Settings::load(Some(&path)).context("loading settings")?;
    let ids = Arc::new(settings.build_generator()?);

    // 一次批量预取，部分实体使用预分配标识，其余留零由仓储分配
    let reserved = ids.next_ids(100)?;

    let roles = InMemoryRepository::<Role>::new(ids.clone());
    let role_groups = InMemoryRepository::<RoleGroup>::new(ids.clone());
    let users = InMemoryRepository::<User>::new(ids.clone());
    let permissions = InMemoryRepository::<Permission>::new(ids.clone());

    let admin_role = roles
        .save(Role::named(reserved[3], "平台1", "管理员"))
        .await?;
    let role1 = roles.save(Role::named(reserved[2], "平台1", "角色1")).await?;
    let role2 = roles.save(Role::named(reserved[1], "平台1", "角色2")).await?;
    for (platform, name) in [
        ("平台2", "管理员"),
        ("平台3", "管理员"),
        ("平台3", "角色1"),
        ("平台3", "角色2"),
    ] {
        roles.save(Role::named(Id::ROOT, platform, name)).await?;
    }

    let mut second_level = None;
    for (root, children) in [
        ("分组1", &["2级分组", "分组12", "分组13"][..]),
        ("分组2", &["2级分组", "分组22", "分组23"][..]),
        ("分组3", &[][..]),
        ("分组4", &[][..]),
        ("分组5", &[][..]),
    ] {
        let parent = role_groups.save(RoleGroup::named(Id::ROOT, root)).await?;
        for child in children {
            let saved = role_groups
                .save(RoleGroup::named(Id::ROOT, *child).with_parent(parent.id()))
                .await?;
            if root == "分组2" && *child == "2级分组" {
                second_level = Some(saved.id());
            }
        }
    }

    for (idx, account, name, qq) in [
        (10, "admin", "管理员", "2342342342"),
        (11, "admin1", "张津杰", "982372873"),
        (13, "admin2", "于中玮", "610750125"),
        (12, "admin3", "赵毅", "982639692"),
        (20, "admin4", "程业俊", "2987329723"),
    ] {
        users
            .save(
                User::named(reserved[idx], account, name)
                    .with_password_hash(PASSWORD_HASH)
                    .with_qq(qq),
            )
            .await?;
    }

    for (name, path) in [
        ("线路查看", "/Line/View"),
        ("线路编辑", "/Line/Edit"),
        ("站点修改", "/Stop/Modify"),
        ("站点删除", "/Stop/Update"),
        ("新增站点", "/Stop/Create"),
    ] {
        permissions
            .save(Permission::named(Id::ROOT, "平台1", name, path))
            .await?;
    }

    // 从仓储装载目录
    let mut directory = Directory::new();
    for role in roles.list().await? {
        directory.roles_mut().insert(role)?;
    }
    for user in users.list().await? {
        directory.users_mut().insert(user)?;
    }
    for permission in permissions.list().await? {
        directory.permissions_mut().insert(permission)?;
    }
    for group in role_groups.list().await? {
        directory.role_groups_mut().forest_mut().insert(group)?;
    }
    directory.validate()?;

    let second_level = second_level.context("second-level group was not created")?;
    for role in [&admin_role, &role1, &role2] {
        directory.assign_role(role.id(), second_level)?;
    }

    let permission_ids: Vec<Id> = directory.permissions().iter().map(|p| p.id()).collect();
    for permission in permission_ids {
        directory.grant_permission(admin_role.id(), permission)?;
    }
    let line_view = permission_id_by_path(&directory, "/Line/View")?;
    directory.grant_permission(role1.id(), line_view)?;
    directory.grant_role(admin_role.id(), reserved[10])?;
    directory.grant_role(role1.id(), reserved[11])?;

    println!("{}", canonical::serialize_pretty(&directory.role_group_tree()?)?);
    println!("{}", canonical::serialize_pretty(&directory.role_grants(admin_role.id())?)?);

    let effective: Vec<&str> = directory
        .effective_permissions(reserved[11])?
        .into_iter()
        .map(Permission::path)
        .collect();
    tracing::info!(user = %reserved[11], ?effective, "effective permissions");

    Ok(())
}

fn permission_id_by_path(directory: &Directory, path: &str) -> anyhow::Result<Id> {
    directory
        .permissions()
        .iter()
        .find(|p| p.path() == path)
        .map(|p| p.id())
        .with_context(|| format!("permission {path} not seeded"))
}
