use crate::model::{Container, Permission, Role, User};
use serde::Serialize;

/// 分组树视图：分组本身（平铺字段）+ 存活成员 + 子分组
#[derive(Serialize)]
#[serde(bound(serialize = "G: Serialize, G::Member: Serialize"))]
pub struct GroupNode<'a, G>
where
    G: Container,
{
    #[serde(flatten)]
    pub group: &'a G,
    pub members: Vec<&'a G::Member>,
    pub children: Vec<GroupNode<'a, G>>,
}

impl<G> GroupNode<'_, G>
where
    G: Container,
{
    /// 子树中的分组数（含自身）
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(Self::size).sum::<usize>()
    }
}

/// 角色授权视图
#[derive(Debug, Serialize)]
pub struct RoleGrants<'a> {
    #[serde(flatten)]
    pub role: &'a Role,
    pub permissions: Vec<&'a Permission>,
    pub users: Vec<&'a User>,
}
