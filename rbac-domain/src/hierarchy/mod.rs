//! 层级结构
//!
//! - [`Forest`]：同类分组的 arena 森林，挂载时检测环，遍历以容器数为上限
//! - [`Membership`]：叶子到分组的独占归属
//! - [`AssociationSet`]：角色↔权限、角色↔用户 的多对多关联
//! - [`Directory`]：上述结构的聚合，负责建边时的引用校验与读取视图
//!
//! 软删除从不隐式级联，级联只能通过 [`Forest::soft_delete_subtree`] 显式发起。
//!
mod association;
mod directory;
mod forest;
mod membership;
mod table;
mod view;

pub use association::AssociationSet;
pub use directory::{Directory, GroupTree};
pub use forest::{Descendants, Forest};
pub use membership::Membership;
pub use table::EntityTable;
pub use view::{GroupNode, RoleGrants};
