use crate::canonical::Timestamp;
use crate::error::{DomainError, DomainResult};
use crate::model::Container;
use crate::model::sealed::ParentToken;
use crate::snowflake::Id;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// 同类容器森林（arena 表示）
///
/// 以标识为键的扁平表保存全部容器，另维护 父标识 → 子标识 索引，
/// 父子导航均通过查表完成（根容器挂在 `Id::ROOT` 之下）。
/// 遍历均以容器总数为上限，越界视为数据损坏（`HierarchyCorrupt`）。
#[derive(Debug, Clone)]
pub struct Forest<G> {
    nodes: BTreeMap<Id, G>,
    children: BTreeMap<Id, BTreeSet<Id>>,
}

impl<G> Default for Forest<G> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            children: BTreeMap::new(),
        }
    }
}

impl<G> Forest<G>
where
    G: Container,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 从存储还原：逐个插入后整体校验
    pub fn load<I>(groups: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = G>,
    {
        let mut forest = Self::new();
        for group in groups {
            forest.insert(group)?;
        }
        forest.validate()?;
        Ok(forest)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: Id) -> Option<&G> {
        self.nodes.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &G> {
        self.nodes.values()
    }

    fn require(&self, id: Id) -> DomainResult<&G> {
        self.nodes
            .get(&id)
            .ok_or_else(|| DomainError::not_found(G::KIND, id))
    }

    fn link(&mut self, parent: Id, child: Id) {
        self.children.entry(parent).or_default().insert(child);
    }

    fn unlink(&mut self, parent: Id, child: Id) {
        if let Some(set) = self.children.get_mut(&parent) {
            set.remove(&child);
            if set.is_empty() {
                self.children.remove(&parent);
            }
        }
    }

    fn reparent(&mut self, child: Id, parent: Id) {
        let Some(node) = self.nodes.get_mut(&child) else {
            return;
        };
        let previous = node.parent_id();
        node.set_parent_id(parent, ParentToken(()));
        node.touch();
        self.unlink(previous, child);
        self.link(parent, child);
    }

    /// 插入新容器，或替换父级不变的已有容器，返回被替换的旧值
    ///
    /// 这是从存储还原的入口：父容器可以暂未插入（按任意顺序还原），
    /// 整体一致性由 `validate` 检查。零值标识、自引用父级会被拒绝；
    /// 替换时改变父级返回 `InvalidState`，改挂请使用 `attach_child/detach_child`。
    pub fn insert(&mut self, group: G) -> DomainResult<Option<G>> {
        let id = group.id();
        if id.is_root() {
            return Err(DomainError::InvalidValue {
                reason: format!("{} without identifier", G::KIND),
            });
        }
        if group.parent_id() == id {
            return Err(DomainError::CycleDetected {
                parent: id,
                child: id,
            });
        }
        let moved = self
            .nodes
            .get(&id)
            .is_some_and(|existing| existing.parent_id() != group.parent_id());
        if moved {
            return Err(DomainError::InvalidState {
                reason: format!("{} {id} cannot change parent on replace", G::KIND),
            });
        }
        self.link(group.parent_id(), id);
        Ok(self.nodes.insert(id, group))
    }

    /// 就地修改容器的非结构字段（名称、描述等）
    ///
    /// 闭包改动了标识或父级时整体回滚并返回 `InvalidState`。
    pub fn modify<F>(&mut self, id: Id, f: F) -> DomainResult<()>
    where
        F: FnOnce(&mut G),
    {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(G::KIND, id))?;
        let before = node.clone();
        f(node);
        if node.id() != before.id() || node.parent_id() != before.parent_id() {
            *node = before;
            return Err(DomainError::InvalidState {
                reason: format!("{} {id}: identifier and parent are structural", G::KIND),
            });
        }
        Ok(())
    }

    /// 根容器（`parent_id` 为零值）
    pub fn roots(&self) -> impl Iterator<Item = &G> {
        self.children(Id::ROOT)
    }

    /// 直接子容器，按标识升序
    pub fn children(&self, id: Id) -> impl Iterator<Item = &G> {
        self.children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.nodes.get(child))
    }

    /// 由近及远的祖先链（不含自身）
    pub fn ancestors(&self, id: Id) -> DomainResult<Vec<&G>> {
        let mut out = Vec::new();
        let mut cursor = self.require(id)?.parent_id();
        while !cursor.is_root() {
            if out.len() >= self.nodes.len() {
                return Err(DomainError::corrupt(
                    G::KIND,
                    id,
                    "parent chain exceeds container count",
                ));
            }
            let parent = self.nodes.get(&cursor).ok_or_else(|| {
                DomainError::corrupt(G::KIND, id, format!("dangling parent {cursor}"))
            })?;
            out.push(parent);
            cursor = parent.parent_id();
        }
        Ok(out)
    }

    /// 惰性深度优先遍历全部后代（不含自身）
    pub fn descendants(&self, id: Id) -> DomainResult<Descendants<'_, G>> {
        self.require(id)?;
        Ok(Descendants {
            forest: self,
            start: id,
            stack: self.children(id).collect::<Vec<_>>().into_iter().rev().collect(),
            visited: 0,
            failed: false,
        })
    }

    /// 将 `child` 挂到 `parent` 下
    ///
    /// `child == parent`，或 `child` 是 `parent` 的祖先时返回 `CycleDetected`，森林保持不变。
    pub fn attach_child(&mut self, parent: Id, child: Id) -> DomainResult<()> {
        self.require(parent)?;
        self.require(child)?;

        if parent == child {
            return Err(DomainError::CycleDetected { parent, child });
        }
        if self.ancestors(parent)?.iter().any(|g| g.id() == child) {
            return Err(DomainError::CycleDetected { parent, child });
        }

        self.reparent(child, parent);
        debug!(kind = G::KIND, %parent, %child, "container attached");
        Ok(())
    }

    /// 将 `child` 摘为根容器，不删除它
    pub fn detach_child(&mut self, child: Id) -> DomainResult<()> {
        if !self.require(child)?.is_root() {
            self.reparent(child, Id::ROOT);
            debug!(kind = G::KIND, %child, "container detached");
        }
        Ok(())
    }

    /// 软删除单个容器，不级联
    pub fn soft_delete(&mut self, id: Id) -> DomainResult<bool> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(G::KIND, id))?;
        Ok(node.soft_delete())
    }

    /// 显式级联：软删除容器及其全部后代，返回本次新删除的标识
    pub fn soft_delete_subtree(&mut self, id: Id) -> DomainResult<Vec<Id>> {
        let mut targets = vec![id];
        for node in self.descendants(id)? {
            targets.push(node?.id());
        }

        let at = Timestamp::now();
        let mut deleted = Vec::new();
        for target in targets {
            let changed = self
                .nodes
                .get_mut(&target)
                .is_some_and(|node| node.base_mut().soft_delete_at(at));
            if changed {
                deleted.push(target);
            }
        }
        debug!(kind = G::KIND, root = %id, count = deleted.len(), "subtree soft-deleted");
        Ok(deleted)
    }

    /// 校验每条父链都能在容器总数步内终止于根，且无悬空父级
    pub fn validate(&self) -> DomainResult<()> {
        for id in self.nodes.keys() {
            self.ancestors(*id)?;
        }
        Ok(())
    }
}

/// `Forest::descendants` 返回的惰性迭代器
///
/// 访问数超过容器总数时产出一次 `HierarchyCorrupt` 后结束。
pub struct Descendants<'a, G> {
    forest: &'a Forest<G>,
    start: Id,
    stack: Vec<&'a G>,
    visited: usize,
    failed: bool,
}

impl<'a, G> Iterator for Descendants<'a, G>
where
    G: Container,
{
    type Item = DomainResult<&'a G>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let node = self.stack.pop()?;

        self.visited += 1;
        if self.visited > self.forest.len() {
            self.failed = true;
            self.stack.clear();
            return Some(Err(DomainError::corrupt(
                G::KIND,
                self.start,
                "descendant walk exceeds container count",
            )));
        }

        let before = self.stack.len();
        self.stack.extend(self.forest.children(node.id()));
        self.stack[before..].reverse();
        Some(Ok(node))
    }
}
