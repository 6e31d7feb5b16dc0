use crate::snowflake::Id;
use std::collections::{BTreeMap, BTreeSet};
use std::marker::PhantomData;

/// 叶子 → 容器 的独占归属表
///
/// 每个叶子同一时刻至多属于一个同类容器；重新分配即为移动。
/// 正反两个索引同步维护，`members_of` 无需扫描。
#[derive(Debug, Clone)]
pub struct Membership<L> {
    owner: BTreeMap<Id, Id>,
    members: BTreeMap<Id, BTreeSet<Id>>,
    _leaf: PhantomData<fn() -> L>,
}

impl<L> Default for Membership<L> {
    fn default() -> Self {
        Self {
            owner: BTreeMap::new(),
            members: BTreeMap::new(),
            _leaf: PhantomData,
        }
    }
}

impl<L> Membership<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 把叶子分配到容器，返回之前所属的容器（若有）
    pub fn assign(&mut self, leaf: Id, container: Id) -> Option<Id> {
        let previous = self.owner.insert(leaf, container);
        if let Some(prev) = previous {
            self.remove_from(prev, leaf);
        }
        self.members.entry(container).or_default().insert(leaf);
        previous
    }

    /// 解除归属，返回原容器
    pub fn unassign(&mut self, leaf: Id) -> Option<Id> {
        let previous = self.owner.remove(&leaf)?;
        self.remove_from(previous, leaf);
        Some(previous)
    }

    pub fn container_of(&self, leaf: Id) -> Option<Id> {
        self.owner.get(&leaf).copied()
    }

    pub fn members_of(&self, container: Id) -> impl Iterator<Item = Id> + '_ {
        self.members
            .get(&container)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.owner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_empty()
    }

    fn remove_from(&mut self, container: Id, leaf: Id) {
        if let Some(set) = self.members.get_mut(&container) {
            set.remove(&leaf);
            if set.is_empty() {
                self.members.remove(&container);
            }
        }
    }
}
