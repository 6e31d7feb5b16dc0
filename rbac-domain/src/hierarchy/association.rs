use crate::snowflake::Id;
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// 多对多关联边集合（如 角色↔权限、角色↔用户）
///
/// 边没有顺序语义；`associate/dissociate` 幂等，只报告是否发生变化。
#[derive(Debug, Clone)]
pub struct AssociationSet<L, R> {
    forward: BTreeSet<(Id, Id)>,
    backward: BTreeSet<(Id, Id)>,
    _kinds: PhantomData<fn() -> (L, R)>,
}

impl<L, R> Default for AssociationSet<L, R> {
    fn default() -> Self {
        Self {
            forward: BTreeSet::new(),
            backward: BTreeSet::new(),
            _kinds: PhantomData,
        }
    }
}

impl<L, R> AssociationSet<L, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增边；已存在时返回 `false`
    pub fn associate(&mut self, left: Id, right: Id) -> bool {
        let added = self.forward.insert((left, right));
        if added {
            self.backward.insert((right, left));
        }
        added
    }

    /// 删除边；不存在时返回 `false`
    pub fn dissociate(&mut self, left: Id, right: Id) -> bool {
        let removed = self.forward.remove(&(left, right));
        if removed {
            self.backward.remove(&(right, left));
        }
        removed
    }

    pub fn contains(&self, left: Id, right: Id) -> bool {
        self.forward.contains(&(left, right))
    }

    pub fn rights_of(&self, left: Id) -> impl Iterator<Item = Id> + '_ {
        self.forward
            .range((left, Id::ROOT)..=(left, Id::new(u64::MAX)))
            .map(|(_, r)| *r)
    }

    pub fn lefts_of(&self, right: Id) -> impl Iterator<Item = Id> + '_ {
        self.backward
            .range((right, Id::ROOT)..=(right, Id::new(u64::MAX)))
            .map(|(_, l)| *l)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id, Id)> + '_ {
        self.forward.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
