//! Resumable traversal cursors over a section tree.
//!
//! Both the [`mutable`](crate::mutable) and the [`immutable`](crate::immutable)
//! representations implement [`Tree`], so the same three cursors walk
//! either of them:
//!
//! - [`DepthIter`]: pre-order depth-first, children in stored order
//! - [`BreadthIter`]: level order, one root tree after the other
//! - [`UpstreamIter`]: from a section up to its root, inclusive
//!
//! Every cursor exposes `current`, `advance` and `is_end`, and compares
//! equal to [`end`](DepthIter::end) once exhausted. Each also implements
//! [`Iterator`] yielding section ids.

use std::collections::VecDeque;

use crate::types::SectionId;

/// Parent and children lookup by section id.
pub trait Tree {
    /// The root section ids, in stored order.
    fn root_ids(&self) -> &[SectionId];

    /// The children of `id`, in stored order. Unknown ids have no children.
    fn children_of(&self, id: SectionId) -> &[SectionId];

    /// The parent of `id`, or `None` for roots and unknown ids.
    fn parent_of(&self, id: SectionId) -> Option<SectionId>;

    /// Whether `id` names a section of this tree.
    fn contains(&self, id: SectionId) -> bool;
}

/// The single starting section, or nothing when `start` is not in `tree`.
fn start_at<T: Tree + ?Sized>(tree: &T, start: SectionId) -> Vec<SectionId> {
    if tree.contains(start) {
        vec![start]
    } else {
        Vec::new()
    }
}

fn same_tree<T: ?Sized>(lhs: &T, rhs: &T) -> bool {
    std::ptr::addr_eq(lhs as *const T, rhs as *const T)
}

/// Pre-order depth-first cursor.
///
/// Children are pushed in reverse so that the first stored child is visited
/// first.
#[derive(Debug, Clone)]
pub struct DepthIter<'a, T: Tree + ?Sized> {
    tree: &'a T,
    stack: Vec<SectionId>,
}

impl<'a, T: Tree + ?Sized> DepthIter<'a, T> {
    /// Starts at `start`, or at every root in turn when `start` is `None`.
    pub fn new(tree: &'a T, start: Option<SectionId>) -> Self {
        let stack = match start {
            Some(id) => start_at(tree, id),
            None => tree.root_ids().iter().rev().copied().collect(),
        };
        Self { tree, stack }
    }

    /// The exhausted cursor over `tree`.
    pub fn end(tree: &'a T) -> Self {
        Self {
            tree,
            stack: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<SectionId> {
        self.stack.last().copied()
    }

    /// Moves to the next section. Does nothing once exhausted.
    pub fn advance(&mut self) {
        if let Some(id) = self.stack.pop() {
            self.stack
                .extend(self.tree.children_of(id).iter().rev().copied());
        }
    }

    pub fn is_end(&self) -> bool {
        self.stack.is_empty()
    }
}

impl<T: Tree + ?Sized> PartialEq for DepthIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        same_tree(self.tree, other.tree) && self.stack == other.stack
    }
}

impl<T: Tree + ?Sized> Iterator for DepthIter<'_, T> {
    type Item = SectionId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current()?;
        self.advance();
        Some(current)
    }
}

/// Level-order cursor.
///
/// Holds one queue per root tree; a root tree is finished before the next
/// one starts.
#[derive(Debug, Clone)]
pub struct BreadthIter<'a, T: Tree + ?Sized> {
    tree: &'a T,
    queues: VecDeque<VecDeque<SectionId>>,
}

impl<'a, T: Tree + ?Sized> BreadthIter<'a, T> {
    /// Starts at `start`, or at every root in turn when `start` is `None`.
    pub fn new(tree: &'a T, start: Option<SectionId>) -> Self {
        let queues = match start {
            Some(id) => start_at(tree, id)
                .into_iter()
                .map(|id| VecDeque::from([id]))
                .collect(),
            None => tree
                .root_ids()
                .iter()
                .map(|&root| VecDeque::from([root]))
                .collect(),
        };
        Self { tree, queues }
    }

    /// The exhausted cursor over `tree`.
    pub fn end(tree: &'a T) -> Self {
        Self {
            tree,
            queues: VecDeque::new(),
        }
    }

    pub fn current(&self) -> Option<SectionId> {
        self.queues.front().and_then(|queue| queue.front().copied())
    }

    /// Moves to the next section. Does nothing once exhausted.
    pub fn advance(&mut self) {
        let Some(queue) = self.queues.front_mut() else {
            return;
        };
        if let Some(id) = queue.pop_front() {
            queue.extend(self.tree.children_of(id).iter().copied());
        }
        if queue.is_empty() {
            self.queues.pop_front();
        }
    }

    pub fn is_end(&self) -> bool {
        self.queues.is_empty()
    }
}

impl<T: Tree + ?Sized> PartialEq for BreadthIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        same_tree(self.tree, other.tree) && self.queues == other.queues
    }
}

impl<T: Tree + ?Sized> Iterator for BreadthIter<'_, T> {
    type Item = SectionId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current()?;
        self.advance();
        Some(current)
    }
}

/// Root-ward cursor.
///
/// Starting from a section it yields the section, its parent, and so on up
/// to the root. Starting from `None` it yields each root once.
#[derive(Debug, Clone)]
pub struct UpstreamIter<'a, T: Tree + ?Sized> {
    tree: &'a T,
    pending: Vec<SectionId>,
}

impl<'a, T: Tree + ?Sized> UpstreamIter<'a, T> {
    pub fn new(tree: &'a T, start: Option<SectionId>) -> Self {
        let pending = match start {
            Some(id) => start_at(tree, id),
            None => tree.root_ids().iter().rev().copied().collect(),
        };
        Self { tree, pending }
    }

    /// The exhausted cursor over `tree`.
    pub fn end(tree: &'a T) -> Self {
        Self {
            tree,
            pending: Vec::new(),
        }
    }

    pub fn current(&self) -> Option<SectionId> {
        self.pending.last().copied()
    }

    /// Moves to the parent of the current section.
    pub fn advance(&mut self) {
        if let Some(id) = self.pending.pop() {
            if let Some(parent) = self.tree.parent_of(id) {
                self.pending.push(parent);
            }
        }
    }

    pub fn is_end(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T: Tree + ?Sized> PartialEq for UpstreamIter<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        same_tree(self.tree, other.tree) && self.pending == other.pending
    }
}

impl<T: Tree + ?Sized> Iterator for UpstreamIter<'_, T> {
    type Item = SectionId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current()?;
        self.advance();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    /// Two root trees:
    ///
    /// ```text
    /// 0 ─┬─ 1 ─┬─ 3
    ///    │     └─ 4
    ///    └─ 2
    /// 5 ─── 6
    /// ```
    struct Fixture {
        roots: Vec<SectionId>,
        children: HashMap<SectionId, Vec<SectionId>>,
        parents: HashMap<SectionId, SectionId>,
    }

    impl Fixture {
        fn new() -> Self {
            let edges = [(0, 1), (0, 2), (1, 3), (1, 4), (5, 6)];
            let mut children: HashMap<SectionId, Vec<SectionId>> = HashMap::new();
            let mut parents = HashMap::new();
            for (parent, child) in edges {
                children.entry(parent).or_default().push(child);
                parents.insert(child, parent);
            }
            Self {
                roots: vec![0, 5],
                children,
                parents,
            }
        }
    }

    impl Tree for Fixture {
        fn root_ids(&self) -> &[SectionId] {
            &self.roots
        }

        fn children_of(&self, id: SectionId) -> &[SectionId] {
            self.children.get(&id).map_or(&[][..], Vec::as_slice)
        }

        fn parent_of(&self, id: SectionId) -> Option<SectionId> {
            self.parents.get(&id).copied()
        }

        fn contains(&self, id: SectionId) -> bool {
            self.roots.contains(&id) || self.parents.contains_key(&id)
        }
    }

    #[test]
    fn test_depth_order() {
        let tree = Fixture::new();

        let all: Vec<_> = DepthIter::new(&tree, None).collect();
        assert_eq!(all, vec![0, 1, 3, 4, 2, 5, 6]);

        let sub: Vec<_> = DepthIter::new(&tree, Some(1)).collect();
        assert_eq!(sub, vec![1, 3, 4]);
    }

    #[test]
    fn test_breadth_order() {
        let tree = Fixture::new();

        let all: Vec<_> = BreadthIter::new(&tree, None).collect();
        assert_eq!(all, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_upstream_order() {
        let tree = Fixture::new();

        let path: Vec<_> = UpstreamIter::new(&tree, Some(4)).collect();
        assert_eq!(path, vec![4, 1, 0]);

        let roots: Vec<_> = UpstreamIter::new(&tree, None).collect();
        assert_eq!(roots, vec![0, 5]);

        let root_only: Vec<_> = UpstreamIter::new(&tree, Some(5)).collect();
        assert_eq!(root_only, vec![5]);
    }

    #[test]
    fn test_unknown_start_is_empty() {
        let tree = Fixture::new();

        assert!(DepthIter::new(&tree, Some(999)).is_end());
        assert!(BreadthIter::new(&tree, Some(999)) == BreadthIter::end(&tree));
        assert_eq!(UpstreamIter::new(&tree, Some(999)).count(), 0);
    }

    #[test]
    fn test_cursor_reaches_end() {
        let tree = Fixture::new();
        let end = DepthIter::end(&tree);
        let mut cursor = DepthIter::new(&tree, Some(2));

        assert!(cursor != end);
        assert_eq!(cursor.current(), Some(2));
        cursor.advance();
        assert!(cursor.is_end());
        assert!(cursor == end);

        cursor.advance();
        assert!(cursor == end);
    }

    #[test]
    fn test_cursors_interleave() {
        let tree = Fixture::new();
        let mut depth = DepthIter::new(&tree, None);
        let mut breadth = BreadthIter::new(&tree, None);

        let mut pairs = Vec::new();
        while depth != DepthIter::end(&tree) && breadth != BreadthIter::end(&tree) {
            pairs.push((depth.current(), breadth.current()));
            depth.advance();
            breadth.advance();
        }

        assert_eq!(pairs.len(), 7);
        assert_eq!(pairs[2], (Some(3), Some(2)));
    }
}
