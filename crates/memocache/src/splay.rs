//! Splay tree: self-adjusting binary search tree
//!
//! Every successful [`SplayTree::find`] rotates the located node up to the
//! root, so keys that are looked up repeatedly (or sit near recently used
//! keys) end up on short paths. Access cost is amortized O(log n).
//!
//! Nodes are stored in an arena and address each other by index. The tree
//! never deletes single nodes: it only grows on [`SplayTree::insert`] and
//! restructures on `find`.
//!
//! ```text
//!   zig            zig-zig               zig-zag
//!
//!     p    x          g       x            g         x
//!    /  =>  \        /         \          /         / \
//!   x        p      p    =>     p        p    =>   p   g
//!                  /             \        \
//!                 x               g        x
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;

use tracing::trace;

/// Node in the splay tree arena
#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

/// Ordered key-value store that splays on lookup
#[derive(Debug)]
pub struct SplayTree<K, V> {
    nodes: Vec<Node<K, V>>,
    root: Option<usize>,
}

impl<K: Ord, V> SplayTree<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Insert a key-value pair as a new leaf
    ///
    /// If the key is already present the tree is left untouched and the
    /// stored value is kept, unlike [`LruCache::put`](crate::LruCache::put)
    /// which overwrites. Returns whether a node was added. Insertion never
    /// splays.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let Some(mut cur) = self.root else {
            self.root = Some(self.alloc(key, value, None));
            return true;
        };

        loop {
            let node = &self.nodes[cur];
            let ord = key.cmp(&node.key);
            let child = match ord {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return false,
            };

            if let Some(next) = child {
                cur = next;
                continue;
            }

            let leaf = self.alloc(key, value, Some(cur));
            if ord == Ordering::Less {
                self.nodes[cur].left = Some(leaf);
            } else {
                self.nodes[cur].right = Some(leaf);
            }
            return true;
        }
    }

    /// Look up a key, splaying its node to the root on a hit
    ///
    /// A miss returns `None` and leaves the shape unchanged.
    pub fn find<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let idx = self.locate(key)?;
        self.splay(idx);
        Some(&self.nodes[idx].value)
    }

    /// Look up a key without restructuring
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).map(|idx| &self.nodes[idx].value)
    }

    /// Check for a key without restructuring
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.locate(key).is_some()
    }

    /// Key at the root, if any
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|idx| &self.nodes[idx].key)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[idx];
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        height
    }

    /// Iterate entries in ascending key order
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
        };
        iter.push_left_spine(self.root);
        iter
    }

    fn alloc(&mut self, key: K, value: V, parent: Option<usize>) -> usize {
        self.nodes.push(Node {
            key,
            value,
            parent,
            left: None,
            right: None,
        });
        self.nodes.len() - 1
    }

    fn locate<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(idx) = cur {
            let node = &self.nodes[idx];
            cur = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(idx),
            };
        }
        None
    }

    fn splay(&mut self, x: usize) {
        while let Some(p) = self.nodes[x].parent {
            let x_is_left = self.nodes[p].left == Some(x);

            let Some(g) = self.nodes[p].parent else {
                trace!("zig");
                if x_is_left {
                    self.rotate_right(p);
                } else {
                    self.rotate_left(p);
                }
                continue;
            };

            let p_is_left = self.nodes[g].left == Some(p);
            match (x_is_left, p_is_left) {
                (true, true) => {
                    trace!("zig-zig");
                    self.rotate_right(g);
                    self.rotate_right(p);
                }
                (false, false) => {
                    trace!("zig-zig");
                    self.rotate_left(g);
                    self.rotate_left(p);
                }
                (true, false) => {
                    trace!("zig-zag");
                    self.rotate_right(p);
                    self.rotate_left(g);
                }
                (false, true) => {
                    trace!("zig-zag");
                    self.rotate_left(p);
                    self.rotate_right(g);
                }
            }
        }
    }

    fn rotate_right(&mut self, n: usize) {
        let Some(l) = self.nodes[n].left else {
            return;
        };

        let inner = self.nodes[l].right;
        self.nodes[n].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(n);
        }

        let parent = self.nodes[n].parent;
        self.nodes[l].parent = parent;
        self.replace_child(parent, n, l);

        self.nodes[l].right = Some(n);
        self.nodes[n].parent = Some(l);
    }

    fn rotate_left(&mut self, n: usize) {
        let Some(r) = self.nodes[n].right else {
            return;
        };

        let inner = self.nodes[r].left;
        self.nodes[n].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(n);
        }

        let parent = self.nodes[n].parent;
        self.nodes[r].parent = parent;
        self.replace_child(parent, n, r);

        self.nodes[r].left = Some(n);
        self.nodes[n].parent = Some(r);
    }

    // Point whatever referenced `old` (a parent slot or the root) at `new`
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: usize) {
        match parent {
            None => self.root = Some(new),
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = Some(new),
            Some(p) => self.nodes[p].right = Some(new),
        }
    }

    /// Keys of the children of `key`, for shape assertions
    #[cfg(test)]
    pub(crate) fn children_of(&self, key: &K) -> Option<(Option<&K>, Option<&K>)> {
        let node = &self.nodes[self.locate(key)?];
        Some((
            node.left.map(|c| &self.nodes[c].key),
            node.right.map(|c| &self.nodes[c].key),
        ))
    }

    /// Verify parent links, key ordering and reachability
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> std::result::Result<(), String> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err("nodes exist but the tree has no root".to_string())
            };
        };
        if self.nodes[root].parent.is_some() {
            return Err("root has a parent".to_string());
        }

        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            reachable += 1;
            if reachable > self.nodes.len() {
                return Err("cycle in child links".to_string());
            }
            let node = &self.nodes[idx];
            for child in [node.left, node.right].into_iter().flatten() {
                if self.nodes[child].parent != Some(idx) {
                    return Err(format!("node {child} has a stale parent link"));
                }
                stack.push(child);
            }
        }
        if reachable != self.nodes.len() {
            return Err(format!(
                "{reachable} of {} nodes reachable from the root",
                self.nodes.len()
            ));
        }

        let keys: Vec<&K> = self.iter().map(|(k, _)| k).collect();
        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err("in-order keys are not strictly increasing".to_string());
        }
        Ok(())
    }
}

impl<K: Ord, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator over a [`SplayTree`]
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    stack: Vec<usize>,
}

impl<K, V> Iter<'_, K, V> {
    fn push_left_spine(&mut self, mut cur: Option<usize>) {
        while let Some(idx) = cur {
            self.stack.push(idx);
            cur = self.nodes[idx].left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let nodes = self.nodes;
        self.push_left_spine(nodes[idx].right);
        Some((&nodes[idx].key, &nodes[idx].value))
    }
}
