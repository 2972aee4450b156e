//! An AVL-G tree. This is a self-balancing BST where, at every node, the heights of the left and
//! right subtrees differ by at most `G`. `G` is picked when the tree is constructed and never
//! changes. A classic AVL tree is an AVL-1 tree.
//!
//! Larger values of `G` let the tree drift further out of balance before it rotates. Inserts and
//! deletes then rotate less often at the cost of a (constant factor) taller tree.
//!
//! # Examples
//!
//! ```
//! use avlg::avlg::Tree;
//! use avlg::error::TreeError;
//!
//! let mut tree = Tree::new(1).unwrap();
//!
//! // Nothing in here yet, and an empty tree has no root to search from.
//! assert_eq!(tree.height(), -1);
//! assert_eq!(tree.search(&1), Err(TreeError::EmptyTree));
//!
//! // Inserting 0, 1, 2 in order triggers a single left rotation.
//! tree.insert(0);
//! tree.insert(1);
//! tree.insert(2);
//! assert_eq!(tree.root(), Ok(&1));
//! assert_eq!(tree.height(), 1);
//!
//! // A missing key is not an error.
//! assert_eq!(tree.search(&42), Ok(None));
//!
//! // Deleting a key returns it.
//! assert_eq!(tree.delete(&1), Ok(Some(1)));
//! assert_eq!(tree.count(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

use crate::error::{Result, TreeError};

/// The height of an empty subtree. A leaf has height 0.
const EMPTY_HEIGHT: isize = -1;

/// A self-balancing Binary Search Tree whose sibling subtrees may differ in height by at most a
/// fixed `G` (see [`Tree::max_imbalance`]). Keys are unique; inserting a key that is already
/// present does nothing.
#[derive(Clone)]
pub struct Tree<K> {
    root: Link<K>,
    count: usize,
    max_imbalance: usize,
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("max_imbalance", &self.max_imbalance)
            .field("count", &self.count)
            .field("root", &self.root.node())
            .finish()
    }
}

impl<K> Tree<K> {
    /// Generate a new, empty AVL-G tree where `G` is `max_imbalance`.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidBalance`] if `max_imbalance` is less than 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg::avlg::Tree;
    /// use avlg::error::TreeError;
    ///
    /// assert!(Tree::<i32>::new(3).is_ok());
    /// assert_eq!(Tree::<i32>::new(0).unwrap_err(), TreeError::InvalidBalance(0));
    /// ```
    pub fn new(max_imbalance: isize) -> Result<Self> {
        if max_imbalance < 1 {
            return Err(TreeError::InvalidBalance(max_imbalance));
        }

        debug!("creating an empty AVL-{} tree", max_imbalance);
        Ok(Self {
            root: Link(None),
            count: 0,
            max_imbalance: max_imbalance.unsigned_abs(),
        })
    }

    /// Finds the stored key equal to `key`. Returns `Ok(None)` if no such key is stored.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree has no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg::avlg::Tree;
    ///
    /// let mut tree = Tree::new(2).unwrap();
    /// tree.insert(7);
    ///
    /// assert_eq!(tree.search(&7), Ok(Some(&7)));
    /// assert_eq!(tree.search(&42), Ok(None));
    /// ```
    pub fn search(&self, key: &K) -> Result<Option<&K>>
    where
        K: Ord,
    {
        let root = self.root.node().ok_or(TreeError::EmptyTree)?;
        Ok(root.find(key))
    }

    /// Whether `key` is stored in the tree. Unlike [`Tree::search`], this is fine to call on an
    /// empty tree.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.root.node().and_then(|n| n.find(key)).is_some()
    }

    /// Inserts `key` into the tree and rebalances along the insertion path. Returns `false`, and
    /// leaves the tree untouched, if the key was already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg::avlg::Tree;
    ///
    /// let mut tree = Tree::new(1).unwrap();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.count(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let inserted = self.root.insert(key, self.max_imbalance);
        if inserted {
            self.count += 1;
        }

        inserted
    }

    /// Deletes `key` from the tree and returns it. Returns `Ok(None)` if the key wasn't stored.
    ///
    /// A node with two children is replaced by its in-order predecessor. Every node on the path
    /// back to the root is rebalanced, so a single delete may rotate more than once.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree has no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg::avlg::Tree;
    ///
    /// let mut tree = Tree::new(1).unwrap();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.delete(&2), Ok(None));
    /// assert_eq!(tree.delete(&1), Ok(Some(1)));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, key: &K) -> Result<Option<K>>
    where
        K: Ord,
    {
        if self.root.is_empty() {
            return Err(TreeError::EmptyTree);
        }

        let deleted = self.root.delete(key, self.max_imbalance);
        if deleted.is_some() {
            self.count -= 1;
        }

        Ok(deleted)
    }

    /// Drops every node in the tree.
    pub fn clear(&mut self) {
        debug!("clearing AVL-{} tree of {} keys", self.max_imbalance, self.count);
        self.root = Link(None);
        self.count = 0;
    }

    /// Whether the tree has no keys.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The number of keys in the tree.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The height of the tree. A single key has height 0 and an empty tree has height -1.
    pub fn height(&self) -> isize {
        self.root.height()
    }

    /// The key stored at the root.
    ///
    /// # Errors
    ///
    /// [`TreeError::EmptyTree`] if the tree has no keys.
    pub fn root(&self) -> Result<&K> {
        self.root
            .node()
            .map(|n| &n.key)
            .ok_or(TreeError::EmptyTree)
    }

    /// The `G` this tree was built with.
    pub fn max_imbalance(&self) -> usize {
        self.max_imbalance
    }

    /// Walks the whole tree checking that every node's left subtree holds smaller keys and its
    /// right subtree holds larger keys.
    pub fn is_bst(&self) -> bool
    where
        K: Ord,
    {
        self.root.node().map_or(true, |n| n.is_bst(None, None))
    }

    /// Recomputes every height from scratch (ignoring the cached heights) and checks that no two
    /// sibling subtrees differ in height by more than `G`.
    pub fn is_avlg_balanced(&self) -> bool {
        self.root.balanced_height(self.max_imbalance).is_some()
    }

    /// Iterates over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avlg::avlg::Tree;
    ///
    /// let mut tree = Tree::new(1).unwrap();
    /// tree.extend([3, 1, 2]);
    ///
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root, self.count)
    }

    /// Whether every cached height matches the height recomputed from the children.
    #[cfg(test)]
    fn heights_are_cached(&self) -> bool {
        self.root.cached_height().is_some()
    }
}

impl<K> Extend<K> for Tree<K>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the keys of a [`Tree`]. Created by [`Tree::iter`].
pub struct Iter<'a, K> {
    // The nodes whose key (and right subtree) are still to be visited. The top of the stack holds
    // the next key.
    stack: Vec<&'a Node<K>>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Link<K>, remaining: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining,
        };
        iter.push_left_spine(root.node());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.node();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.node());
        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

/// An owned, possibly empty, subtree. All rebalancing happens through a `Link` because a rotation
/// replaces the node the parent points at.
#[derive(Clone)]
struct Link<K>(Option<Box<Node<K>>>);

impl<K> Link<K> {
    fn node(&self) -> Option<&Node<K>> {
        self.0.as_deref()
    }

    fn node_mut(&mut self) -> Option<&mut Node<K>> {
        self.0.as_deref_mut()
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    fn height(&self) -> isize {
        self.node().map_or(EMPTY_HEIGHT, |n| n.height)
    }

    /// Inserts `key` below this link and rebalances on the way back up. Returns whether a new node
    /// was created.
    fn insert(&mut self, key: K, max_imbalance: usize) -> bool
    where
        K: Ord,
    {
        let inserted = match self.node_mut() {
            None => {
                self.0 = Some(Node::new_boxed(key));
                return true;
            }
            Some(node) => match key.cmp(&node.key) {
                Ordering::Less => node.left.insert(key, max_imbalance),
                Ordering::Equal => false,
                Ordering::Greater => node.right.insert(key, max_imbalance),
            },
        };

        // A duplicate changes nothing below us so there is nothing to rebalance.
        if inserted {
            self.rebalance(max_imbalance);
        }

        inserted
    }

    /// Deletes `key` from below this link and rebalances every node on the way back up.
    fn delete(&mut self, key: &K, max_imbalance: usize) -> Option<K>
    where
        K: Ord,
    {
        let node = self.node_mut()?;
        let deleted = match key.cmp(&node.key) {
            Ordering::Less => node.left.delete(key, max_imbalance),
            Ordering::Equal => {
                let node = self.0.take()?;
                let (replacement, removed) = node.remove(max_imbalance);
                *self = replacement;
                return Some(removed);
            }
            Ordering::Greater => node.right.delete(key, max_imbalance),
        };

        if deleted.is_some() {
            self.rebalance(max_imbalance);
        }

        deleted
    }

    /// Recomputes the height of the node under this link and, if its children differ in height by
    /// more than `max_imbalance`, rotates to fix it.
    ///
    /// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
    ///
    /// When the taller child's own children have equal heights we always pick the single rotation.
    /// After an insert this never happens. After a delete, a double rotation could leave the outer
    /// subtree of the inner grandchild `G + 1` shorter than its new sibling.
    fn rebalance(&mut self, max_imbalance: usize) {
        let Some(node) = self.node_mut() else {
            return;
        };
        node.fix_height();

        let balance_factor = node.balance_factor();
        if balance_factor.unsigned_abs() > max_imbalance {
            if balance_factor > 0 {
                let right_leans_left = node
                    .right
                    .node()
                    .map_or(false, |r| r.left.height() > r.right.height());
                trace!(
                    "balance factor {} exceeds G = {}: rotating {}",
                    balance_factor,
                    max_imbalance,
                    if right_leans_left { "right-left" } else { "left" }
                );
                if right_leans_left {
                    self.rotate_right_left();
                } else {
                    self.rotate_left();
                }
            } else {
                let left_leans_right = node
                    .left
                    .node()
                    .map_or(false, |l| l.right.height() > l.left.height());
                trace!(
                    "balance factor {} exceeds G = {}: rotating {}",
                    balance_factor,
                    max_imbalance,
                    if left_leans_right { "left-right" } else { "right" }
                );
                if left_leans_right {
                    self.rotate_left_right();
                } else {
                    self.rotate_right();
                }
            }
        }

        if cfg!(debug_assertions) {
            let Some(node) = self.node() else {
                return;
            };
            let left_height = node.left.height();
            let right_height = node.right.height();
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= max_imbalance);
        }
    }

    /// Rotate self to the right. This moves the left child up vertically and self down vertically.
    /// Used to rebalance the tree when the left child is too tall. Without a left child this does
    /// nothing.
    ///
    /// # Diagram
    ///
    /// ```text
    ///   old_root (i.e. "self")    new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self) {
        let Some(mut old_root) = self.0.take() else {
            return;
        };
        let Some(mut new_root) = old_root.left.0.take() else {
            self.0 = Some(old_root);
            return;
        };

        old_root.left = new_root.right.take();
        old_root.fix_height();

        new_root.right = Link(Some(old_root));
        new_root.fix_height();
        self.0 = Some(new_root);
    }

    /// The mirror image of [`Link::rotate_right`].
    fn rotate_left(&mut self) {
        let Some(mut old_root) = self.0.take() else {
            return;
        };
        let Some(mut new_root) = old_root.right.0.take() else {
            self.0 = Some(old_root);
            return;
        };

        old_root.right = new_root.left.take();
        old_root.fix_height();

        new_root.left = Link(Some(old_root));
        new_root.fix_height();
        self.0 = Some(new_root);
    }

    fn rotate_right_left(&mut self) {
        if let Some(node) = self.node_mut() {
            node.right.rotate_right();
        }
        self.rotate_left();
    }

    fn rotate_left_right(&mut self) {
        if let Some(node) = self.node_mut() {
            node.left.rotate_left();
        }
        self.rotate_right();
    }

    /// The height of this subtree computed from scratch, or `None` if any node in it breaks the
    /// AVL-G property.
    fn balanced_height(&self, max_imbalance: usize) -> Option<isize> {
        let Some(node) = self.node() else {
            return Some(EMPTY_HEIGHT);
        };
        let left_height = node.left.balanced_height(max_imbalance)?;
        let right_height = node.right.balanced_height(max_imbalance)?;

        (left_height.abs_diff(right_height) <= max_imbalance)
            .then(|| left_height.max(right_height) + 1)
    }

    /// The height of this subtree, or `None` if any cached height is stale.
    #[cfg(test)]
    fn cached_height(&self) -> Option<isize> {
        let Some(node) = self.node() else {
            return Some(EMPTY_HEIGHT);
        };
        let height = node.left.cached_height()?.max(node.right.cached_height()?) + 1;

        (height == node.height).then_some(height)
    }
}

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,

    /// How many edges are on the longest path from this node down to a leaf. A node with no
    /// children has a height of 0.
    height: isize,
}

impl<K> Clone for Node<K>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            left: self.left.clone(),
            right: self.right.clone(),
            height: self.height,
        }
    }
}

impl<K> fmt::Debug for Node<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("height", &self.height)
            .field("left", &self.left.node())
            .field("right", &self.right.node())
            .finish()
    }
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: Link(None),
            right: Link(None),
            height: 0,
        })
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = self.left.height().max(self.right.height()) + 1;
    }

    /// The difference in height between the right and left subtrees. Positive means right-heavy.
    fn balance_factor(&self) -> isize {
        self.right.height() - self.left.height()
    }

    fn find(&self, key: &K) -> Option<&K>
    where
        K: Ord,
    {
        match key.cmp(&self.key) {
            Ordering::Less => self.left.node().and_then(|n| n.find(key)),
            Ordering::Equal => Some(&self.key),
            Ordering::Greater => self.right.node().and_then(|n| n.find(key)),
        }
    }

    fn is_bst(&self, lower: Option<&K>, upper: Option<&K>) -> bool
    where
        K: Ord,
    {
        lower.map_or(true, |lower| *lower < self.key)
            && upper.map_or(true, |upper| self.key < *upper)
            && self
                .left
                .node()
                .map_or(true, |n| n.is_bst(lower, Some(&self.key)))
            && self
                .right
                .node()
                .map_or(true, |n| n.is_bst(Some(&self.key), upper))
    }

    /// Unlinks this node from its subtree. Returns the subtree that should take its place and the
    /// removed key.
    fn remove(mut self: Box<Self>, max_imbalance: usize) -> (Link<K>, K) {
        match (self.left.0.take(), self.right.0.take()) {
            (None, None) => (Link(None), self.key),
            (Some(child), None) | (None, Some(child)) => (Link(Some(child)), self.key),

            // With two children we promote this node's predecessor. That is, the largest node in
            // this node's left subtree.
            (Some(left), Some(right)) => {
                let (new_left, predecessor) = left.delete_largest(max_imbalance);
                let key = std::mem::replace(&mut self.key, predecessor);
                self.left = new_left;
                self.right = Link(Some(right));

                let mut replacement = Link(Some(self));
                replacement.rebalance(max_imbalance);
                (replacement, key)
            }
        }
    }

    /// Deletes the largest node in this subtree by recursing to the right until there is no right
    /// child. Returns what's left of the subtree and the deleted key.
    fn delete_largest(mut self: Box<Self>, max_imbalance: usize) -> (Link<K>, K) {
        match self.right.0.take() {
            None => {
                let rest = self.left.take();
                (rest, self.key)
            }
            Some(right) => {
                let (new_right, largest) = right.delete_largest(max_imbalance);
                self.right = new_right;

                let mut rest = Link(Some(self));
                rest.rebalance(max_imbalance);
                (rest, largest)
            }
        }
    }
}
