//! This crate exposes an AVL-G tree, a Binary Search Tree whose balance tolerance is a parameter
//! instead of being fixed at 1, along with a small min-heap priority queue.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! will sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a key takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`).
//!
//! ## AVL-G
//!
//! An AVL tree keeps its height at `O(lg N)` by making sure the two subtrees of every `Node`
//! differ in height by at most 1, rotating nodes after an insert or delete whenever that breaks.
//! An AVL-G tree relaxes the 1 to any `G >= 1` chosen when the tree is built. The height is still
//! `O(lg N)`, just with a constant that grows with `G`.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avlg;
pub mod error;
pub mod priority_queue;
