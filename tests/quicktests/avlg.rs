use avlg::avlg::Tree;
use avlg::error::TreeError;

use std::collections::{BTreeSet, HashSet};

use crate::{MaxImbalance, Op};

fn new_tree(g: MaxImbalance) -> Tree<i8> {
    Tree::new(g.get()).unwrap()
}

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both, and that the
/// tree was a valid AVL-G tree after every single operation.
fn do_ops<K>(ops: &[Op<K>], bst: &mut Tree<K>, set: &mut BTreeSet<K>) -> bool
where
    K: Ord + Clone,
{
    ops.iter().all(|op| {
        let agrees = match op {
            Op::Insert(k) => bst.insert(k.clone()) == set.insert(k.clone()),
            Op::Remove(k) if set.is_empty() => bst.delete(k) == Err(TreeError::EmptyTree),
            Op::Remove(k) => bst.delete(k).ok() == Some(set.take(k)),
        };

        agrees && bst.count() == set.len() && bst.is_bst() && bst.is_avlg_balanced()
    })
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set) && tree.iter().eq(set.iter())
}

#[quickcheck]
fn contains(xs: Vec<i8>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    for x in &xs {
        tree.insert(*x);
    }

    xs.iter().all(|x| tree.search(x) == Ok(Some(x)))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    tree.extend(xs.iter().copied());
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.contains(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    tree.extend(xs.iter().copied());
    for delete in &deletes {
        let _ = tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| !tree.contains(x))
        && still_present.iter().all(|x| tree.contains(x))
        && tree.is_avlg_balanced()
}

#[quickcheck]
fn insert_then_delete_round_trips(xs: Vec<i8>, x: i8, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    tree.extend(xs.into_iter().filter(|k| *k != x));
    let count = tree.count();

    tree.insert(x);
    let deleted = tree.delete(&x);

    deleted == Ok(Some(x)) && tree.count() == count && tree.is_bst() && tree.is_avlg_balanced()
}

#[quickcheck]
fn deleting_everything_empties_the_tree(xs: Vec<i8>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    tree.extend(xs.iter().copied());

    // Delete in reverse insertion order so the order differs from the sorted one.
    for x in xs.iter().rev() {
        let _ = tree.delete(x);
    }

    tree.is_empty() && tree.count() == 0 && tree.height() == -1 && tree.root().is_err()
}

#[quickcheck]
fn duplicate_insert_is_idempotent(xs: Vec<i8>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    tree.extend(xs.iter().copied());
    let before: Vec<i8> = tree.iter().copied().collect();
    let (count, height, root) = (tree.count(), tree.height(), tree.root().ok().copied());

    xs.iter().all(|x| !tree.insert(*x))
        && tree.count() == count
        && tree.height() == height
        && tree.root().ok().copied() == root
        && tree.iter().copied().eq(before)
}

#[quickcheck]
fn emptiness_matches_count_and_height(xs: Vec<i8>, g: MaxImbalance) -> bool {
    let mut tree = new_tree(g);
    tree.extend(xs.iter().copied());

    tree.is_empty() == (tree.count() == 0) && tree.is_empty() == (tree.height() == -1)
}
