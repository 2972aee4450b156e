#[macro_use]
extern crate quickcheck_macros;

use quickcheck::{Arbitrary, Gen};

mod avlg;

/// An enum for the various kinds of "things" to do to
/// a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K> {
    /// Insert the K into the tree
    Insert(K),
    /// Remove the K from the tree
    Remove(K),
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Op::Insert(K::arbitrary(g))
        } else {
            Op::Remove(K::arbitrary(g))
        }
    }
}

/// A `G` between 1 and 10.
#[derive(Copy, Clone, Debug)]
pub(crate) struct MaxImbalance(isize);

impl MaxImbalance {
    pub(crate) fn get(self) -> isize {
        self.0
    }
}

impl Arbitrary for MaxImbalance {
    fn arbitrary(g: &mut Gen) -> Self {
        MaxImbalance(1 + isize::from(u8::arbitrary(g) % 10))
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((1..self.0).rev().map(MaxImbalance))
    }
}
