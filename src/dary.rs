use std::{cmp::Ordering, ops::Range};

use crate::{Error, HeapOptions, Result};

// Slot arithmetic for a 0-based d-ary heap, shared with the indexed heap.

#[inline]
pub(crate) fn parent(i: usize, arity: usize) -> usize {
    (i - 1)/arity
}

#[inline]
pub(crate) fn children(i: usize, arity: usize, len: usize) -> Range<usize> {
    let first = arity*i + 1;
    first.min(len)..(first + arity).min(len)
}

/// A growable implicit d-ary heap whose top is the minimum according to a comparison function fixed at construction.
/// - Peek: O(1)
/// - Push: O(log_d(n))
/// - Pop: O(d log_d(n))
/// Passing a reversed comparison function gives a max heap.
/// Elements that compare equal are fine, but the order they come out in is unspecified.
#[derive(Clone)]
pub struct DaryHeap<T, C = fn(&T, &T) -> Ordering> {
    buf: Vec<T>,
    arity: usize,
    cmp: C
}

impl<T: Ord> DaryHeap<T> {
    /// Create an empty binary min heap using the natural order of T
    pub fn new() -> Self {
        Self{buf: Vec::new(), arity: 2, cmp: Ord::cmp}
    }
}

impl<T: Ord> Default for DaryHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Fn(&T, &T) -> Ordering> DaryHeap<T, C> {
    /// Create an empty binary heap ordered by cmp
    pub fn with_cmp(cmp: C) -> Self {
        Self{buf: Vec::new(), arity: 2, cmp}
    }

    /// Create an empty heap with the given shape ordered by cmp.
    /// Fails if the arity is less than 2.
    pub fn with_options(options: HeapOptions, cmp: C) -> Result<Self> {
        options.check()?;
        Ok(Self{buf: Vec::new(), arity: options.arity, cmp})
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Get the minimum element without removing it
    pub fn peek(&self) -> Option<&T> {
        self.buf.first()
    }

    pub fn push(&mut self, e: T) {
        self.buf.push(e);
        self.sift_up(self.buf.len() - 1);
        #[cfg(test)]{ self.debug_check() }
    }

    /// Remove and return the minimum element
    pub fn pop(&mut self) -> Option<T> {
        let l = self.buf.len();
        if l == 0 {
            return None
        }
        self.buf.swap(0, l - 1);
        let res = self.buf.pop();
        self.sift_down(0);
        #[cfg(test)]{ self.debug_check() }
        res
    }

    /// Drain the heap into a vector in ascending order
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut res = Vec::with_capacity(self.buf.len());
        while let Some(e) = self.pop() {
            res.push(e)
        }
        res
    }

    /// Check that no element compares greater than any of its children
    pub fn verify(&self) -> Result<()> {
        for i in 1..self.buf.len() {
            let p = parent(i, self.arity);
            if (self.cmp)(&self.buf[p], &self.buf[i]) == Ordering::Greater {
                return Err(Error::InvariantViolated(format!("slot {} orders after its child slot {}", p, i)))
            }
        }
        Ok(())
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = parent(i, self.arity);
            if (self.cmp)(&self.buf[i], &self.buf[p]) != Ordering::Less {
                break
            }
            self.buf.swap(i, p);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let Some(m) = children(i, self.arity, self.buf.len())
                .min_by(|&a, &b|(self.cmp)(&self.buf[a], &self.buf[b])) else { break };
            if (self.cmp)(&self.buf[m], &self.buf[i]) != Ordering::Less {
                break
            }
            self.buf.swap(m, i);
            i = m;
        }
    }

    #[cfg(test)]
    fn debug_check(&self) {
        #[cfg(not(feature = "stress_tests"))]{
            assert_eq!(self.verify(), Ok(()))
        }
    }
}

impl<T, C: Fn(&T, &T) -> Ordering> Extend<T> for DaryHeap<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for e in iter {
            self.push(e)
        }
    }
}

/// Iterates in arbitrary (heap) order
impl<'a, T, C> IntoIterator for &'a DaryHeap<T, C> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
