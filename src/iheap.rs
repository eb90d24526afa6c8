use std::cmp::Ordering;

use crate::{dary::{children, parent}, Error, HeapOptions, Invalid, Result};

/// A d-ary min heap over the integer indices `0..capacity`, each carrying a key.
/// Each index is present at most once, and its key can be looked up, lowered, raised or removed through the index.
/// - Contains / min index / min key / key of: O(1)
/// - Insert / decrease key: O(log_d(n))
/// - Delete min / increase key / delete: O(d log_d(n))
/// The order comes from a comparison function fixed at construction, so a reversed comparison function
/// turns this into an indexed max heap.  Indices whose keys compare equal come out in unspecified order.
#[derive(Clone)]
pub struct IndexedMinHeap<K, C = fn(&K, &K) -> Ordering> {
    /// (index, key) pairs in heap order
    heap: Vec<(usize, K)>,
    /// For each index, the slot in `heap` holding it, if present
    position: Vec<Option<usize>>,
    arity: usize,
    cmp: C
}

impl<K: Ord> IndexedMinHeap<K> {
    /// Create an empty binary heap for indices below capacity, ordered by the natural order of K
    pub fn new(capacity: usize) -> Self {
        Self::with_cmp(capacity, Ord::cmp)
    }
}

impl<K, C: Fn(&K, &K) -> Ordering> IndexedMinHeap<K, C> {
    /// Create an empty binary heap for indices below capacity, ordered by cmp
    pub fn with_cmp(capacity: usize, cmp: C) -> Self {
        Self{heap: Vec::new(), position: vec![None; capacity], arity: 2, cmp}
    }

    /// Create an empty heap with the given shape for indices below capacity, ordered by cmp.
    /// Fails if the arity is less than 2.
    pub fn with_options(capacity: usize, options: HeapOptions, cmp: C) -> Result<Self> {
        options.check()?;
        Ok(Self{heap: Vec::new(), position: vec![None; capacity], arity: options.arity, cmp})
    }

    /// One more than the largest index the heap accepts
    pub fn capacity(&self) -> usize {
        self.position.len()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of indices currently present
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// True if index i is present.  Indices outside the capacity are never present.
    pub fn contains(&self, i: usize) -> bool {
        self.position.get(i).is_some_and(Option::is_some)
    }

    /// Add index i with the given key.
    /// Fails if i is out of range or already present.
    pub fn insert(&mut self, i: usize, key: K) -> Result<()> {
        self.check_index(i)?;
        if self.contains(i) {
            Err(Invalid::DuplicateIndex(i))?
        }
        let s = self.heap.len();
        self.heap.push((i, key));
        self.position[i] = Some(s);
        self.sift_up(s);
        #[cfg(test)]{ self.debug_check() }
        Ok(())
    }

    /// The index with the smallest key
    pub fn min_index(&self) -> Result<usize> {
        self.heap.first().map(|&(i, _)|i).ok_or(Error::EmptyQueue)
    }

    /// The smallest key
    pub fn min_key(&self) -> Result<&K> {
        self.heap.first().map(|(_, k)|k).ok_or(Error::EmptyQueue)
    }

    /// Remove the index with the smallest key and return it
    pub fn delete_min(&mut self) -> Result<usize> {
        self.pop_min().map(|(i, _)|i).ok_or(Error::EmptyQueue)
    }

    /// The key currently associated with index i.
    /// Fails with `Error::NotFound` if i is in range but not present.
    pub fn key_of(&self, i: usize) -> Result<&K> {
        self.check_index(i)?;
        match self.position[i] {
            Some(s) => Ok(&self.heap[s].1),
            None => Err(Error::NotFound(i))
        }
    }

    /// Replace the key of a present index with a strictly smaller one.
    /// Callers choose between this and `insert` themselves by checking `contains` first.
    pub fn decrease_key(&mut self, i: usize, key: K) -> Result<()> {
        let s = self.slot_of(i)?;
        if (self.cmp)(&key, &self.heap[s].1) != Ordering::Less {
            Err(Invalid::NotDecreasing(i))?
        }
        self.heap[s].1 = key;
        self.sift_up(s);
        #[cfg(test)]{ self.debug_check() }
        Ok(())
    }

    /// Replace the key of a present index with a strictly larger one
    pub fn increase_key(&mut self, i: usize, key: K) -> Result<()> {
        let s = self.slot_of(i)?;
        if (self.cmp)(&key, &self.heap[s].1) != Ordering::Greater {
            Err(Invalid::NotIncreasing(i))?
        }
        self.heap[s].1 = key;
        self.sift_down(s);
        #[cfg(test)]{ self.debug_check() }
        Ok(())
    }

    /// Replace the key of a present index with any key, returning the old one
    pub fn change_key(&mut self, i: usize, key: K) -> Result<K> {
        let s = self.slot_of(i)?;
        let old = std::mem::replace(&mut self.heap[s].1, key);
        let s = self.sift_up(s);
        self.sift_down(s);
        #[cfg(test)]{ self.debug_check() }
        Ok(old)
    }

    /// Remove a present index wherever it is in the heap, returning its key.
    /// Fails with `Error::NotFound` if i is in range but not present.
    pub fn delete(&mut self, i: usize) -> Result<K> {
        self.check_index(i)?;
        let Some(s) = self.position[i] else {
            return Err(Error::NotFound(i))
        };
        let (_, key) = self.remove_slot(s);
        #[cfg(test)]{ self.debug_check() }
        Ok(key)
    }

    /// Remove every index
    pub fn clear(&mut self) {
        for (i, _) in self.heap.drain(..) {
            self.position[i] = None;
        }
    }

    /// Check heap order along every parent/child pair and that the slot and position tables agree
    pub fn verify(&self) -> Result<()> {
        for (s, &(i, _)) in self.heap.iter().enumerate() {
            if self.position.get(i).copied().flatten() != Some(s) {
                return Err(Error::InvariantViolated(format!("index {} in slot {} is recorded at {:?}", i, s, self.position.get(i))))
            }
            if s > 0 {
                let p = parent(s, self.arity);
                if (self.cmp)(&self.heap[p].1, &self.heap[s].1) == Ordering::Greater {
                    return Err(Error::InvariantViolated(format!("index {} orders after its child {}", self.heap[p].0, i)))
                }
            }
        }
        let present = self.position.iter().filter(|p|p.is_some()).count();
        if present != self.heap.len() {
            return Err(Error::InvariantViolated(format!("{} indices marked present but {} slots in use", present, self.heap.len())))
        }
        Ok(())
    }

    /// Indices in ascending key order, without disturbing this heap.
    /// Copies the heap and drains the copy, so it costs O(n log(n)) to run to the end,
    /// and every call starts over from the current contents.
    pub fn iter(&self) -> SortedIndices<K, C> where K: Clone, C: Clone {
        SortedIndices{heap: self.clone()}
    }

    fn pop_min(&mut self) -> Option<(usize, K)> {
        if self.heap.is_empty() {
            return None
        }
        let res = self.remove_slot(0);
        #[cfg(test)]{ self.debug_check() }
        Some(res)
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.capacity() {
            Err(Invalid::IndexOutOfRange{index: i, capacity: self.capacity()})?
        }
        Ok(())
    }

    fn slot_of(&self, i: usize) -> Result<usize> {
        self.check_index(i)?;
        Ok(self.position[i].ok_or(Invalid::AbsentIndex(i))?)
    }

    fn remove_slot(&mut self, s: usize) -> (usize, K) {
        let res = self.heap.swap_remove(s);
        self.position[res.0] = None;
        if s < self.heap.len() {
            self.position[self.heap[s].0] = Some(s);
            let s = self.sift_up(s);
            self.sift_down(s);
        }
        res
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.cmp)(&self.heap[a].1, &self.heap[b].1) == Ordering::Less
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position[self.heap[a].0] = Some(a);
        self.position[self.heap[b].0] = Some(b);
    }

    /// Returns the slot the entry ended up in
    fn sift_up(&mut self, mut s: usize) -> usize {
        while s > 0 {
            let p = parent(s, self.arity);
            if !self.less(s, p) {
                break
            }
            self.swap(s, p);
            s = p;
        }
        s
    }

    fn sift_down(&mut self, mut s: usize) {
        loop {
            let Some(m) = children(s, self.arity, self.heap.len())
                .reduce(|a, b|if self.less(b, a) { b } else { a }) else { break };
            if !self.less(m, s) {
                break
            }
            self.swap(m, s);
            s = m;
        }
    }

    #[cfg(test)]
    fn debug_check(&self) {
        #[cfg(not(feature = "stress_tests"))]{
            assert_eq!(self.verify(), Ok(()))
        }
    }
}

/// Iterator over the indices of a snapshot of an `IndexedMinHeap`, in ascending key order
pub struct SortedIndices<K, C> {
    heap: IndexedMinHeap<K, C>
}

impl<K, C: Fn(&K, &K) -> Ordering> Iterator for SortedIndices<K, C> {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        self.heap.pop_min().map(|(i, _)|i)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<K, C: Fn(&K, &K) -> Ordering> ExactSizeIterator for SortedIndices<K, C> {}

impl<'a, K: Clone, C: Fn(&K, &K) -> Ordering + Clone> IntoIterator for &'a IndexedMinHeap<K, C> {
    type Item = usize;
    type IntoIter = SortedIndices<K, C>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Consuming iterator over (index, key) pairs in ascending key order
pub struct IntoSorted<K, C> {
    heap: IndexedMinHeap<K, C>
}

impl<K, C: Fn(&K, &K) -> Ordering> Iterator for IntoSorted<K, C> {
    type Item = (usize, K);
    fn next(&mut self) -> Option<Self::Item> {
        self.heap.pop_min()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<K, C: Fn(&K, &K) -> Ordering> ExactSizeIterator for IntoSorted<K, C> {}

impl<K, C: Fn(&K, &K) -> Ordering> IntoIterator for IndexedMinHeap<K, C> {
    type Item = (usize, K);
    type IntoIter = IntoSorted<K, C>;
    fn into_iter(self) -> Self::IntoIter {
        IntoSorted{heap: self}
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;
    use crate::cmp_weight;

    #[cfg(not(feature = "stress_tests"))]
    const TRIALS: usize = 20;
    #[cfg(feature = "stress_tests")]
    const TRIALS: usize = 1000;
    const OPS: usize = 400;
    const CAPACITY: usize = 64;

    #[test]
    fn contract_failures_leave_heap_unchanged() {
        let mut pq = IndexedMinHeap::new(4);
        assert_eq!(pq.min_index(), Err(Error::EmptyQueue));
        assert_eq!(pq.min_key(), Err(Error::EmptyQueue));
        assert_eq!(pq.delete_min(), Err(Error::EmptyQueue));
        assert_eq!(pq.insert(4, 10), Err(Error::InvalidArgument(Invalid::IndexOutOfRange{index: 4, capacity: 4})));
        pq.insert(2, 10).unwrap();
        pq.insert(0, 20).unwrap();
        assert_eq!(pq.insert(2, 5), Err(Error::InvalidArgument(Invalid::DuplicateIndex(2))));
        assert_eq!(pq.decrease_key(2, 10), Err(Error::InvalidArgument(Invalid::NotDecreasing(2))));
        assert_eq!(pq.decrease_key(2, 11), Err(Error::InvalidArgument(Invalid::NotDecreasing(2))));
        assert_eq!(pq.increase_key(0, 20), Err(Error::InvalidArgument(Invalid::NotIncreasing(0))));
        assert_eq!(pq.decrease_key(1, 0), Err(Error::InvalidArgument(Invalid::AbsentIndex(1))));
        assert_eq!(pq.increase_key(3, 0), Err(Error::InvalidArgument(Invalid::AbsentIndex(3))));
        assert_eq!(pq.key_of(1), Err(Error::NotFound(1)));
        assert_eq!(pq.delete(3), Err(Error::NotFound(3)));
        assert_eq!(pq.key_of(9), Err(Error::InvalidArgument(Invalid::IndexOutOfRange{index: 9, capacity: 4})));
        assert!(!pq.contains(9));
        assert_eq!(pq.len(), 2);
        assert_eq!(pq.key_of(2), Ok(&10));
        assert_eq!(pq.key_of(0), Ok(&20));
        assert_eq!(pq.min_index(), Ok(2));
    }

    #[test]
    fn membership_follows_insert_and_delete() {
        let mut pq = IndexedMinHeap::new(8);
        for (i, k) in [(3, 'd'), (5, 'a'), (1, 'c'), (7, 'b')] {
            pq.insert(i, k).unwrap();
            assert!(pq.contains(i));
        }
        assert_eq!(pq.delete_min(), Ok(5));
        assert!(!pq.contains(5));
        assert_eq!(pq.delete(1), Ok('c'));
        assert!(!pq.contains(1));
        pq.decrease_key(3, 'a').unwrap();
        assert_eq!(pq.min_index(), Ok(3));
        pq.increase_key(3, 'z').unwrap();
        assert_eq!(pq.min_index(), Ok(7));
        assert_eq!(pq.change_key(3, '0'), Ok('z'));
        assert_eq!(pq.min_key(), Ok(&'0'));
        pq.clear();
        assert!(pq.is_empty());
        assert!(!pq.contains(3));
        pq.insert(3, 'q').unwrap();
        assert_eq!(pq.delete_min(), Ok(3));
    }

    #[test]
    fn sorted_extraction() {
        let mut rng = StdRng::seed_from_u64(17);
        for trial in 0..TRIALS {
            let arity = 2 + trial%4;
            let mut pq = IndexedMinHeap::with_options(CAPACITY, HeapOptions{arity}, |a: &u32, b: &u32|a.cmp(b)).unwrap();
            let n = rng.gen_range(0..=CAPACITY);
            for i in 0..n {
                pq.insert(i, rng.gen_range(0..20)).unwrap();
            }
            let mut last = 0;
            for _ in 0..n {
                let k = *pq.min_key().unwrap();
                let i = pq.delete_min().unwrap();
                assert!(i < n);
                assert!(k >= last);
                last = k;
            }
            assert_eq!(pq.delete_min(), Err(Error::EmptyQueue));
        }
    }

    #[test]
    fn random_ops_match_naive() {
        let mut rng = StdRng::seed_from_u64(0xd1a);
        for trial in 0..TRIALS {
            let arity = 2 + trial%5;
            let mut pq = IndexedMinHeap::with_options(CAPACITY, HeapOptions{arity}, |a: &i32, b: &i32|a.cmp(b)).unwrap();
            let mut naive: Vec<Option<i32>> = vec![None; CAPACITY];
            for _ in 0..OPS {
                let i = rng.gen_range(0..CAPACITY);
                let k = rng.gen_range(-100..100);
                match (rng.gen_range(0..6), naive[i]) {
                    (0 | 1, None) => {
                        pq.insert(i, k).unwrap();
                        naive[i] = Some(k);
                    },
                    (0 | 1, Some(_)) => assert!(pq.insert(i, k).is_err()),
                    (2, Some(old)) => {
                        assert_eq!(pq.decrease_key(i, k).is_ok(), k < old);
                        naive[i] = Some(k.min(old));
                    },
                    (3, Some(old)) => {
                        assert_eq!(pq.increase_key(i, k).is_ok(), k > old);
                        naive[i] = Some(k.max(old));
                    },
                    (4, Some(old)) => {
                        assert_eq!(pq.delete(i), Ok(old));
                        naive[i] = None;
                    },
                    (5, _) => match naive.iter().flatten().min() {
                        Some(&m) => {
                            let j = pq.delete_min().unwrap();
                            assert_eq!(naive[j], Some(m));
                            naive[j] = None;
                        },
                        None => assert_eq!(pq.delete_min(), Err(Error::EmptyQueue))
                    },
                    (_, None) => assert!(!pq.contains(i)),
                    _ => unreachable!()
                }
                assert_eq!(pq.len(), naive.iter().flatten().count());
                assert_eq!(pq.min_key().ok(), naive.iter().flatten().min());
                for (j, k) in naive.iter().enumerate() {
                    assert_eq!(pq.contains(j), k.is_some());
                }
            }
        }
    }

    #[test]
    fn iteration_is_restartable_and_non_destructive() {
        let mut pq = IndexedMinHeap::with_cmp(6, cmp_weight::<f64>);
        for (i, k) in [(0, 2.5), (1, -1.0), (2, 7.0), (3, 0.0), (5, 2.25)] {
            pq.insert(i, k).unwrap();
        }
        let first: Vec<usize> = pq.iter().collect();
        assert_eq!(first, vec![1, 3, 5, 0, 2]);
        assert_eq!(pq.iter().len(), 5);
        assert_eq!((&pq).into_iter().collect::<Vec<_>>(), first);
        assert_eq!(pq.len(), 5);
        assert_eq!(pq.min_index(), Ok(1));
        let drained: Vec<(usize, f64)> = pq.into_iter().collect();
        assert_eq!(drained, vec![(1, -1.0), (3, 0.0), (5, 2.25), (0, 2.5), (2, 7.0)]);
    }

    #[test]
    fn reversed_cmp_is_max_heap() {
        let mut pq = IndexedMinHeap::with_cmp(5, |a: &i32, b: &i32|b.cmp(a));
        for (i, k) in [(0, 3), (1, 9), (2, -4), (3, 6)] {
            pq.insert(i, k).unwrap();
        }
        assert_eq!(pq.min_index(), Ok(1));
        // "decrease" is relative to the comparator, so a larger key moves toward the top
        pq.decrease_key(2, 10).unwrap();
        assert_eq!(pq.delete_min(), Ok(2));
        assert_eq!(pq.iter().collect::<Vec<_>>(), vec![1, 3, 0]);
    }

    #[test]
    fn rejects_unary() {
        assert!(matches!(IndexedMinHeap::with_options(3, HeapOptions{arity: 0}, |a: &u8, b: &u8|a.cmp(b)),
            Err(Error::InvalidArgument(Invalid::Arity(0)))));
    }
}
