//! Append-only hash-consing table.
//!
//! Values live in an arena addressed by stable `usize` indices, and a
//! bucket array chains together values that share a hash. [`Table::put`]
//! returns the index of an existing equal value when there is one, so
//! structurally equal values are stored exactly once.
//!
//! Index 0 is a sentry and never holds a value; a bucket head of 0 means
//! "empty bucket", and a `next` link of 0 means "end of chain".

use std::ops::Index;

use crate::utils::MyHash;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

#[derive(Debug, Clone)]
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let buckets_size = 1usize << bits;
        let bitmask = (buckets_size - 1) as u64;

        Self {
            data: vec![Entry {
                value: T::default(),
                next: 0,
            }],
            buckets: vec![0; buckets_size],
            bitmask,
        }
    }
}

impl<T> Table<T> {
    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buckets.
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    /// Check whether the index refers to a stored value.
    pub fn contains_index(&self, index: usize) -> bool {
        index != 0 && index < self.data.len()
    }

    /// Get the index of the next value in the same bucket chain.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }

    /// Iterate over `(index, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.data.iter().enumerate().skip(1).map(|(i, e)| (i, &e.value))
    }

    fn push(&mut self, value: T) -> usize {
        let index = self.data.len();
        self.data.push(Entry { value, next: 0 });
        index
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Find the index of a value equal to `value`, if it is stored.
    pub fn find(&self, value: &T) -> Option<usize> {
        let mut index = self.buckets[self.bucket_index(value)];
        while index != 0 {
            if self.value(index) == value {
                return Some(index);
            }
            index = self.next(index);
        }
        None
    }

    /// Put a value into the table and return its index.
    ///
    /// If an equal value is already stored, its index is returned and
    /// `value` is dropped. The flag tells whether a new value was added.
    pub fn put(&mut self, value: T) -> (usize, bool) {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            let i = self.push(value);
            self.buckets[bucket_index] = i;
            return (i, true);
        }

        loop {
            if &value == self.value(index) {
                return (index, false);
            }

            let next = self.next(index);
            if next == 0 {
                let i = self.push(value);
                self.data[index].next = i;
                return (i, true);
            }
            index = next;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_put_dedup() {
        let mut table = Table::new(2);
        let (a, new_a) = table.put(Item(5));
        let (b, new_b) = table.put(Item(5));
        assert!(new_a);
        assert!(!new_b);
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_put_chain() {
        let mut table = Table::new(2);
        let (index1, _) = table.put(Item(5));
        let (index2, _) = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(table[index1], Item(5));
        assert_eq!(table[index2], Item(-5));
        assert_eq!(table.next(index1), index2);
    }

    #[test]
    fn test_grows_past_bucket_count() {
        let mut table = Table::new(1);
        for i in 0..100 {
            table.put(Item(i));
        }
        assert_eq!(table.len(), 100);
        assert_eq!(table.num_buckets(), 2);
        for i in 0..100 {
            assert!(table.find(&Item(i)).is_some());
        }
        assert_eq!(table.find(&Item(100)), None);
    }

    #[test]
    fn test_iter_insertion_order() {
        let mut table = Table::new(3);
        table.put(Item(3));
        table.put(Item(1));
        table.put(Item(3));
        let items: Vec<_> = table.iter().map(|(_, v)| v.0).collect();
        assert_eq!(items, vec![3, 1]);
    }

    #[test]
    #[should_panic(expected = "Index is 0")]
    fn test_sentry_is_not_a_value() {
        let table = Table::<Item>::new(2);
        table.value(0);
    }
}
