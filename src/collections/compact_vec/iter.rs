//  Owning iteration.

use core::{fmt, iter::FusedIterator, slice};

use crate::utils::{
    alloc::{Allocator, Global},
    lifecycle,
};

use super::CompactVec;

/// An iterator which moves the elements out of a `CompactVec`.
///
/// The elements not yet yielded are dropped along with the iterator.
pub struct IntoIter<T, const N: usize, A = Global>
where
    A: Allocator,
{
    //  Invariants:
    //  -   `vec.len()` is 0, so that it only releases its storage on drop.
    //  -   [start, end) are the initialized slots of the storage of `vec`.
    vec: CompactVec<T, N, A>,
    start: usize,
    end: usize,
}

impl<T, const N: usize, A> IntoIter<T, N, A>
where
    A: Allocator,
{
    /// Returns the remaining elements, as a slice.
    pub fn as_slice(&self) -> &[T] {
        //  Safety:
        //  -   [start, end) is initialized, as per invariants.
        unsafe { slice::from_raw_parts(self.vec.as_ptr().add(self.start), self.end - self.start) }
    }

    /// Returns the remaining elements, as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        //  Safety:
        //  -   [start, end) is initialized, as per invariants.
        unsafe { slice::from_raw_parts_mut(self.vec.as_mut_ptr().add(self.start), self.end - self.start) }
    }
}

impl<T, const N: usize, A> IntoIterator for CompactVec<T, N, A>
where
    A: Allocator,
{
    type Item = T;
    type IntoIter = IntoIter<T, N, A>;

    fn into_iter(mut self) -> Self::IntoIter {
        let end = self.len();

        //  Safety:
        //  -   Bounded & Initialized: shrinking; ownership of the elements is transferred to the iterator.
        unsafe { self.set_len(0) };

        IntoIter {
            vec: self,
            start: 0,
            end,
        }
    }
}

impl<T, const N: usize, A> Iterator for IntoIter<T, N, A>
where
    A: Allocator,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        let index = self.start;

        self.start += 1;

        //  Safety:
        //  -   The mode is that of the live arm.
        //  -   `index` was initialized, and is now excluded from [start, end).
        Some(unsafe { self.vec.storage.read_at(self.vec.mode(), index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;

        (len, Some(len))
    }
}

impl<T, const N: usize, A> DoubleEndedIterator for IntoIter<T, N, A>
where
    A: Allocator,
{
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }

        self.end -= 1;

        //  Safety:
        //  -   The mode is that of the live arm.
        //  -   `end` was initialized, and is now excluded from [start, end).
        Some(unsafe { self.vec.storage.read_at(self.vec.mode(), self.end) })
    }
}

impl<T, const N: usize, A> ExactSizeIterator for IntoIter<T, N, A> where A: Allocator {}

impl<T, const N: usize, A> FusedIterator for IntoIter<T, N, A> where A: Allocator {}

impl<T, const N: usize, A> Drop for IntoIter<T, N, A>
where
    A: Allocator,
{
    fn drop(&mut self) {
        let remaining = self.end - self.start;

        //  Leak rather than double-drop, should a drop panic.
        self.end = self.start;

        //  Safety:
        //  -   The remaining elements are initialized, and no longer accessible.
        unsafe { lifecycle::destroy_range(self.vec.as_mut_ptr().add(self.start), remaining) };
    }
}

impl<T, const N: usize, A> fmt::Debug for IntoIter<T, N, A>
where
    T: fmt::Debug,
    A: Allocator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{
        string::{String, ToString},
        vec::Vec,
    };

    use crate::utils::testing::{CountingAllocator, DropCounter};

    use super::*;

    #[test]
    fn forward_backward() {
        for n in [0, 3, 4, 10] {
            let vec: CompactVec<String, 4> = (0..n).map(|i| i.to_string()).collect();

            let mut iter = vec.into_iter();

            assert_eq!(n, iter.len());

            let mut front = Vec::new();
            let mut back = Vec::new();

            while let Some(first) = iter.next() {
                front.push(first);

                if let Some(last) = iter.next_back() {
                    back.push(last);
                }
            }

            back.reverse();
            front.extend(back);

            let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();

            assert_eq!(expected, front);
            assert_eq!(None, iter.next());
            assert_eq!(None, iter.next_back());
        }
    }

    #[test]
    fn as_slice() {
        let vec = CompactVec::<u32, 2>::from_slice(&[1, 2, 3, 4]);

        let mut iter = vec.into_iter();

        assert_eq!(Some(1), iter.next());
        assert_eq!(Some(4), iter.next_back());
        assert_eq!(&[2, 3], iter.as_slice());

        iter.as_mut_slice()[0] = 20;

        assert_eq!(Some(20), iter.next());
        assert_eq!("IntoIter([3])", std::format!("{iter:?}"));
    }

    #[test]
    fn partial_consumption_drops_rest() {
        let counter = DropCounter::new();
        let allocator = CountingAllocator::default();

        let mut vec = CompactVec::<_, 2, _>::new_in(&allocator);

        for i in 0..6 {
            vec.push(counter.track(i));
        }

        let mut iter = vec.into_iter();

        let first = iter.next().expect("non-empty");

        assert_eq!(0, *first.value());
        assert_eq!(0, counter.dropped());

        drop(iter);

        assert_eq!(5, counter.dropped());
        assert_eq!(0, allocator.live());

        drop(first);

        assert_eq!(6, counter.dropped());
    }

    #[test]
    fn inline_consumption() {
        let counter = DropCounter::new();

        let vec: CompactVec<_, 4> = (0..3).map(|i| counter.track(i)).collect();

        let values: Vec<i32> = vec.into_iter().map(|e| *e.value()).collect();

        assert_eq!([0, 1, 2], &values[..]);
        assert_eq!(3, counter.dropped());
    }
} // mod tests
