//  Serialization, as a plain sequence.

use core::{cmp, fmt, marker::PhantomData, mem};

use serde::{
    de::{Deserialize, Deserializer, Error, SeqAccess, Visitor},
    ser::{Serialize, Serializer},
};

use crate::utils::alloc::Allocator;

use super::CompactVec;

//  Upper bound on the memory reserved up-front from an untrusted size hint.
const MAX_PREALLOCATION_BYTES: usize = 1024 * 1024;

impl<T, const N: usize, A> Serialize for CompactVec<T, N, A>
where
    T: Serialize,
    A: Allocator,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, T, const N: usize, A> Deserialize<'de> for CompactVec<T, N, A>
where
    T: Deserialize<'de>,
    A: Allocator + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(CompactVecVisitor(PhantomData))
    }
}

struct CompactVecVisitor<T, const N: usize, A>(PhantomData<fn() -> (T, A)>);

impl<'de, T, const N: usize, A> Visitor<'de> for CompactVecVisitor<T, N, A>
where
    T: Deserialize<'de>,
    A: Allocator + Default,
{
    type Value = CompactVec<T, N, A>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        formatter.write_str("a sequence")
    }

    fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
    where
        S: SeqAccess<'de>,
    {
        let mut vec = CompactVec::new_in(A::default());

        if let Some(hint) = seq.size_hint() {
            let cautious = cmp::min(hint, MAX_PREALLOCATION_BYTES / cmp::max(mem::size_of::<T>(), 1));

            vec.try_reserve(cautious).map_err(S::Error::custom)?;
        }

        while let Some(element) = seq.next_element()? {
            vec.try_push(element).map_err(S::Error::custom)?;
        }

        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use std::string::String;

    use super::*;

    #[test]
    fn round_trip_inline() {
        let vec = CompactVec::<u32, 4>::from_slice(&[1, 2, 3]);

        let json = serde_json::to_string(&vec).expect("serializable");

        assert_eq!("[1,2,3]", json);

        let back: CompactVec<u32, 4> = serde_json::from_str(&json).expect("deserializable");

        assert_eq!(vec, back);
        assert!(back.is_inline());
    }

    #[test]
    fn round_trip_heap() {
        let vec: CompactVec<String, 2> = ["a", "b", "c"].into_iter().map(String::from).collect();

        let json = serde_json::to_string(&vec).expect("serializable");

        assert_eq!(r#"["a","b","c"]"#, json);

        let back: CompactVec<String, 2> = serde_json::from_str(&json).expect("deserializable");

        assert_eq!(vec, back);
        assert!(!back.is_inline());
    }

    #[test]
    fn inline_capacity_is_not_serialized() {
        let vec = CompactVec::<u8, 8>::from_slice(&[1, 2, 3]);

        let json = serde_json::to_string(&vec).expect("serializable");

        let back: CompactVec<u8, 1> = serde_json::from_str(&json).expect("deserializable");

        assert_eq!(vec, back);
    }

    #[test]
    fn reject_non_sequence() {
        let result: Result<CompactVec<u8, 4>, _> = serde_json::from_str("{}");

        assert!(result.is_err());
    }
} // mod tests
