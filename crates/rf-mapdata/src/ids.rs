//! Typed string identities and dense integer handles

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Catalog entry types that reserve a null identity
pub trait NullId {
    /// String id of the null entry (`t_null`, `f_null`, ...)
    const NULL_ID: &'static str;
}

/// String identity of a catalog entry of type `T`
pub struct StringId<T> {
    id: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StringId<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

impl<T: NullId> StringId<T> {
    pub fn null() -> Self {
        Self::new(T::NULL_ID)
    }

    /// True for the null id and for an empty string
    pub fn is_null(&self) -> bool {
        self.id.is_empty() || self.id == T::NULL_ID
    }
}

impl<T: NullId> Default for StringId<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> Clone for StringId<T> {
    fn clone(&self) -> Self {
        Self::new(self.id.clone())
    }
}

impl<T> PartialEq for StringId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for StringId<T> {}

impl<T> PartialOrd for StringId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for StringId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for StringId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for StringId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.id)
    }
}

impl<T> fmt::Display for StringId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl<T> From<&str> for StringId<T> {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<T> Serialize for StringId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.id)
    }
}

impl<'de, T> Deserialize<'de> for StringId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Dense handle into a catalog; index 0 is always the null entry
pub struct IntId<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> IntId<T> {
    pub const NULL: IntId<T> = IntId::new(0);

    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    pub const fn to_i(&self) -> usize {
        self.index
    }

    pub const fn is_null(&self) -> bool {
        self.index == 0
    }
}

impl<T> Default for IntId<T> {
    fn default() -> Self {
        Self::NULL
    }
}

impl<T> Clone for IntId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IntId<T> {}

impl<T> PartialEq for IntId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for IntId<T> {}

impl<T> Hash for IntId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for IntId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntId({})", self.index)
    }
}
