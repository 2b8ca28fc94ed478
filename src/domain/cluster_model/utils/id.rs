use std::fmt;
use std::marker::PhantomData;

/// Public, human readable identity of a simulated entity.
///
/// Ids are handed out by an [`IdSequence`] in creation order and never reused,
/// even after the entity left its pool.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id<T> {
    pub id: u64,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: u64) -> Self {
        Id { id, _marker: PhantomData }
    }
}

// Manual impls, derive would require `T: Clone`/`T: Copy` on the tag.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<Id<T>> for u64 {
    fn from(value: Id<T>) -> Self {
        value.id
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `cluster_sim::...::ResourceTag` prints as `ResourceId`
        let tag = std::any::type_name::<T>().rsplit("::").next().unwrap_or_default();
        write!(f, "{}Id: {}", tag.strip_suffix("Tag").unwrap_or(tag), self.id)
    }
}

/// Monotonic id generator. The first id handed out is 1.
#[derive(Debug)]
pub struct IdSequence<T> {
    last: u64,
    _marker: PhantomData<T>,
}

impl<T> IdSequence<T> {
    pub fn new() -> Self {
        IdSequence { last: 0, _marker: PhantomData }
    }

    pub fn next_id(&mut self) -> Id<T> {
        self.last += 1;
        Id::new(self.last)
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.last
    }
}

impl<T> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct ResourceTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct JobTag;

pub type ResourceId = Id<ResourceTag>;
pub type JobId = Id<JobTag>;
