use slotmap::{Key, SlotMap};

use crate::error::{Error, Result};

/// Ordered store for the live entities of one kind.
///
/// Entities are stored in a [`SlotMap`], so a key handed out by [`EntityPool::insert`]
/// stays valid until the entity is removed and never resolves to another entity
/// afterwards. The separate `order` list keeps creation order, which is the traversal
/// order every scheduling and execution pass relies on.
#[derive(Debug, Clone)]
pub struct EntityPool<K: Key, T> {
    /// Entity storage.
    slots: SlotMap<K, T>,

    /// Keys in creation order.
    order: Vec<K>,

    /// Label used in log messages and errors.
    kind: &'static str,
}

impl<K: Key, T> EntityPool<K, T> {
    pub fn new(kind: &'static str) -> Self {
        Self { slots: SlotMap::with_key(), order: Vec::new(), kind }
    }

    /// Appends an entity at the end of the pool.
    ///
    /// # Returns
    /// The handle of the new entity, or `Error::AllocationError` if the pool could not grow.
    pub fn insert(&mut self, value: T) -> Result<K> {
        self.order.try_reserve(1).map_err(|_| Error::AllocationError(self.kind))?;
        let key = self.slots.insert(value);
        self.order.push(key);
        Ok(key)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in pool order. Collect them first if the pool is mutated while walking.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Entities in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.order.iter().filter_map(|&key| self.slots.get(key).map(|value| (key, value)))
    }

    /// Visits every entity mutably, in pool order.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(K, &mut T),
    {
        for &key in &self.order {
            if let Some(value) = self.slots.get_mut(key) {
                f(key, value);
            }
        }
    }

    /// First entity in pool order matching `predicate`.
    pub fn find_first<P>(&self, mut predicate: P) -> Option<K>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().find(|(_, value)| predicate(value)).map(|(key, _)| key)
    }

    /// Removes every entity matching `predicate` in a single pass.
    /// Survivors keep their keys and relative order.
    ///
    /// # Returns
    /// The number of removed entities.
    pub fn remove_if<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let slots = &mut self.slots;
        let before = self.order.len();

        self.order.retain(|&key| {
            let remove = slots.get(key).is_none_or(|value| predicate(value));
            if remove {
                slots.remove(key);
            }
            !remove
        });

        before - self.order.len()
    }
}
