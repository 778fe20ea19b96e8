/// Fixed-capacity arena with a free list.
///
/// All storage is reserved at construction; `alloc` never grows the
/// backing vector. Freed slots are recycled LIFO and their generation is
/// bumped so stale ids can be detected.
///
/// # Example
///
/// ```ignore
/// let mut pool = NodePool::with_capacity(2);
/// let a = pool.alloc("a").unwrap();  // slot 0
/// let b = pool.alloc("b").unwrap();  // slot 1
/// assert!(pool.alloc("c").is_err());  // full
/// pool.free(a.index);                  // slot 0 is now available
/// let c = pool.alloc("c").unwrap();  // slot 0 (recycled, new generation)
/// assert!(!pool.contains(a));
/// ```

use std::ops::{Index, IndexMut};

/// Generational id of a pool slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId {
    pub index: u32,
    pub generation: u32,
}

struct PoolSlot<T> {
    generation: u32,
    value: Option<T>,
}

pub struct NodePool<T> {
    slots: Vec<PoolSlot<T>>,
    free_list: Vec<u32>,
    len: u32,
}

impl<T> NodePool<T> {
    /// Create a pool holding at most `capacity` live values
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|_| PoolSlot { generation: 0, value: None })
            .collect();
        // Reversed so the first allocation pops slot 0
        let free_list = (0..capacity as u32).rev().collect();
        Self { slots, free_list, len: 0 }
    }

    /// Store `value` in a free slot, or hand it back if the pool is full
    pub fn alloc(&mut self, value: T) -> Result<PoolId, T> {
        let Some(index) = self.free_list.pop() else {
            return Err(value);
        };
        let slot = &mut self.slots[index as usize];
        debug_assert!(slot.value.is_none(), "free list holds an occupied slot: {}", index);
        slot.value = Some(value);
        self.len += 1;
        Ok(PoolId { index, generation: slot.generation })
    }

    /// Release the value at `index` and return it
    pub fn free(&mut self, index: u32) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.len -= 1;
        self.free_list.push(index);
        Some(value)
    }

    /// Id of the live value at `index`
    pub fn id(&self, index: u32) -> Option<PoolId> {
        let slot = self.slots.get(index as usize)?;
        slot.value.as_ref().map(|_| PoolId { index, generation: slot.generation })
    }

    /// Whether `id` still refers to a live value
    pub fn contains(&self, id: PoolId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: PoolId) -> Option<&T> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, id: PoolId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Iterate over live values with their slot index
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.value.as_ref().map(|v| (i as u32, v)))
    }

    /// Mutable iteration over live values
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.value.as_mut().map(|v| (i as u32, v)))
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Number of slots still available
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.free_list.is_empty()
    }
}

/// Direct slot access for internal links. Panics on a vacant slot.
impl<T> Index<u32> for NodePool<T> {
    type Output = T;

    fn index(&self, index: u32) -> &T {
        match self.slots[index as usize].value.as_ref() {
            Some(value) => value,
            None => panic!("access to vacant pool slot {}", index),
        }
    }
}

impl<T> IndexMut<u32> for NodePool<T> {
    fn index_mut(&mut self, index: u32) -> &mut T {
        match self.slots[index as usize].value.as_mut() {
            Some(value) => value,
            None => panic!("access to vacant pool slot {}", index),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "node_pool_tests.rs"]
mod tests;
