//! In-memory record store
//!
//! The store owns every resolution plus the identifier counter. It performs
//! no validation; callers check their input before touching it.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::resolution::{Resolution, ResolutionId};

/// Store shared across request handlers behind a single mutex
pub type SharedStore = Arc<Mutex<ResolutionStore>>;

/// Process-lifetime collection of resolutions
#[derive(Debug)]
pub struct ResolutionStore {
    /// Records in insertion order
    items: Vec<Resolution>,

    /// Next identifier to hand out
    next_id: ResolutionId,
}

impl Default for ResolutionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionStore {
    /// Empty store, first identifier is 1
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Wrap a fresh store for sharing
    pub fn shared() -> SharedStore {
        Arc::new(Mutex::new(Self::new()))
    }

    /// All records in insertion order
    pub fn list(&self) -> &[Resolution] {
        &self.items
    }

    /// Record with the given identifier
    pub fn get_by_id(&self, id: ResolutionId) -> Option<&Resolution> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Mutable access to the record with the given identifier
    pub fn get_by_id_mut(&mut self, id: ResolutionId) -> Option<&mut Resolution> {
        self.items.iter_mut().find(|r| r.id == id)
    }

    /// Create a record under the next identifier and append it
    pub fn add(&mut self, title: &str) -> Resolution {
        let resolution = Resolution::new(self.next_id, title);
        self.next_id += 1;
        self.items.push(resolution.clone());
        resolution
    }

    /// Remove a record, keeping the order of the rest
    pub fn remove(&mut self, id: ResolutionId) -> Option<Resolution> {
        let index = self.items.iter().position(|r| r.id == id)?;
        Some(self.items.remove(index))
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
