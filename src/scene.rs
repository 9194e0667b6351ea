use std::sync::Arc;

use log::debug;

use crate::element::{Element, ElementRef, NewElement};
use crate::id_generator::{ElementId, IdGenerator};
use crate::util::time;

/// Ordered collection of every committed element on one surface.
///
/// Insertion order is paint order. The store is the only writer of its
/// collection; elements are handed out as shared immutable references.
#[derive(Debug, Default, Clone)]
pub struct SceneStore {
    elements: Vec<ElementRef>,
    ids: IdGenerator,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return its new id
    pub fn add_element(&mut self, element: NewElement) -> ElementId {
        let id = self.ids.generate_id();
        let kind = element.kind();
        self.elements
            .push(Arc::new(Element::new(id, time::timestamp_millis(), element)));
        debug!("Added {kind} element {id} ({} total)", self.elements.len());
        id
    }

    /// Returns false when no element has this id
    pub fn remove_by_id(&mut self, id: ElementId) -> bool {
        match self.elements.iter().position(|e| e.id() == id) {
            Some(index) => {
                self.elements.remove(index);
                debug!("Removed element {id}");
                true
            }
            None => false,
        }
    }

    /// Remove every matching element in one pass, keeping survivors in order
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Element) -> bool,
    {
        let before = self.elements.len();
        self.elements.retain(|e| !predicate(e));
        let removed = before - self.elements.len();
        if removed > 0 {
            debug!("Removed {removed} elements");
        }
        removed
    }

    pub fn get_by_id(&self, id: ElementId) -> Option<&ElementRef> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Snapshot of the elements in paint order; later changes to the store
    /// don't affect it
    pub fn list_all(&self) -> Vec<ElementRef> {
        self.elements.clone()
    }

    /// Borrowed view of the elements in paint order
    pub fn elements(&self) -> &[ElementRef] {
        &self.elements
    }

    /// Drop every element and rewind the id counter
    pub fn clear(&mut self) {
        self.elements.clear();
        self.ids.reset();
        debug!("Cleared scene");
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Style, factory};
    use egui::pos2;

    fn line(offset: f32) -> NewElement {
        factory::create_line(Style::default(), pos2(offset, 0.0), pos2(offset, 10.0))
    }

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut store = SceneStore::new();
        let a = store.add_element(line(0.0));
        let b = store.add_element(line(1.0));
        assert!(b > a);
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_not_an_error() {
        let mut store = SceneStore::new();
        store.add_element(line(0.0));
        assert!(!store.remove_by_id(ElementId(42)));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_list_all_is_a_snapshot() {
        let mut store = SceneStore::new();
        let id = store.add_element(line(0.0));
        let snapshot = store.list_all();
        store.remove_by_id(id);
        assert_eq!(snapshot.len(), 1);
        assert!(store.is_empty());
    }
}
