use serde::{Deserialize, Serialize};

/// Identifier of an element within one scene store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id counter owned by a single store
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub const FIRST_ID: u64 = 1;

    pub fn new() -> Self {
        Self { next: Self::FIRST_ID }
    }

    pub fn generate_id(&mut self) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        id
    }

    /// Rewind the counter to its initial value
    pub fn reset(&mut self) {
        self.next = Self::FIRST_ID;
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.generate_id(), ElementId(1));
        assert_eq!(ids.generate_id(), ElementId(2));
        ids.reset();
        assert_eq!(ids.generate_id(), ElementId(1));
    }
}
