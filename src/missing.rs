//! Missing-transformation calculation
//!
//! Only neighbouring versions (in ascending order) need transformations
//! between them. Gaps in numbering do not matter: versions 3 and 5 are
//! neighbours when there is no 4.

use crate::model::Event;

/// A pair of versions lacking a transformation, in transformation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VersionPair {
    pub from: u32,
    pub to: u32,
}

impl VersionPair {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }
}

impl From<(u32, u32)> for VersionPair {
    fn from((from, to): (u32, u32)) -> Self {
        Self { from, to }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MissingTransformationCalculator;

impl MissingTransformationCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Neighbouring `(lower, higher)` pairs without a declared upcast
    pub fn calculate_upcast_transformations(&self, event: &Event) -> Vec<VersionPair> {
        adjacent_pairs(event)
            .into_iter()
            .filter(|(lower, higher)| !event.has_transformation(*lower, *higher))
            .map(|(lower, higher)| VersionPair::new(lower, higher))
            .collect()
    }

    /// Neighbouring `(higher, lower)` pairs without a declared downcast
    pub fn calculate_downcast_transformations(&self, event: &Event) -> Vec<VersionPair> {
        adjacent_pairs(event)
            .into_iter()
            .filter(|(lower, higher)| !event.has_transformation(*higher, *lower))
            .map(|(lower, higher)| VersionPair::new(higher, lower))
            .collect()
    }
}

fn adjacent_pairs(event: &Event) -> Vec<(u32, u32)> {
    let numbers: Vec<u32> = event.sorted_versions().iter().map(|v| v.version).collect();
    numbers.windows(2).map(|w| (w[0], w[1])).collect()
}
