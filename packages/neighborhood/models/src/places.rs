//! Places attached to neighborhoods.
//!
//! [`PlacesByRegion`] keeps region entries in insertion order so that
//! anything iterating it sees regions in the order they were first added
//! (or the order they appear in a JSON document).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A place a user wants to visit inside a neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Stable identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Optional external link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Region name -> ordered list of places, iterated in insertion order.
///
/// A missing entry behaves exactly like an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacesByRegion {
    entries: IndexMap<String, Vec<Place>>,
}

impl PlacesByRegion {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a place to a region's list, creating the entry on first use.
    pub fn push(&mut self, region: impl Into<String>, place: Place) {
        self.entries.entry(region.into()).or_default().push(place);
    }

    /// Replaces a region's list, keeping its original position if it
    /// already existed.
    pub fn insert(&mut self, region: impl Into<String>, places: Vec<Place>) {
        self.entries.insert(region.into(), places);
    }

    /// Places for a region, empty if the region has no entry.
    #[must_use]
    pub fn get(&self, region: &str) -> &[Place] {
        self.entries.get(region).map_or(&[][..], Vec::as_slice)
    }

    /// Number of places attached to a region.
    #[must_use]
    pub fn count(&self, region: &str) -> usize {
        self.get(region).len()
    }

    /// Number of region entries (including ones with empty lists).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no region entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(region, places)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Place])> {
        self.entries
            .iter()
            .map(|(name, places)| (name.as_str(), places.as_slice()))
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Place>)> for PlacesByRegion {
    fn from_iter<T: IntoIterator<Item = (K, Vec<Place>)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (region, places) in iter {
            map.insert(region, places);
        }
        map
    }
}
