//! Validated registry project
//!
//! Values here are built once by structure validation and only read afterwards.
//! A [`Project`] owns its namespaces, which own events, which own versions and
//! transformations.

use std::path::{Path, PathBuf};

use crate::error::EventRef;

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub description: Option<PathBuf>,
    pub namespaces: Vec<Namespace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    pub name: String,
    pub description_path: PathBuf,
    pub events: Vec<Event>,
}

/// An event type with its schema versions.
///
/// Transformations are expected to reference existing versions, but that is
/// checked by transformation validation, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: String,
    pub description_path: PathBuf,
    pub versions: Vec<Version>,
    pub transformations: Vec<Transformation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    pub version: u32,
    pub schema_path: PathBuf,
    pub description_path: PathBuf,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub from: u32,
    pub to: u32,
    pub transformation_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub name: String,
    pub example_file_path: PathBuf,
}

impl Project {
    /// Every `(namespace, event)` pair in declaration order
    pub fn events(&self) -> impl Iterator<Item = (&Namespace, &Event)> {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.events.iter().map(move |event| (ns, event)))
    }

    /// Every `(namespace, event, version)` triple in declaration order
    pub fn event_versions(&self) -> impl Iterator<Item = (&Namespace, &Event, &Version)> {
        self.events()
            .flat_map(|(ns, event)| event.versions.iter().map(move |v| (ns, event, v)))
    }

    /// Every `(namespace, event, transformation)` triple in declaration order
    pub fn event_transformations(
        &self,
    ) -> impl Iterator<Item = (&Namespace, &Event, &Transformation)> {
        self.events().flat_map(|(ns, event)| {
            event.transformations.iter().map(move |t| (ns, event, t))
        })
    }
}

impl Namespace {
    pub fn event_ref(&self, event: &Event) -> EventRef {
        EventRef::new(&self.name, &event.event_type)
    }
}

impl Event {
    pub fn version(&self, number: u32) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == number)
    }

    /// Versions ordered by number, independent of folder order
    pub fn sorted_versions(&self) -> Vec<&Version> {
        let mut versions: Vec<&Version> = self.versions.iter().collect();
        versions.sort_by_key(|v| v.version);
        versions
    }

    pub fn has_transformation(&self, from: u32, to: u32) -> bool {
        self.transformations.iter().any(|t| t.from == from && t.to == to)
    }
}

impl Transformation {
    pub fn path(&self) -> &Path {
        &self.transformation_path
    }
}
