//! Registry Content Index
//!
//! The index lists every schema and transformation of a validated project
//! together with content hashes, so consumers can resolve and verify them at
//! runtime.
//!
//! Downcasts that are not backed by a script appear as synthetic entries. They
//! carry no hash, a `"type": "synthetic"` tag and an id under the
//! [`SYNTHETIC_PREFIX`]; both are part of the consumer contract.

use serde::{Deserialize, Serialize};

use crate::checksum::{Checksum, ChecksumService};
use crate::error::Result;
use crate::missing::MissingTransformationCalculator;
use crate::model::Project;
use crate::version::transformation_dir_name;

pub const SYNTHETIC_PREFIX: &str = "synthetic";

/// `{namespace}/{eventType}/{version}/schema.json`
pub fn schema_id(namespace: &str, event_type: &str, version: u32) -> String {
    format!("{}/{}/{}/schema.json", namespace, event_type, version)
}

/// `{namespace}/{eventType}/{from}-{to}/transform.js`
pub fn transformation_id(namespace: &str, event_type: &str, from: u32, to: u32) -> String {
    format!(
        "{}/{}/{}/transform.js",
        namespace,
        event_type,
        transformation_dir_name(from, to)
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Index {
    pub schemas: Vec<SchemaDescriptor>,
    pub transformations: Vec<TransformationDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDescriptor {
    pub id: String,
    pub namespace: String,
    pub event_type: String,
    pub version: u32,
    pub content_hash: Checksum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransformationDescriptor {
    /// Backed by a transformation script
    File {
        id: String,
        namespace: String,
        #[serde(rename = "eventType")]
        event_type: String,
        from: u32,
        to: u32,
        #[serde(rename = "contentHash")]
        content_hash: Checksum,
    },
    /// Assumed no-op downcast
    Synthetic {
        id: String,
        namespace: String,
        #[serde(rename = "eventType")]
        event_type: String,
        from: u32,
        to: u32,
    },
}

impl TransformationDescriptor {
    pub fn id(&self) -> &str {
        match self {
            TransformationDescriptor::File { id, .. } | TransformationDescriptor::Synthetic { id, .. } => id,
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            TransformationDescriptor::File { namespace, .. }
            | TransformationDescriptor::Synthetic { namespace, .. } => namespace,
        }
    }

    pub fn event_type(&self) -> &str {
        match self {
            TransformationDescriptor::File { event_type, .. }
            | TransformationDescriptor::Synthetic { event_type, .. } => event_type,
        }
    }

    /// `(from, to)`
    pub fn versions(&self) -> (u32, u32) {
        match self {
            TransformationDescriptor::File { from, to, .. }
            | TransformationDescriptor::Synthetic { from, to, .. } => (*from, *to),
        }
    }

    pub fn content_hash(&self) -> Option<&Checksum> {
        match self {
            TransformationDescriptor::File { content_hash, .. } => Some(content_hash),
            TransformationDescriptor::Synthetic { .. } => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, TransformationDescriptor::Synthetic { .. })
    }
}

impl Index {
    pub fn schema(&self, id: &str) -> Option<&SchemaDescriptor> {
        self.schemas.iter().find(|s| s.id == id)
    }

    pub fn transformation(&self, id: &str) -> Option<&TransformationDescriptor> {
        self.transformations.iter().find(|t| t.id() == id)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexFileCalculator {
    checksums: ChecksumService,
    calculator: MissingTransformationCalculator,
}

impl IndexFileCalculator {
    pub fn new(checksums: ChecksumService, calculator: MissingTransformationCalculator) -> Self {
        Self {
            checksums,
            calculator,
        }
    }

    /// Build the index of a validated project.
    ///
    /// Script-backed transformations come first, then synthetic ones.
    pub fn calculate_index(&self, project: &Project) -> Result<Index> {
        let mut schemas = Vec::new();
        for (namespace, event, version) in project.event_versions() {
            schemas.push(SchemaDescriptor {
                id: schema_id(&namespace.name, &event.event_type, version.version),
                namespace: namespace.name.clone(),
                event_type: event.event_type.clone(),
                version: version.version,
                content_hash: self.checksums.create_hash(&version.schema_path)?,
            });
        }

        let mut transformations = Vec::new();
        for (namespace, event, transformation) in project.event_transformations() {
            transformations.push(TransformationDescriptor::File {
                id: transformation_id(
                    &namespace.name,
                    &event.event_type,
                    transformation.from,
                    transformation.to,
                ),
                namespace: namespace.name.clone(),
                event_type: event.event_type.clone(),
                from: transformation.from,
                to: transformation.to,
                content_hash: self.checksums.create_hash(transformation.path())?,
            });
        }

        for (namespace, event) in project.events() {
            for pair in self.calculator.calculate_downcast_transformations(event) {
                transformations.push(TransformationDescriptor::Synthetic {
                    id: format!(
                        "{}/{}",
                        SYNTHETIC_PREFIX,
                        transformation_id(&namespace.name, &event.event_type, pair.from, pair.to)
                    ),
                    namespace: namespace.name.clone(),
                    event_type: event.event_type.clone(),
                    from: pair.from,
                    to: pair.to,
                });
            }
        }

        tracing::info!(
            schemas = schemas.len(),
            transformations = transformations.len(),
            "index calculated"
        );
        Ok(Index {
            schemas,
            transformations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_format() {
        assert_eq!(schema_id("orders", "OrderPlaced", 3), "orders/OrderPlaced/3/schema.json");
        assert_eq!(
            transformation_id("orders", "OrderPlaced", 3, 2),
            "orders/OrderPlaced/3-2/transform.js"
        );
    }

    #[test]
    fn test_wire_format() {
        let index = Index {
            schemas: vec![SchemaDescriptor {
                id: schema_id("ns", "Event", 1),
                namespace: "ns".to_string(),
                event_type: "Event".to_string(),
                version: 1,
                content_hash: Checksum::from("abc".to_string()),
            }],
            transformations: vec![
                TransformationDescriptor::File {
                    id: transformation_id("ns", "Event", 1, 2),
                    namespace: "ns".to_string(),
                    event_type: "Event".to_string(),
                    from: 1,
                    to: 2,
                    content_hash: Checksum::from("def".to_string()),
                },
                TransformationDescriptor::Synthetic {
                    id: "synthetic/ns/Event/2-1/transform.js".to_string(),
                    namespace: "ns".to_string(),
                    event_type: "Event".to_string(),
                    from: 2,
                    to: 1,
                },
            ],
        };

        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(
            value,
            json!({
                "schemas": [{
                    "id": "ns/Event/1/schema.json",
                    "namespace": "ns",
                    "eventType": "Event",
                    "version": 1,
                    "contentHash": "abc"
                }],
                "transformations": [{
                    "type": "file",
                    "id": "ns/Event/1-2/transform.js",
                    "namespace": "ns",
                    "eventType": "Event",
                    "from": 1,
                    "to": 2,
                    "contentHash": "def"
                }, {
                    "type": "synthetic",
                    "id": "synthetic/ns/Event/2-1/transform.js",
                    "namespace": "ns",
                    "eventType": "Event",
                    "from": 2,
                    "to": 1
                }]
            })
        );

        let parsed: Index = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, index);
        assert!(parsed.transformations[1].is_synthetic());
        assert_eq!(parsed.transformations[1].content_hash(), None);
    }
}
