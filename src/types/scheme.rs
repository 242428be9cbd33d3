//! Certification scheme catalog types.
//!
//! A scheme version contains categories, categories contain topics, and
//! topics contain the criteria a submission is assessed against. Ids follow
//! the conventions of the underlying scheme (e.g. `ENV1.1`), and are plain
//! strings; the catalog is the source of truth for what exists.

use serde::{Deserialize, Serialize};

/// A single assessable criterion within a topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion id, e.g. `ENV1.1-01`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Longer description of what the criterion assesses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Maximum awardable points
    #[serde(alias = "maxPoints", default)]
    pub max_points: f64,
    /// Whether supporting documents are required for this criterion
    #[serde(alias = "requiresDocuments", default)]
    pub requires_documents: bool,
}

/// A topic groups related criteria, e.g. "Life cycle assessment".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Topic id, e.g. `ENV1.1`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Criteria under this topic
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// A category groups topics, e.g. "Environmental quality".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Category id, e.g. `ENV`
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Topics under this category
    #[serde(default)]
    pub topics: Vec<Topic>,
}

/// A released version of a certification scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeVersion {
    /// Version id, e.g. `dgnb-2023`
    pub id: String,
    /// Display label, e.g. `DGNB 2023`
    pub label: String,
    /// Categories in this version
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SchemeVersion {
    /// Find a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find a topic by id across all categories.
    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.categories
            .iter()
            .flat_map(|c| c.topics.iter())
            .find(|t| t.id == id)
    }

    /// Iterate all criteria in the version.
    pub fn all_criteria(&self) -> impl Iterator<Item = &Criterion> {
        self.categories
            .iter()
            .flat_map(|c| c.topics.iter())
            .flat_map(|t| t.criteria.iter())
    }

    /// Find a criterion by id anywhere in the version.
    pub fn criterion(&self, id: &str) -> Option<&Criterion> {
        self.all_criteria().find(|c| c.id == id)
    }

    /// Total achievable points across all criteria.
    pub fn total_points(&self) -> f64 {
        self.all_criteria().map(|c| c.max_points).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_version() -> SchemeVersion {
        SchemeVersion {
            id: "test-2024".into(),
            label: "Test 2024".into(),
            categories: vec![Category {
                id: "ENV".into(),
                name: "Environmental quality".into(),
                topics: vec![Topic {
                    id: "ENV1.1".into(),
                    name: "Life cycle assessment".into(),
                    criteria: vec![
                        Criterion {
                            id: "ENV1.1-01".into(),
                            name: "LCA performed".into(),
                            description: None,
                            max_points: 10.0,
                            requires_documents: true,
                        },
                        Criterion {
                            id: "ENV1.1-02".into(),
                            name: "Benchmarks met".into(),
                            description: None,
                            max_points: 5.0,
                            requires_documents: false,
                        },
                    ],
                }],
            }],
        }
    }

    #[test]
    fn lookups() {
        let v = sample_version();
        assert!(v.category("ENV").is_some());
        assert!(v.topic("ENV1.1").is_some());
        assert_eq!(v.criterion("ENV1.1-02").unwrap().max_points, 5.0);
        assert!(v.criterion("SOC1.1-01").is_none());
    }

    #[test]
    fn total_points_sums_criteria() {
        assert_eq!(sample_version().total_points(), 15.0);
    }

    #[test]
    fn deserializes_camel_case_aliases() {
        let json = r#"{
            "id": "c1", "name": "n",
            "maxPoints": 3.5, "requiresDocuments": true
        }"#;
        let c: Criterion = serde_json::from_str(json).unwrap();
        assert_eq!(c.max_points, 3.5);
        assert!(c.requires_documents);
    }
}
