use crate::record::{
    CollectiveProcedure, EntityRecord, EntitySummary, MandateSummary, RegistrationStatus,
    Representative,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    Root,
    Company,
    Person,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "ROOT",
            NodeKind::Company => "COMPANY",
            NodeKind::Person => "PERSON",
        }
    }

    pub fn is_company(&self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Company)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Active,
    Closed,
    Unknown,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
            NodeStatus::Closed => "closed",
            NodeStatus::Unknown => "unknown",
        }
    }
}

impl From<RegistrationStatus> for NodeStatus {
    fn from(status: RegistrationStatus) -> Self {
        match status {
            RegistrationStatus::Deregistered => NodeStatus::Closed,
            RegistrationStatus::Registered | RegistrationStatus::Unknown => NodeStatus::Active,
        }
    }
}

/// Traversal cost class of an edge.
///
/// `Free` edges are ownership descents and never consume cost depth. Every
/// other hop is `Costly` and advances cost depth by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkCost {
    Free,
    Costly,
}

impl LinkCost {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkCost::Free => "FREE",
            LinkCost::Costly => "COSTLY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub name: String,
    pub kind: NodeKind,
    /// Relationship to the previous step; `None` on the root step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

impl PathStep {
    pub fn new(name: impl Into<String>, kind: NodeKind, relation: Option<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            relation,
        }
    }
}

/// Immutable chain of steps from the root entity.
///
/// Cloning shares the underlying slice; `extended` always allocates a new one,
/// so a path stored on an edge can never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<PathStep>", into = "Vec<PathStep>")]
pub struct RelationPath(Arc<[PathStep]>);

impl RelationPath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn extended(&self, step: PathStep) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(step);
        Self(steps.into())
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn first(&self) -> Option<&PathStep> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&PathStep> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders as `A > (Président) B > (Mandataire) C`.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|step| match &step.relation {
                Some(rel) => format!("({}) {}", rel, step.name),
                None => step.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

impl From<Vec<PathStep>> for RelationPath {
    fn from(steps: Vec<PathStep>) -> Self {
        Self(steps.into())
    }
}

impl From<RelationPath> for Vec<PathStep> {
    fn from(path: RelationPath) -> Self {
        path.0.to_vec()
    }
}

/// The raw data a node was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", content = "record", rename_all = "snake_case")]
pub enum SourceRecord {
    Entity(Box<EntityRecord>),
    Representative(Representative),
    Summary(EntitySummary),
    Mandate(MandateSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub status: NodeStatus,
    pub data: SourceRecord,
    /// Cost depth at first discovery.
    pub degree: u32,
    #[serde(default)]
    pub has_alert: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<CollectiveProcedure>,
}

impl GraphNode {
    /// A company node known only from another entity's listing.
    pub fn placeholder(id: String, label: String, data: SourceRecord, degree: u32) -> Self {
        Self {
            id,
            label,
            kind: NodeKind::Company,
            status: NodeStatus::Unknown,
            data,
            degree,
            has_alert: false,
            procedures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub label: String,
    pub active: bool,
    pub path: RelationPath,
    pub cost: LinkCost,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_path(name: &str) -> RelationPath {
        RelationPath::empty().extended(PathStep::new(name, NodeKind::Root, None))
    }

    #[test]
    fn test_extended_does_not_touch_original() {
        let root = root_path("ROOT CO");
        let child = root.extended(PathStep::new(
            "CHILD",
            NodeKind::Company,
            Some("Président".to_string()),
        ));

        assert_eq!(root.len(), 1);
        assert_eq!(child.len(), 2);
        assert_eq!(child.first().map(|s| s.name.as_str()), Some("ROOT CO"));
        assert_eq!(child.render(), "ROOT CO > (Président) CHILD");
    }

    #[test]
    fn test_path_serializes_as_list() {
        let path = root_path("ROOT CO");
        let json = serde_json::to_value(&path).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["kind"], "ROOT");

        let back: RelationPath = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_status_from_registration() {
        assert_eq!(
            NodeStatus::from(RegistrationStatus::Deregistered),
            NodeStatus::Closed
        );
        assert_eq!(
            NodeStatus::from(RegistrationStatus::Registered),
            NodeStatus::Active
        );
    }
}
