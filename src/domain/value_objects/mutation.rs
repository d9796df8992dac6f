use super::resource_ref::ResourceRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn as_str(&self) -> &str {
        match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// Resource types of the inspection domain a queued write can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// État des lieux (the inspection record itself).
    Edl,
    /// A room within an inspection.
    Piece,
    /// An inspected element within a room (wall, floor, door...).
    Element,
    /// A utility meter reading.
    Compteur,
    /// A key handed over at move-in/move-out.
    Cle,
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Edl => "edl",
            ResourceType::Piece => "piece",
            ResourceType::Element => "element",
            ResourceType::Compteur => "compteur",
            ResourceType::Cle => "cle",
        }
    }
}

/// What a queued mutation does and to which resource. The target ref is the
/// statically checked handle the id substitution step rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationOperation {
    pub kind: MutationKind,
    pub resource: ResourceType,
    pub target: ResourceRef,
}

impl MutationOperation {
    pub fn new(kind: MutationKind, resource: ResourceType, target: ResourceRef) -> Self {
        Self {
            kind,
            resource,
            target,
        }
    }

    pub fn create(resource: ResourceType, local_placeholder: String) -> Self {
        Self::new(
            MutationKind::Create,
            resource,
            ResourceRef::Local(local_placeholder),
        )
    }
}
