//! Navigation menu entries and the arena used to reason about their hierarchy.

use std::collections::{HashMap, HashSet};

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::error::DomainError;

/// Whether an entry points inside the site or away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    Internal,
    External,
}

/// Discriminator naming what a navigation entry links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkSource {
    #[default]
    Custom,
    Category,
    Post,
}

/// Target of a navigation entry. Exactly one reference exists per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationLink {
    /// Custom URL carried by the slug.
    Custom,
    Category(Uuid),
    Post(Uuid),
}

impl NavigationLink {
    /// Build a link from the flat discriminator-plus-two-references shape.
    pub fn from_parts(
        source: LinkSource,
        category_id: Option<Uuid>,
        post_id: Option<Uuid>,
    ) -> Result<Self, DomainError> {
        match (source, category_id, post_id) {
            (LinkSource::Custom, None, None) => Ok(Self::Custom),
            (LinkSource::Category, Some(id), None) => Ok(Self::Category(id)),
            (LinkSource::Post, None, Some(id)) => Ok(Self::Post(id)),
            (LinkSource::Custom, _, _) => Err(DomainError::Validation(
                "custom links must not reference a category or a post".to_string(),
            )),
            (LinkSource::Category, _, _) => Err(DomainError::Validation(
                "category links need a category_id and no post_id".to_string(),
            )),
            (LinkSource::Post, _, _) => Err(DomainError::Validation(
                "post links need a post_id and no category_id".to_string(),
            )),
        }
    }

    pub fn source(&self) -> LinkSource {
        match self {
            Self::Custom => LinkSource::Custom,
            Self::Category(_) => LinkSource::Category,
            Self::Post(_) => LinkSource::Post,
        }
    }

    pub fn category_id(&self) -> Option<Uuid> {
        match self {
            Self::Category(id) => Some(*id),
            _ => None,
        }
    }

    pub fn post_id(&self) -> Option<Uuid> {
        match self {
            Self::Post(id) => Some(*id),
            _ => None,
        }
    }
}

impl Serialize for NavigationLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("NavigationLink", 3)?;
        state.serialize_field("link_source", &self.source())?;
        state.serialize_field("category_id", &self.category_id())?;
        state.serialize_field("post_id", &self.post_id())?;
        state.end()
    }
}

/// One entry of the site menu. Entries form a forest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationItem {
    pub id: Uuid,
    pub label: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: NavigationKind,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub parent_id: Option<Uuid>,
    #[serde(flatten)]
    pub link: NavigationLink,
}

/// Arena over a flat set of navigation items, addressed by id.
///
/// Parent references that point outside the set are kept as-is; such items
/// are reported by [`NavigationTree::orphans`] and never followed.
pub struct NavigationTree {
    nodes: Vec<NavigationItem>,
    index: HashMap<Uuid, usize>,
    children: HashMap<Uuid, Vec<usize>>,
}

impl NavigationTree {
    pub fn new(mut nodes: Vec<NavigationItem>) -> Self {
        nodes.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.label.cmp(&b.label)));

        let index = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let mut children: HashMap<Uuid, Vec<usize>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if let Some(parent) = node.parent_id {
                children.entry(parent).or_default().push(i);
            }
        }

        Self {
            nodes,
            index,
            children,
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: Uuid) -> Option<&NavigationItem> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Items without a parent, in menu order.
    pub fn roots(&self) -> Vec<&NavigationItem> {
        self.nodes.iter().filter(|n| n.parent_id.is_none()).collect()
    }

    /// Items whose parent reference points to a missing item.
    pub fn orphans(&self) -> Vec<&NavigationItem> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.is_some_and(|p| !self.contains(p)))
            .collect()
    }

    /// Direct children of `id`, in menu order.
    pub fn children(&self, id: Uuid) -> Vec<&NavigationItem> {
        self.children
            .get(&id)
            .map(|idx| idx.iter().map(|&i| &self.nodes[i]).collect())
            .unwrap_or_default()
    }

    /// Every item below `id`, deepest first, so deleting in order never
    /// leaves a child whose parent is already gone.
    pub fn descendants(&self, id: Uuid) -> Vec<Uuid> {
        let mut out = Vec::new();
        let mut seen = HashSet::from([id]);
        self.collect_descendants(id, &mut seen, &mut out);
        out
    }

    fn collect_descendants(&self, id: Uuid, seen: &mut HashSet<Uuid>, out: &mut Vec<Uuid>) {
        for child in self.children(id) {
            if seen.insert(child.id) {
                self.collect_descendants(child.id, seen, out);
                out.push(child.id);
            }
        }
    }

    /// Whether re-parenting `node` under `new_parent` would close a loop.
    pub fn creates_cycle(&self, node: Uuid, new_parent: Uuid) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(new_parent);

        while let Some(id) = current {
            if id == node {
                return true;
            }
            // A loop that does not pass through `node` is pre-existing corruption.
            if !visited.insert(id) {
                return false;
            }
            current = self.get(id).and_then(|n| n.parent_id);
        }

        false
    }
}
