//! Seller-owned category hierarchy.
//!
//! Categories are stored flat with a parent pointer. [`CategoryTree`]
//! assembles a seller's categories into nested nodes with children sorted by
//! name, and answers descendant queries used for reparenting checks and
//! cascading deletes.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::domain::validation::{FieldError, optional_text, required_text};
use crate::domain::{CategoryId, ImageRef, SellerId};

/// Longest accepted category name.
pub const CATEGORY_NAME_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 2000;

/// A category row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub seller_id: SellerId,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    pub parent_id: Option<CategoryId>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for creating a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    pub image: Option<ImageRef>,
    pub parent_id: Option<CategoryId>,
    pub is_active: bool,
}

impl CategoryDraft {
    /// Validate raw creation fields.
    pub fn try_new(
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
        parent_id: Option<CategoryId>,
        is_active: Option<bool>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            name: required_text("name", name, CATEGORY_NAME_MAX)?,
            description: optional_text("description", description, DESCRIPTION_MAX)?,
            image: ImageRef::parse_optional("image", image)?,
            parent_id,
            is_active: is_active.unwrap_or(true),
        })
    }
}

/// Partial category update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    /// Validated new name, if one was supplied.
    pub fn validated_name(&self) -> Result<Option<String>, FieldError> {
        self.name
            .clone()
            .map(|name| required_text("name", Some(name), CATEGORY_NAME_MAX))
            .transpose()
    }

    /// Apply the patch to `category`. Parent validity is checked by the caller.
    pub fn apply(self, category: &mut Category, now: DateTime<Utc>) -> Result<(), FieldError> {
        if let Some(name) = self.validated_name()? {
            category.name = name;
        }
        if self.description.is_some() {
            category.description = optional_text("description", self.description, DESCRIPTION_MAX)?;
        }
        if let Some(image) = ImageRef::parse_optional("image", self.image)? {
            category.image = Some(image);
        }
        if let Some(parent) = self.parent_id {
            category.parent_id = Some(parent);
        }
        if let Some(active) = self.is_active {
            category.is_active = active;
        }
        category.updated_at = now;
        Ok(())
    }
}

/// A category with its nested subcategories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub category: Category,
    pub subcategories: Vec<CategoryNode>,
}

/// Index over one seller's categories.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    by_id: HashMap<CategoryId, Category>,
    children: HashMap<CategoryId, Vec<CategoryId>>,
}

impl CategoryTree {
    /// Index a flat list of categories.
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        let mut children: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
        for category in &categories {
            if let Some(parent) = category.parent_id {
                children.entry(parent).or_default().push(category.id);
            }
        }
        let by_id: HashMap<_, _> = categories.into_iter().map(|c| (c.id, c)).collect();
        for ids in children.values_mut() {
            ids.sort_by(|a, b| sort_key(&by_id, a).cmp(&sort_key(&by_id, b)));
        }
        Self { by_id, children }
    }

    /// Top-level nodes: categories without a parent in this set.
    #[must_use]
    pub fn roots(&self) -> Vec<CategoryNode> {
        let mut roots: Vec<&Category> = self
            .by_id
            .values()
            .filter(|c| c.parent_id.is_none_or(|parent| !self.by_id.contains_key(&parent)))
            .collect();
        roots.sort_by(|a, b| (a.name.as_str(), a.id).cmp(&(b.name.as_str(), b.id)));
        let mut visited = HashSet::new();
        roots
            .into_iter()
            .filter_map(|root| self.node(root.id, &mut visited))
            .collect()
    }

    /// The subtree rooted at `id`, if present.
    #[must_use]
    pub fn subtree(&self, id: CategoryId) -> Option<CategoryNode> {
        self.node(id, &mut HashSet::new())
    }

    /// Every category strictly below `id`.
    #[must_use]
    pub fn descendants(&self, id: CategoryId) -> HashSet<CategoryId> {
        let mut found = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for child in self.children.get(&current).into_iter().flatten() {
                if *child != id && found.insert(*child) {
                    stack.push(*child);
                }
            }
        }
        found
    }

    /// Whether moving `id` under `new_parent` would create a cycle.
    #[must_use]
    pub fn would_cycle(&self, id: CategoryId, new_parent: CategoryId) -> bool {
        id == new_parent || self.descendants(id).contains(&new_parent)
    }

    fn node(&self, id: CategoryId, visited: &mut HashSet<CategoryId>) -> Option<CategoryNode> {
        if !visited.insert(id) {
            return None;
        }
        let category = self.by_id.get(&id)?.clone();
        let subcategories = self
            .children
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.node(*child, visited))
            .collect();
        Some(CategoryNode {
            category,
            subcategories,
        })
    }
}

fn sort_key<'a>(by_id: &'a HashMap<CategoryId, Category>, id: &CategoryId) -> (&'a str, CategoryId) {
    (by_id.get(id).map_or("", |c| c.name.as_str()), *id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn category(name: &str, parent: Option<CategoryId>, seller: SellerId) -> Category {
        let now = Utc::now();
        Category {
            id: CategoryId::random(),
            seller_id: seller,
            name: name.to_owned(),
            description: None,
            image: None,
            parent_id: parent,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    struct Fixture {
        tree: CategoryTree,
        furniture: CategoryId,
        chairs: CategoryId,
        stools: CategoryId,
        lighting: CategoryId,
    }

    #[fixture]
    fn catalogue() -> Fixture {
        let seller = SellerId::random();
        let furniture = category("Furniture", None, seller);
        let tables = category("Tables", Some(furniture.id), seller);
        let chairs = category("Chairs", Some(furniture.id), seller);
        let stools = category("Stools", Some(chairs.id), seller);
        let lighting = category("Lighting", None, seller);
        let ids = (furniture.id, chairs.id, stools.id, lighting.id);
        let tree = CategoryTree::new(vec![stools, tables, lighting, chairs, furniture]);
        Fixture {
            tree,
            furniture: ids.0,
            chairs: ids.1,
            stools: ids.2,
            lighting: ids.3,
        }
    }

    fn names(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.category.name.as_str()).collect()
    }

    #[rstest]
    fn roots_and_children_are_sorted_by_name(catalogue: Fixture) {
        let roots = catalogue.tree.roots();
        assert_eq!(names(&roots), vec!["Furniture", "Lighting"]);
        let furniture = roots.first().expect("furniture root");
        assert_eq!(names(&furniture.subcategories), vec!["Chairs", "Tables"]);
    }

    #[rstest]
    fn subtree_nests_grandchildren(catalogue: Fixture) {
        let chairs = catalogue.tree.subtree(catalogue.chairs).expect("chairs");
        assert_eq!(names(&chairs.subcategories), vec!["Stools"]);
        assert!(catalogue.tree.subtree(CategoryId::random()).is_none());
    }

    #[rstest]
    fn descendants_cover_whole_subtree(catalogue: Fixture) {
        let below = catalogue.tree.descendants(catalogue.furniture);
        assert_eq!(below.len(), 3);
        assert!(below.contains(&catalogue.stools));
        assert!(!below.contains(&catalogue.lighting));
    }

    #[rstest]
    fn reparenting_under_self_or_descendant_cycles(catalogue: Fixture) {
        assert!(catalogue.tree.would_cycle(catalogue.furniture, catalogue.furniture));
        assert!(catalogue.tree.would_cycle(catalogue.furniture, catalogue.stools));
        assert!(!catalogue.tree.would_cycle(catalogue.chairs, catalogue.lighting));
    }

    #[rstest]
    fn corrupt_cycles_do_not_recurse_forever() {
        let seller = SellerId::random();
        let mut a = category("A", None, seller);
        let b = category("B", Some(a.id), seller);
        a.parent_id = Some(b.id);
        let a_id = a.id;
        let tree = CategoryTree::new(vec![a, b]);

        assert!(tree.roots().is_empty());
        let node = tree.subtree(a_id).expect("a exists");
        assert_eq!(node.subcategories.len(), 1);
        assert!(node.subcategories.first().expect("b").subcategories.is_empty());
    }

    #[rstest]
    fn draft_defaults_to_active_and_requires_name() {
        let draft = CategoryDraft::try_new(Some("Sofas".to_owned()), None, None, None, None)
            .expect("valid draft");
        assert!(draft.is_active);
        let err = CategoryDraft::try_new(None, None, None, None, None).expect_err("no name");
        assert_eq!(err.field(), "name");
    }
}
