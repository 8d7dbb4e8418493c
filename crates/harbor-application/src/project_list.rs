//! Merged project list and its filtered projection.
//!
//! Registered entries always come first, discovered entries second, each in
//! the order its source returned. Filtering never mutates the lists.

use harbor_core::project::Project;
use serde::Serialize;

/// The two project sources, kept as separate groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectList {
    registered: Vec<Project>,
    discovered: Vec<Project>,
}

impl ProjectList {
    pub fn new(registered: Vec<Project>, discovered: Vec<Project>) -> Self {
        Self {
            registered,
            discovered,
        }
    }

    pub fn registered(&self) -> &[Project] {
        &self.registered
    }

    pub fn discovered(&self) -> &[Project] {
        &self.discovered
    }

    pub fn len(&self) -> usize {
        self.registered.len() + self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All projects in presentation order: registered, then discovered.
    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.registered.iter().chain(self.discovered.iter())
    }

    /// Looks a project up by its external id.
    pub fn find(&self, project_id: &str) -> Option<&Project> {
        self.iter().find(|p| p.id == project_id)
    }

    /// Applies a text filter to each group independently.
    ///
    /// An empty or all-whitespace query returns every project.
    pub fn filter(&self, query: &str) -> FilteredProjects<'_> {
        filter_groups(&self.registered, &self.discovered, query)
    }
}

fn filter_groups<'a>(
    registered: &'a [Project],
    discovered: &'a [Project],
    query: &str,
) -> FilteredProjects<'a> {
    let needle = normalize_query(query);
    let keep = |p: &&Project| needle.as_deref().is_none_or(|n| p.matches(n));
    FilteredProjects {
        registered: registered.iter().filter(keep).collect(),
        discovered: discovered.iter().filter(keep).collect(),
    }
}

fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Borrowed, filtered view of a [`ProjectList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredProjects<'a> {
    pub registered: Vec<&'a Project>,
    pub discovered: Vec<&'a Project>,
}

impl<'a> FilteredProjects<'a> {
    pub fn len(&self) -> usize {
        self.registered.len() + self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens both groups into presentation order.
    pub fn flatten(&self) -> Vec<&'a Project> {
        self.registered
            .iter()
            .chain(self.discovered.iter())
            .copied()
            .collect()
    }
}
