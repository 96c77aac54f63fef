//! Split organizations into templates and clones from clone-detector output.

use std::collections::HashSet;

use crate::models::CloneGroup;
use crate::store::{Catalog, OrganizationRef};

/// Organizations split by whether a clone group lists them as a clone.
#[derive(Debug)]
pub struct OrganizationPartition<'a> {
    /// Organizations that appear in no clone group as a clone, catalog order.
    pub templates: Vec<OrganizationRef<'a>>,
    pub clones: Vec<OrganizationRef<'a>>,
}

/// `(id, name)` pairs in catalog order, the clone detector's input.
pub fn detector_input(catalog: &Catalog) -> Vec<(String, String)> {
    catalog
        .organizations()
        .map(|o| (o.id.clone(), o.name.clone()))
        .collect()
}

pub fn partition<'a>(catalog: &'a Catalog, groups: &[CloneGroup]) -> OrganizationPartition<'a> {
    let clone_ids: HashSet<&str> = groups
        .iter()
        .flat_map(|g| g.clones.iter().map(|c| c.org_id.as_str()))
        .collect();

    let (clones, templates) = catalog
        .organizations()
        .partition(|o| clone_ids.contains(o.data().id.as_str()));

    OrganizationPartition { templates, clones }
}
