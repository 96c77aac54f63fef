use super::{entity_ref, OwnerRef, ScenarioRef, TeamRef};
use crate::models::{organization_slug, Organization};

entity_ref!(
    /// An organization resolved against its catalog.
    OrganizationRef,
    Organization,
    organizations
);

impl<'a> OrganizationRef<'a> {
    pub fn owner(&self) -> Option<OwnerRef<'a>> {
        self.catalog.find_owner(&self.data().owner_name)
    }

    pub fn team(&self) -> Option<TeamRef<'a>> {
        self.catalog.find_team(&self.data().team_name)
    }

    /// Scenarios whose `organization_name` resolves to this organization.
    pub fn scenarios(&self) -> impl Iterator<Item = ScenarioRef<'a>> + 'a {
        let catalog = self.catalog;
        let owns_name = catalog.find_organization_by_name(&self.data().name) == Some(*self);
        let indexes: &[usize] = if owns_name {
            catalog.scenario_indexes_for_organization(&self.data().name)
        } else {
            &[]
        };

        indexes.iter().map(move |&i| ScenarioRef::new(catalog, i))
    }

    pub fn slug(&self) -> String {
        organization_slug(&self.data().id, &self.data().name)
    }

    pub fn users_count(&self) -> usize {
        self.data().users.len()
    }
}
