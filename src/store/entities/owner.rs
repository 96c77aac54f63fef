use super::{entity_ref, FeatureRef, OrganizationRef, ScenarioRef, TeamRef};
use crate::models::Owner;

entity_ref!(
    /// An owner resolved against its catalog.
    OwnerRef,
    Owner,
    owners
);

impl<'a> OwnerRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Avatar URL, falling back to the unknown-avatar placeholder.
    pub fn avatar(&self) -> &'a str {
        self.data().avatar_or_default()
    }

    /// Member teams sorted by name. Names without a matching team are dropped.
    pub fn teams(&self) -> Vec<TeamRef<'a>> {
        let catalog = self.catalog;
        self.data()
            .teams
            .iter()
            .filter_map(|t| catalog.find_team(t))
            .collect()
    }

    pub fn first_team(&self) -> Option<TeamRef<'a>> {
        self.teams().into_iter().next()
    }

    pub fn organizations(&self) -> impl Iterator<Item = OrganizationRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .organizations()
            .filter(move |o| o.data().owner_name == name)
    }

    /// Scenarios whose organization resolves to an owner with this name.
    pub fn scenarios(&self) -> impl Iterator<Item = ScenarioRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .scenarios()
            .filter(move |s| s.organization_owner() == name)
    }

    /// Features with at least one scenario owned by this owner.
    pub fn features(&self) -> impl Iterator<Item = FeatureRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .features()
            .filter(move |f| f.scenarios().any(|s| s.organization_owner() == name))
    }
}
