use super::{entity_ref, FeatureRef, OrganizationRef, OwnerRef, ScenarioRef};
use crate::models::Team;

entity_ref!(
    /// A team resolved against its catalog.
    TeamRef,
    Team,
    teams
);

impl<'a> TeamRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Owners listing this team among theirs.
    pub fn members(&self) -> impl Iterator<Item = OwnerRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .owners()
            .filter(move |o| o.data().is_in_team(name))
    }

    pub fn organizations(&self) -> impl Iterator<Item = OrganizationRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .organizations()
            .filter(move |o| o.data().team_name == name)
    }

    pub fn scenarios(&self) -> impl Iterator<Item = ScenarioRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .scenarios()
            .filter(move |s| s.organization_team() == name)
    }

    pub fn features(&self) -> impl Iterator<Item = FeatureRef<'a>> + 'a {
        let name = self.name();
        self.catalog
            .features()
            .filter(move |f| f.scenarios().any(|s| s.organization_team() == name))
    }
}
