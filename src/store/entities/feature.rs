use std::collections::BTreeMap;

use super::{entity_ref, OrganizationRef, ScenarioRef};
use crate::models::{dedup_first_seen, has_broken_tag, organization_slug, Feature, Target};

static NO_USERS: BTreeMap<String, String> = BTreeMap::new();

entity_ref!(
    /// A feature resolved against its catalog.
    FeatureRef,
    Feature,
    features
);

impl<'a> FeatureRef<'a> {
    /// Scenarios whose `feature_id` resolves to this feature, in catalog order.
    pub fn scenarios(&self) -> impl Iterator<Item = ScenarioRef<'a>> + 'a {
        let catalog = self.catalog;
        let owns_id = catalog.find_feature(&self.data().id) == Some(*self);
        let indexes: &[usize] = if owns_id {
            catalog.scenario_indexes_for_feature(&self.data().id)
        } else {
            &[]
        };

        indexes.iter().map(move |&i| ScenarioRef::new(catalog, i))
    }

    /// The organization of the first scenario. A feature whose scenarios span
    /// several organizations only reports the first one.
    pub fn organization(&self) -> Option<OrganizationRef<'a>> {
        self.scenarios().next().and_then(|s| s.organization())
    }

    pub fn organization_id(&self) -> &'a str {
        self.organization().map_or("", |o| o.data().id.as_str())
    }

    pub fn organization_name(&self) -> &'a str {
        self.organization().map_or("", |o| o.data().name.as_str())
    }

    pub fn organization_slug(&self) -> String {
        organization_slug(self.organization_id(), self.organization_name())
    }

    pub fn organization_owner(&self) -> &'a str {
        self.organization()
            .and_then(|o| o.owner())
            .map_or("", |owner| owner.data().name.as_str())
    }

    pub fn organization_owner_avatar(&self) -> &'a str {
        self.organization()
            .and_then(|o| o.owner())
            .map_or("", |owner| owner.avatar())
    }

    pub fn organization_team(&self) -> &'a str {
        self.organization()
            .and_then(|o| o.team())
            .map_or("", |team| team.data().name.as_str())
    }

    pub fn organization_users(&self) -> &'a BTreeMap<String, String> {
        self.organization().map_or(&NO_USERS, |o| &o.data().users)
    }

    pub fn organization_users_count(&self) -> usize {
        self.organization_users().len()
    }

    /// Raw targets of all scenarios, deduplicated in first-seen order.
    pub fn targets(&self) -> Vec<String> {
        dedup_first_seen(
            self.scenarios()
                .flat_map(|s| s.data().targets.iter().map(String::as_str)),
        )
    }

    /// Union of the scenarios' flags, deduplicated in first-seen order.
    pub fn flags(&self) -> Vec<String> {
        dedup_first_seen(
            self.scenarios()
                .flat_map(|s| s.parsed_targets().iter().flat_map(Target::flags)),
        )
    }

    /// Union of the scenarios' mock dates, deduplicated in first-seen order.
    pub fn mock_dates(&self) -> Vec<String> {
        dedup_first_seen(
            self.scenarios()
                .flat_map(|s| s.parsed_targets().iter().flat_map(Target::dates)),
        )
    }

    /// Widest command preview among the scenarios, `None` without scenarios.
    pub fn command_max_len(&self) -> Option<usize> {
        self.scenarios().map(|s| s.command_max_len()).max()
    }

    /// True when any of the feature's own tags contains `broken`.
    pub fn is_broken(&self) -> bool {
        has_broken_tag(&self.data().tags)
    }
}
