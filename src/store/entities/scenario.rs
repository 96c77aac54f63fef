use std::collections::BTreeMap;

use super::{entity_ref, FeatureRef, OrganizationRef};
use crate::command;
use crate::models::{dedup_first_seen, organization_slug, Scenario, Target};

static NO_USERS: BTreeMap<String, String> = BTreeMap::new();

entity_ref!(
    /// A scenario resolved against its catalog.
    ScenarioRef,
    Scenario,
    scenarios
);

impl<'a> ScenarioRef<'a> {
    /// The feature whose id equals `feature_id`.
    pub fn feature(&self) -> Option<FeatureRef<'a>> {
        self.catalog.find_feature(&self.data().feature_id)
    }

    pub fn feature_name(&self) -> &'a str {
        self.feature().map_or("", |f| f.data().name.as_str())
    }

    pub fn feature_file_path(&self) -> &'a str {
        self.feature().map_or("", |f| f.data().file_path.as_str())
    }

    /// The organization whose name equals `organization_name`.
    pub fn organization(&self) -> Option<OrganizationRef<'a>> {
        self.catalog
            .find_organization_by_name(&self.data().organization_name)
    }

    pub fn organization_id(&self) -> &'a str {
        self.organization().map_or("", |o| o.data().id.as_str())
    }

    /// Slug built from the resolved organization id and this scenario's own
    /// `organization_name`.
    pub fn organization_slug(&self) -> String {
        organization_slug(self.organization_id(), &self.data().organization_name)
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

    /// Tags of the parent feature.
    pub fn parent_tags(&self) -> &'a [String] {
        self.feature()
            .map(|f| f.data().tags.as_slice())
            .unwrap_or_default()
    }

    /// Own tags followed by the parent feature's tags. Duplicates are kept.
    pub fn all_tags(&self) -> Vec<String> {
        self.data()
            .tags
            .iter()
            .chain(self.parent_tags())
            .cloned()
            .collect()
    }

    /// True when any own or parent tag contains `broken`.
    pub fn is_broken(&self) -> bool {
        self.data()
            .tags
            .iter()
            .chain(self.parent_tags())
            .any(|t| t.contains("broken"))
    }

    pub fn parsed_targets(&self) -> &'a [Target] {
        &self.data().parsed_targets
    }

    /// Every flag across all targets, deduplicated in first-seen order.
    pub fn flags(&self) -> Vec<String> {
        dedup_first_seen(self.parsed_targets().iter().flat_map(Target::flags))
    }

    /// Every mock date across all targets, deduplicated in first-seen order.
    pub fn mock_dates(&self) -> Vec<String> {
        dedup_first_seen(self.parsed_targets().iter().flat_map(Target::dates))
    }

    pub fn command_max_len(&self) -> usize {
        command::command_max_len(
            &self.organization_slug(),
            self.organization_users().keys().map(String::as_str),
            self.parsed_targets(),
        )
    }
}
