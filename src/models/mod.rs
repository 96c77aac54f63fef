//! Entity data for the test catalog.
//!
//! # Core Concepts
//!
//! - [`Feature`]: A test file grouping scenarios.
//! - [`Scenario`]: One executable test case, belonging to a feature and an organization.
//! - [`Organization`]: A tenant the scenarios run against, owned by a person and assigned to a team.
//! - [`Owner`]: A person owning organizations, member of one or more teams.
//! - [`Team`]: A group of owners.
//! - [`StepDefinition`]: A step implementation scenarios can call, found in the
//!   repository's step-definition sources. Not part of the catalog snapshot.
//!
//! These types are plain immutable data. Relationships between them are held as
//! ids and names only and are resolved through the catalog
//! (see [`crate::store::Catalog`]).

mod clone;
mod feature;
mod organization;
mod owner;
mod scenario;
mod step;
mod target;
mod team;

pub use clone::*;
pub use feature::*;
pub use organization::*;
pub use owner::*;
pub use scenario::*;
pub use step::*;
pub use target::*;
pub use team::*;
