//! Borrowed entity handles.
//!
//! A handle is a back-reference to the owning [`Catalog`](crate::store::Catalog) plus the position of
//! its entity in the matching collection. Relationship accessors resolve
//! foreign keys through the catalog on every call; nothing is cached on the
//! handle. An unresolved key yields `None`, an empty string or an empty list.
//!
//! Handles compare equal when they point at the same slot of the same catalog.

mod feature;
mod organization;
mod owner;
mod scenario;
mod team;

pub use feature::FeatureRef;
pub use organization::OrganizationRef;
pub use owner::OwnerRef;
pub use scenario::ScenarioRef;
pub use team::TeamRef;

macro_rules! entity_ref {
    ($(#[$meta:meta])* $name:ident, $model:ty, $collection:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy)]
        pub struct $name<'a> {
            catalog: &'a $crate::store::Catalog,
            index: usize,
        }

        impl<'a> $name<'a> {
            pub(in crate::store) fn new(catalog: &'a $crate::store::Catalog, index: usize) -> Self {
                Self { catalog, index }
            }

            /// The entity data, borrowed for the lifetime of the catalog.
            pub fn data(&self) -> &'a $model {
                &self.catalog.$collection[self.index]
            }

            pub fn catalog(&self) -> &'a $crate::store::Catalog {
                self.catalog
            }
        }

        impl std::ops::Deref for $name<'_> {
            type Target = $model;

            fn deref(&self) -> &Self::Target {
                self.data()
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.catalog, other.catalog) && self.index == other.index
            }
        }

        impl Eq for $name<'_> {}

        impl std::fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(self.data(), f)
            }
        }
    };
}

pub(crate) use entity_ref;
