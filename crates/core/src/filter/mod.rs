//! Media filter predicates.
//!
//! Profiles decide which media they apply to through a [`MediaFilter`].
//! Filters are normally built from a declarative [`FilterSet`] read from
//! configuration, but any `Fn(&MediaAsset) -> bool` closure works too.

mod condition;

pub use condition::{FilterCondition, FilterField, FilterOp};

use serde::{Deserialize, Serialize};

use crate::media::MediaAsset;

/// A pure boolean predicate over a media item.
pub trait MediaFilter: Send + Sync {
    /// Returns `true` if the media item matches.
    fn matches(&self, media: &MediaAsset) -> bool;
}

impl<F> MediaFilter for F
where
    F: Fn(&MediaAsset) -> bool + Send + Sync,
{
    fn matches(&self, media: &MediaAsset) -> bool {
        self(media)
    }
}

/// A conjunction of filter conditions.
///
/// An empty set matches every media item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    conditions: Vec<FilterCondition>,
}

impl FilterSet {
    /// Create a filter set from conditions.
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self { conditions }
    }

    /// The conditions in this set.
    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }
}

impl MediaFilter for FilterSet {
    fn matches(&self, media: &MediaAsset) -> bool {
        self.conditions.iter().all(|c| c.evaluate(media))
    }
}
