//! Priority-ordered profile matching.

use crate::media::MediaAsset;

use super::{DownloadProfile, ProfileId};

/// Picks the single best profile for a media item.
///
/// Profiles are held in descending priority order. The sort is stable, so
/// profiles with equal priority keep their declaration order.
#[derive(Debug, Clone)]
pub struct ProfileMatcher {
    profiles: Vec<DownloadProfile>,
}

impl ProfileMatcher {
    /// Build a matcher, sorting the profiles by priority (highest first).
    pub fn new(mut profiles: Vec<DownloadProfile>) -> Self {
        profiles.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { profiles }
    }

    /// Profiles in match order.
    pub fn profiles(&self) -> &[DownloadProfile] {
        &self.profiles
    }

    /// Look up a profile by id.
    pub fn get(&self, id: ProfileId) -> Option<&DownloadProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Returns the id of the first enabled profile whose filter matches.
    pub fn match_profile(&self, media: &MediaAsset) -> Option<ProfileId> {
        self.profiles
            .iter()
            .filter(|p| p.enabled)
            .find(|p| p.filter.matches(media))
            .map(|p| p.id)
    }
}
