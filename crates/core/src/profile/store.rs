//! Profile storage.

use thiserror::Error;

use super::{DownloadProfile, ProfileConfig, ProfileId};

/// Error type for profile store operations.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// Backend failed to produce profiles.
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),
}

/// Source of download profiles.
///
/// An empty list is a valid answer, not an error.
pub trait ProfileStore: Send + Sync {
    /// List all profiles, enabled or not, in declaration order.
    fn list_profiles(&self) -> Result<Vec<DownloadProfile>, ProfileStoreError>;

    /// Get a single profile.
    fn get_profile(&self, id: ProfileId) -> Result<Option<DownloadProfile>, ProfileStoreError> {
        Ok(self.list_profiles()?.into_iter().find(|p| p.id == id))
    }
}

/// Profiles declared in the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigProfileStore {
    profiles: Vec<ProfileConfig>,
}

impl ConfigProfileStore {
    pub fn new(profiles: Vec<ProfileConfig>) -> Self {
        Self { profiles }
    }
}

impl ProfileStore for ConfigProfileStore {
    fn list_profiles(&self) -> Result<Vec<DownloadProfile>, ProfileStoreError> {
        Ok(self.profiles.iter().map(DownloadProfile::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id: ProfileId, name: &str, enabled: bool) -> ProfileConfig {
        ProfileConfig {
            id,
            name: name.to_string(),
            enabled,
            priority: 0,
            options: Default::default(),
            filters: Default::default(),
        }
    }

    #[test]
    fn test_list_keeps_declaration_order_and_disabled_profiles() {
        let store = ConfigProfileStore::new(vec![
            config(3, "c", true),
            config(1, "a", false),
            config(2, "b", true),
        ]);
        let profiles = store.list_profiles().unwrap();
        let ids: Vec<_> = profiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(!profiles[1].enabled);
    }

    #[test]
    fn test_get_profile() {
        let store = ConfigProfileStore::new(vec![config(1, "a", true)]);
        assert_eq!(store.get_profile(1).unwrap().unwrap().name, "a");
        assert!(store.get_profile(2).unwrap().is_none());
    }

    #[test]
    fn test_empty_store_is_not_an_error() {
        let store = ConfigProfileStore::default();
        assert!(store.list_profiles().unwrap().is_empty());
    }
}
