//! Remote library types.

use serde::{Deserialize, Serialize};

/// External identifier namespace used in library guids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidNamespace {
    /// The Movie Database, used for movies.
    Tmdb,
    /// TheTVDB, used for series.
    Tvdb,
}

impl GuidNamespace {
    /// Pick the namespace for a media kind.
    ///
    /// When the kind is unknown, a six-digit identifier is taken to be a
    /// movie id.
    pub fn for_media(external_id: &str, is_movie: Option<bool>) -> Self {
        match is_movie {
            Some(true) => GuidNamespace::Tmdb,
            Some(false) => GuidNamespace::Tvdb,
            None if external_id.len() == 6 => GuidNamespace::Tmdb,
            None => GuidNamespace::Tvdb,
        }
    }

    /// Guid scheme prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            GuidNamespace::Tmdb => "tmdb",
            GuidNamespace::Tvdb => "tvdb",
        }
    }

    /// The other namespace.
    pub fn alternate(self) -> Self {
        match self {
            GuidNamespace::Tmdb => GuidNamespace::Tvdb,
            GuidNamespace::Tvdb => GuidNamespace::Tmdb,
        }
    }

    /// Full guid for an identifier, e.g. `tmdb://603`.
    pub fn guid(self, external_id: &str) -> String {
        format!("{}://{}", self.prefix(), external_id)
    }
}

/// An item (movie or show) in the remote library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    /// Library-specific key used to address the item.
    pub key: String,
    pub title: String,
}

/// An auxiliary video attached to a library item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryExtra {
    pub title: Option<String>,
    /// Item type, e.g. "clip".
    pub kind: Option<String>,
    /// Item subtype, e.g. "trailer", "featurette".
    pub subtype: Option<String>,
}

impl LibraryExtra {
    /// A trailer is a `clip` whose subtype is `trailer`. Both must match.
    pub fn is_trailer(&self) -> bool {
        self.kind.as_deref() == Some("clip") && self.subtype.as_deref() == Some("trailer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(kind: Option<&str>, subtype: Option<&str>) -> LibraryExtra {
        LibraryExtra {
            title: None,
            kind: kind.map(String::from),
            subtype: subtype.map(String::from),
        }
    }

    #[test]
    fn test_namespace_from_media_kind() {
        assert_eq!(GuidNamespace::for_media("123", Some(true)), GuidNamespace::Tmdb);
        assert_eq!(GuidNamespace::for_media("123456", Some(false)), GuidNamespace::Tvdb);
    }

    #[test]
    fn test_namespace_length_heuristic_when_kind_unknown() {
        assert_eq!(GuidNamespace::for_media("603692", None), GuidNamespace::Tmdb);
        assert_eq!(GuidNamespace::for_media("81189", None), GuidNamespace::Tvdb);
    }

    #[test]
    fn test_guid_and_alternate() {
        assert_eq!(GuidNamespace::Tmdb.guid("42"), "tmdb://42");
        assert_eq!(GuidNamespace::Tmdb.alternate(), GuidNamespace::Tvdb);
        assert_eq!(GuidNamespace::Tvdb.alternate().guid("42"), "tmdb://42");
    }

    #[test]
    fn test_trailer_requires_both_fields() {
        assert!(extra(Some("clip"), Some("trailer")).is_trailer());
        assert!(!extra(Some("clip"), Some("featurette")).is_trailer());
        assert!(!extra(Some("trailer"), None).is_trailer());
        assert!(!extra(None, Some("trailer")).is_trailer());
    }
}
