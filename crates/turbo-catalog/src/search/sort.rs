//! Sort options for collection results.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Field the results are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Sort by product name.
    #[default]
    Title,
    /// Sort by price.
    Price,
}

/// Sort direction, serialized the way the commerce API expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// The single active sort of a collection view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// URL form, e.g. `price-desc`.
    pub fn as_param(&self) -> String {
        let key = match self.key {
            SortKey::Title => "title",
            SortKey::Price => "price",
        };
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        format!("{}-{}", key, direction)
    }

    pub fn display_name(&self) -> &'static str {
        match (self.key, self.direction) {
            (SortKey::Title, SortDirection::Asc) => "Name: A-Z",
            (SortKey::Title, SortDirection::Desc) => "Name: Z-A",
            (SortKey::Price, SortDirection::Asc) => "Price: Low to High",
            (SortKey::Price, SortDirection::Desc) => "Price: High to Low",
        }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_param())
    }
}

impl FromStr for SortState {
    type Err = CatalogError;

    /// Parse `key[-direction]`; a missing direction means ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (key, direction) = match lowered.split_once('-') {
            Some((key, direction)) => (key, Some(direction)),
            None => (lowered.as_str(), None),
        };

        let key = match key {
            "title" | "name" => SortKey::Title,
            "price" => SortKey::Price,
            _ => return Err(CatalogError::InvalidSort(s.to_string())),
        };
        let direction = match direction {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return Err(CatalogError::InvalidSort(s.to_string())),
        };

        Ok(Self { key, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sort() {
        let sort = SortState::default();
        assert_eq!(sort.key, SortKey::Title);
        assert_eq!(sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_param_round_trip() {
        let sort = SortState::new(SortKey::Price, SortDirection::Desc);
        assert_eq!(sort.as_param(), "price-desc");
        assert_eq!("price-desc".parse::<SortState>().unwrap(), sort);
    }

    #[test]
    fn test_parse_lenient_forms() {
        assert_eq!(
            "PRICE".parse::<SortState>().unwrap(),
            SortState::new(SortKey::Price, SortDirection::Asc)
        );
        assert_eq!(
            "name-desc".parse::<SortState>().unwrap(),
            SortState::new(SortKey::Title, SortDirection::Desc)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "rating".parse::<SortState>(),
            Err(CatalogError::InvalidSort(_))
        ));
        assert!("price-up".parse::<SortState>().is_err());
    }

    #[test]
    fn test_direction_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&SortDirection::Desc).unwrap(), "\"DESC\"");
    }
}
