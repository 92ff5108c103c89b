//! Item references: validation of operator input and item-id helpers.

use crate::error::{HarvestError, Result};
use url::Url;

/// Ordered, duplicate-free list of item references accepted for a run.
#[derive(Debug, Clone)]
pub struct ReferenceList {
    host_prefix: String,
    urls: Vec<String>,
}

impl ReferenceList {
    pub fn new(host_prefix: impl Into<String>) -> Self {
        Self {
            host_prefix: host_prefix.into(),
            urls: Vec::new(),
        }
    }

    /// Validate and append one reference.
    ///
    /// Rejects empty input, references already in the list and references
    /// outside the configured host. Surrounding whitespace is ignored.
    pub fn push(&mut self, input: &str) -> Result<&str> {
        let url = input.trim();
        if url.is_empty() {
            return Err(HarvestError::EmptyReference);
        }
        if !url.starts_with(&self.host_prefix) {
            return Err(HarvestError::ForeignHost {
                url: url.to_string(),
                prefix: self.host_prefix.clone(),
            });
        }
        if self.urls.iter().any(|u| u == url) {
            return Err(HarvestError::DuplicateReference(url.to_string()));
        }
        self.urls.push(url.to_string());
        Ok(&self.urls[self.urls.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.urls
    }
}

/// Numeric item id carried by the `id` query parameter of a workshop URL.
pub fn item_id(url: &str) -> Result<String> {
    let missing = || HarvestError::MissingItemId(url.to_string());
    let parsed = Url::parse(url).map_err(|_| missing())?;
    let id = parsed
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.trim().to_string())
        .ok_or_else(missing)?;

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(missing());
    }
    Ok(id)
}

/// Canonical single-item URL for `id`.
pub fn item_url(base: &str, id: &str) -> String {
    format!("{base}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "https://steamcommunity.com/";

    #[test]
    fn test_push_accepts_workshop_urls_in_order() {
        let mut list = ReferenceList::new(PREFIX);
        list.push("https://steamcommunity.com/sharedfiles/filedetails/?id=1")
            .unwrap();
        list.push("  https://steamcommunity.com/sharedfiles/filedetails/?id=2  ")
            .unwrap();
        assert_eq!(
            list.as_slice(),
            &[
                "https://steamcommunity.com/sharedfiles/filedetails/?id=1".to_string(),
                "https://steamcommunity.com/sharedfiles/filedetails/?id=2".to_string(),
            ]
        );
    }

    #[test]
    fn test_push_rejects_empty() {
        let mut list = ReferenceList::new(PREFIX);
        assert!(matches!(list.push("   "), Err(HarvestError::EmptyReference)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut list = ReferenceList::new(PREFIX);
        let url = "https://steamcommunity.com/sharedfiles/filedetails/?id=7";
        list.push(url).unwrap();
        assert!(matches!(
            list.push(url),
            Err(HarvestError::DuplicateReference(u)) if u == url
        ));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_push_rejects_foreign_host() {
        let mut list = ReferenceList::new(PREFIX);
        assert!(matches!(
            list.push("https://example.com/?id=1"),
            Err(HarvestError::ForeignHost { .. })
        ));
    }

    #[test]
    fn test_item_id_stops_at_next_parameter() {
        let id = item_id("https://steamcommunity.com/sharedfiles/filedetails/?id=999&foo=bar");
        assert_eq!(id.unwrap(), "999");
    }

    #[test]
    fn test_item_id_missing_or_malformed() {
        assert!(item_id("https://steamcommunity.com/sharedfiles/filedetails/").is_err());
        assert!(item_id("https://steamcommunity.com/sharedfiles/filedetails/?id=").is_err());
        assert!(item_id("https://steamcommunity.com/sharedfiles/filedetails/?id=12ab").is_err());
        assert!(item_id("not a url").is_err());
    }

    #[test]
    fn test_item_url() {
        assert_eq!(
            item_url(crate::config::DEFAULT_ITEM_URL_BASE, "111"),
            "https://steamcommunity.com/sharedfiles/filedetails/?id=111"
        );
    }
}
