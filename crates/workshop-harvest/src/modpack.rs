//! Modpack expansion: turn a collection page into its child item URLs.
//!
//! A page counts as a modpack only when it lists children whose `id`
//! attribute starts with `sharedfile_`. URL shape says nothing here, since
//! single items and collections share the same `?id=` form.

use crate::fetcher::PageFetcher;
use crate::reference;
use scraper::{Html, Selector};

/// Attribute-prefix selector for collection children.
pub const CHILD_SELECTOR: &str = r#"[id^="sharedfile_"]"#;

/// Prefix stripped from a child's `id` attribute to get its item id.
pub const CHILD_ID_PREFIX: &str = "sharedfile_";

/// Raw item ids of every collection child, in document order.
pub fn child_item_ids(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let selector = match Selector::parse(CHILD_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| el.value().attr("id"))
        .filter_map(|id| id.strip_prefix(CHILD_ID_PREFIX))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical item URLs for every collection child of an already fetched page.
pub fn expand_document(body: &str, item_url_base: &str) -> Vec<String> {
    child_item_ids(body)
        .iter()
        .map(|id| reference::item_url(item_url_base, id))
        .collect()
}

/// Fetch `url` and expand it into child item URLs.
///
/// A failed fetch yields an empty list; the fetcher has already logged it.
pub async fn expand(fetcher: &PageFetcher, url: &str, item_url_base: &str) -> Vec<String> {
    match fetcher.fetch(url).await.into_body(url) {
        Ok(body) => expand_document(&body, item_url_base),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ITEM_URL_BASE;

    const COLLECTION: &str = r##"<html><body>
        <div class="collectionChildren">
            <div id="sharedfile_111" class="collectionItem"><a href="#">A</a></div>
            <div id="sharedfile_222" class="collectionItem"><a href="#">B</a></div>
            <div id="sharedfile_333" class="collectionItem"><a href="#">C</a></div>
        </div>
        </body></html>"##;

    #[test]
    fn test_expand_document_in_order() {
        assert_eq!(
            expand_document(COLLECTION, DEFAULT_ITEM_URL_BASE),
            vec![
                "https://steamcommunity.com/sharedfiles/filedetails/?id=111",
                "https://steamcommunity.com/sharedfiles/filedetails/?id=222",
                "https://steamcommunity.com/sharedfiles/filedetails/?id=333",
            ]
        );
    }

    #[test]
    fn test_item_page_has_no_children() {
        let html = r#"<html><body>
            <div class="workshopItemDescription">Mod ID: x</div>
            <div id="sharedfile_">empty prefix only</div>
            <div id="other_444"></div>
            </body></html>"#;
        assert!(child_item_ids(html).is_empty());
    }

    #[test]
    fn test_child_links_are_not_items() {
        let ids = child_item_ids(COLLECTION);
        assert_eq!(ids, vec!["111", "222", "333"]);
        assert!(COLLECTION.contains(r##"<a href="#">"##));
    }

    #[test]
    fn test_custom_item_base() {
        let urls = expand_document(COLLECTION, "http://127.0.0.1:9000/item?id=");
        assert_eq!(urls[0], "http://127.0.0.1:9000/item?id=111");
    }
}
