//! Identifier extraction from workshop item descriptions.
//!
//! Item descriptions are free text written by mod authors, so identifiers
//! are pulled out with a small ordered table of label rules rather than a
//! strict parser. Each [`LabelRule`] names the field it fills, how it scans
//! the text, and how a raw hit is cleaned up. Adding a new label spelling
//! means adding a row, not touching [`extract_with_rules`].
//!
//! Extraction is synchronous and pure: the same body and URL always yield
//! the same [`ExtractionResult`]. The `scraper` document is dropped before
//! returning, so callers in async code never hold it across an await.

use crate::error::{HarvestError, Result};
use crate::reference;
use regex::Regex;
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Selector for the description block of a workshop item page.
pub const DESCRIPTION_SELECTOR: &str = ".workshopItemDescription";

/// Label that introduces a workshop id on its own line.
const WORKSHOP_ID_LABEL: &str = "Workshop ID:";

/// `Mod ID`, `ModID` or `MID`, a colon, then a token that ends at any kind of
/// whitespace (including the Unicode space variants) or an angle bracket.
const MOD_ID_PATTERN: &str = r"(?i)(?:Mod ?ID|MID): *([^\r\n\t\x0C\x0B \u{00A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}<>]+)";

/// Comma-separated vehicle list. Only the first occurrence is used.
const VEHICLE_IDS_PATTERN: &str = r"Vehicle IDs: ([a-zA-Z0-9_, ]+)";

// ── Public types ─────────────────────────────────────────────────────────────

/// Identifiers collected from one or more descriptions, in order of
/// appearance. Repeated mentions are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub mod_ids: Vec<String>,
    pub workshop_ids: Vec<String>,
    pub vehicle_ids: Vec<String>,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.mod_ids.is_empty() && self.workshop_ids.is_empty() && self.vehicle_ids.is_empty()
    }

    /// Append a value to the list backing `field`.
    pub fn push(&mut self, field: Field, value: String) {
        match field {
            Field::ModId => self.mod_ids.push(value),
            Field::WorkshopId => self.workshop_ids.push(value),
            Field::VehicleId => self.vehicle_ids.push(value),
        }
    }

    /// Append every list of `other`, keeping order.
    pub fn extend(&mut self, other: ExtractionResult) {
        self.mod_ids.extend(other.mod_ids);
        self.workshop_ids.extend(other.workshop_ids);
        self.vehicle_ids.extend(other.vehicle_ids);
    }

    /// Lines for a server configuration file.
    ///
    /// `Mods=` and `WorkshopItems=` are always present; `VehicleIDs=` only
    /// when at least one vehicle id was collected.
    pub fn config_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Mods={}", self.mod_ids.join(";")),
            format!("WorkshopItems={}", self.workshop_ids.join(";")),
        ];
        if !self.vehicle_ids.is_empty() {
            lines.push(format!("VehicleIDs={}", self.vehicle_ids.join(";")));
        }
        lines
    }
}

/// Which identifier list a rule fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ModId,
    WorkshopId,
    VehicleId,
}

/// How a rule locates raw values in the description text.
#[derive(Debug)]
pub enum Scan {
    /// Every match contributes its first capture group.
    EveryMatch(Regex),
    /// Only the first match counts; its first capture is split on commas.
    FirstMatchList(Regex),
    /// Every line containing the label contributes the text after its last
    /// colon.
    LabelledLine(&'static str),
}

/// One row of the extraction rule table.
pub struct LabelRule {
    pub name: &'static str,
    pub field: Field,
    pub scan: Scan,
    /// Turns a raw hit into a stored value; `None` discards it.
    pub cleanup: fn(&str) -> Option<String>,
}

impl std::fmt::Debug for LabelRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelRule")
            .field("name", &self.name)
            .field("field", &self.field)
            .field("scan", &self.scan)
            .finish_non_exhaustive()
    }
}

impl LabelRule {
    /// Cleaned values this rule finds in `text`, in order of appearance.
    pub fn apply(&self, text: &str) -> Vec<String> {
        let raw: Vec<&str> = match &self.scan {
            Scan::EveryMatch(re) => re
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect(),
            Scan::FirstMatchList(re) => re
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().split(',').collect())
                .unwrap_or_default(),
            Scan::LabelledLine(label) => text
                .lines()
                .map(str::trim)
                .filter(|line| line.contains(label))
                .filter_map(|line| line.rsplit(':').next())
                .collect(),
        };

        raw.into_iter().filter_map(self.cleanup).collect()
    }
}

// ── Rule table ───────────────────────────────────────────────────────────────

/// The built-in rules, in the order they run.
pub fn default_rules() -> &'static [LabelRule] {
    static RULES: OnceLock<Vec<LabelRule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            LabelRule {
                name: "mod-id",
                field: Field::ModId,
                scan: Scan::EveryMatch(
                    Regex::new(MOD_ID_PATTERN).expect("mod id regex is valid"),
                ),
                cleanup: trimmed,
            },
            LabelRule {
                name: "vehicle-ids",
                field: Field::VehicleId,
                scan: Scan::FirstMatchList(
                    Regex::new(VEHICLE_IDS_PATTERN).expect("vehicle id regex is valid"),
                ),
                cleanup: without_workshop_label,
            },
            LabelRule {
                name: "workshop-id",
                field: Field::WorkshopId,
                scan: Scan::LabelledLine(WORKSHOP_ID_LABEL),
                cleanup: digits_only,
            },
        ]
    })
}

fn trimmed(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Descriptions sometimes run labels together ("car_aWorkshop ID"), so the
/// label text is cut out of each vehicle entry.
fn without_workshop_label(raw: &str) -> Option<String> {
    trimmed(&raw.replace("Workshop ID", ""))
}

fn digits_only(raw: &str) -> Option<String> {
    trimmed(raw).filter(|v| v.chars().all(|c| c.is_ascii_digit()))
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Extract identifiers from a fetched item page.
///
/// Returns [`HarvestError::DescriptionNotFound`] when the page has no
/// description block. When the description names no workshop id, the id is
/// taken from the `id` query parameter of `source_url`; if that is missing
/// or not numeric, the fallback is skipped with a warning.
pub fn extract(body: &str, source_url: &str) -> Result<ExtractionResult> {
    let description = description_text(body)
        .ok_or_else(|| HarvestError::DescriptionNotFound(source_url.to_string()))?;

    let mut result = extract_from_text(&description);

    if result.workshop_ids.is_empty() {
        match reference::item_id(source_url) {
            Ok(id) => result.workshop_ids.push(id),
            Err(e) => warn!(url = %source_url, error = %e, "no workshop id fallback"),
        }
    }

    if result.vehicle_ids.is_empty() {
        info!(
            url = %source_url,
            workshop_ids = %result.workshop_ids.join(", "),
            mod_ids = %result.mod_ids.join(", "),
            "collected identifiers"
        );
    } else {
        info!(
            url = %source_url,
            workshop_ids = %result.workshop_ids.join(", "),
            mod_ids = %result.mod_ids.join(", "),
            vehicle_ids = %result.vehicle_ids.join(";"),
            "collected identifiers"
        );
    }

    Ok(result)
}

/// Run the built-in rules over plain description text. No URL fallback.
pub fn extract_from_text(text: &str) -> ExtractionResult {
    extract_with_rules(text, default_rules())
}

/// Run `rules` in order over `text`.
pub fn extract_with_rules(text: &str, rules: &[LabelRule]) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    for rule in rules {
        for value in rule.apply(text) {
            result.push(rule.field, value);
        }
    }
    result
}

/// Text of the first description block, with `<br>` rendered as a newline.
pub fn description_text(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(DESCRIPTION_SELECTOR).ok()?;
    let element = document.select(&selector).next()?;

    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    Some(text)
}

// ── Tests ────────────────────────────────────────────────────────────────────
