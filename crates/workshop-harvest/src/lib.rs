//! Workshop Harvest — collect mod, workshop and vehicle IDs from Steam Workshop pages.
//!
//! The pipeline fetches each item page, finds its description block and runs
//! a table of tolerant label rules over the free text. Collection (modpack)
//! pages are expanded into their child items first. Results are aggregated
//! in processing order and can be rendered as server config lines.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod harvester;
pub mod modpack;
pub mod reference;

pub use config::HarvestConfig;
pub use error::{HarvestError, Result};
pub use extract::{extract, extract_from_text, ExtractionResult, Field, LabelRule, Scan};
pub use fetcher::{FetchResult, PageFetcher};
pub use harvester::{CancellationFlag, HarvestReport, Harvester};
pub use reference::ReferenceList;
