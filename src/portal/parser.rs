//! Tank Page Parser
//!
//! Extracts [`TankRecord`]s from the portal's tank page.
//!
//! # Page Structure
//!
//! Each tank is rendered as a `div.tank-row` block:
//!
//! ```text
//! div.tank-row
//! ├── .text-larger          tank name
//! ├── .progress-bar         "72%"
//! └── free text runs        "Approximately 198 gallons"
//!                           "Reading Date: 01/12/2024"
//!                           "Last Delivery: 11/30/2023"
//! ```
//!
//! The free text runs have no stable markup of their own, so they are located
//! by their literal labels, scanning only the text nodes inside the block.
//!
//! # Error Handling
//!
//! Blocks are parsed independently. A block without a name is skipped; any
//! other unreadable field is reported as absent. Every problem becomes a
//! [`ParseWarning`] and is logged, the rest of the page is still processed.

use crate::error::ParseWarning;
use crate::portal::dates::to_iso;
use crate::portal::types::TankRecord;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

const GALLONS_LABEL: &str = "Approximately";
const READING_DATE_LABEL: &str = "Reading Date:";
const LAST_DELIVERY_LABEL: &str = "Last Delivery:";

static TANK_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.tank-row").expect("valid tank block selector"));
static TANK_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".text-larger").expect("valid tank name selector"));
static TANK_LEVEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".progress-bar").expect("valid tank level selector"));

/// Tanks parsed from one page together with the problems met on the way
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    pub tanks: Vec<TankRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// Parse every tank on the page, dropping the ones that cannot be named.
pub fn parse_tanks(html: &str) -> Vec<TankRecord> {
    parse_tanks_with_warnings(html).tanks
}

/// Parse every tank on the page and keep the per-block warnings.
pub fn parse_tanks_with_warnings(html: &str) -> ParseOutcome {
    let document = Html::parse_document(html);
    let mut outcome = ParseOutcome::default();

    for (block_index, block) in document.select(&TANK_BLOCK).enumerate() {
        match parse_block(block_index, block) {
            Ok((tank, warnings)) => {
                for warning in &warnings {
                    warn!("Failed to parse a tank field: {}", warning);
                }
                outcome.warnings.extend(warnings);
                outcome.tanks.push(tank);
            }
            Err(warning) => {
                warn!("Failed to parse a tank: {}", warning);
                outcome.warnings.push(warning);
            }
        }
    }

    debug!(
        "Parsed {} tanks with {} warnings",
        outcome.tanks.len(),
        outcome.warnings.len()
    );
    outcome
}

fn parse_block(
    block_index: usize,
    block: ElementRef<'_>,
) -> Result<(TankRecord, Vec<ParseWarning>), ParseWarning> {
    let name = block
        .select(&TANK_NAME)
        .next()
        .map(element_text)
        .filter(|name| !name.is_empty())
        .ok_or(ParseWarning::MissingName { block: block_index })?;

    let mut warnings = Vec::new();

    let percent = match block.select(&TANK_LEVEL).next().map(element_text) {
        Some(raw) => match parse_percent(&raw) {
            Some(percent) => Some(percent),
            None => {
                warnings.push(ParseWarning::InvalidPercent {
                    tank: name.clone(),
                    raw,
                });
                None
            }
        },
        None => None,
    };

    let gallons = match labelled_value(block, GALLONS_LABEL) {
        Some(raw) => match parse_gallons(&raw) {
            Some(gallons) => Some(gallons),
            None => {
                warnings.push(ParseWarning::InvalidGallons {
                    tank: name.clone(),
                    raw,
                });
                None
            }
        },
        None => None,
    };

    let reading_date = labelled_value(block, READING_DATE_LABEL).and_then(|raw| to_iso(&raw));
    let last_delivery = labelled_value(block, LAST_DELIVERY_LABEL).and_then(|raw| to_iso(&raw));

    let tank = TankRecord::new(name, percent, gallons, reading_date, last_delivery);
    Ok((tank, warnings))
}

/// Whitespace-trimmed text runs of an element joined by single spaces
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text following `label` in the first text node that contains it.
///
/// A label that ends its node only takes a value from a paired definition
/// (`<dt>Reading Date:</dt><dd>01/12/2024</dd>`); any other following text
/// belongs to something else and the field is absent.
fn labelled_value(block: ElementRef<'_>, label: &str) -> Option<String> {
    let node = block.descendants().find(|node| {
        node.value()
            .as_text()
            .is_some_and(|text| text.contains(label))
    })?;

    let rest = node
        .value()
        .as_text()
        .and_then(|text| text.split_once(label))
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default();
    if !rest.is_empty() {
        return Some(rest.to_string());
    }

    let label_element = node.parent().and_then(ElementRef::wrap)?;
    if label_element.value().name() != "dt" {
        return None;
    }
    label_element
        .next_siblings()
        .find_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == "dd")
        .map(element_text)
        .filter(|value| !value.is_empty())
}

fn parse_percent(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().trim_end_matches('%').trim().parse().ok()?;
    (value.is_finite() && (0.0..=100.0).contains(&value)).then_some(value)
}

// "198 gallons" or "1,250 gal": first token, thousands separators dropped
fn parse_gallons(raw: &str) -> Option<f64> {
    let token = raw.split_whitespace().next()?.replace(',', "");
    let value: f64 = token.parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}
