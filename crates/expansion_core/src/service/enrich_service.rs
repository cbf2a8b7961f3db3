//! Acquisition-year enrichment.
//!
//! # Responsibility
//! - Attach a `year` property to every feature from its `abbr` property.
//!
//! # Invariants
//! - Every feature is visited exactly once, in collection order.
//! - Features are never dropped or reordered.
//! - `year` is always written: an integer on match, `null` otherwise.
//! - A pre-existing `year` value is overwritten.

use crate::acquisition::AcquisitionTable;
use crate::model::feature::{Feature, FeatureCollection};
use log::{debug, info};
use serde_json::Value;

/// Property read to identify a feature's state.
pub const ABBR_PROPERTY: &str = "abbr";
/// Property written with the resolved acquisition year.
pub const YEAR_PROPERTY: &str = "year";

/// Writes the acquisition year of every feature into its properties.
///
/// A missing or non-string `abbr` is treated as the empty abbreviation, which
/// never matches and yields `"year": null`.
pub fn enrich_with_years(collection: &mut FeatureCollection, table: &AcquisitionTable) {
    let mut matched = 0usize;
    for feature in &mut collection.features {
        if assign_year(feature, table).is_some() {
            matched += 1;
        }
    }

    info!(
        "event=enrich module=service status=ok features={} matched={} unmatched={}",
        collection.len(),
        matched,
        collection.len() - matched
    );
}

/// Resolves and writes the year for one feature, returning the year written.
pub fn assign_year(feature: &mut Feature, table: &AcquisitionTable) -> Option<i32> {
    let abbr = feature.property_str(ABBR_PROPERTY).unwrap_or_default();
    let year = table.year_for(abbr);

    if year.is_some() {
        let candidates = table.years_for(abbr);
        if candidates.len() > 1 {
            debug!(
                "event=enrich_overlap module=service abbr={} candidates={:?} resolved={}",
                abbr,
                candidates,
                candidates[0]
            );
        }
    }

    let value = year.map_or(Value::Null, Value::from);
    feature.set_property(YEAR_PROPERTY, value);
    year
}
