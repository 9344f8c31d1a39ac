use std::collections::HashSet;

use crate::document::DocumentDescriptor;

/// Merges per-source descriptor lists into one result.
///
/// `sources` must be in priority order: when two descriptors share a name
/// the one from the earlier source is kept. The result is ordered newest
/// first; descriptors with the same date keep their merge order.
pub fn aggregate(sources: Vec<Vec<DocumentDescriptor>>) -> Vec<DocumentDescriptor> {
    let mut seen = HashSet::new();
    let mut merged: Vec<DocumentDescriptor> = sources
        .into_iter()
        .flatten()
        .filter(|d| seen.insert(d.name.clone()))
        .collect();

    // stable
    merged.sort_by(|a, b| b.date.cmp(&a.date));
    merged
}
