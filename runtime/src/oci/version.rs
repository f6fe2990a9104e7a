//! Tag ordering by dotted numeric segments.
//!
//! Tags are split on `.`. A tag with fewer segments always sorts before a tag
//! with more segments, so `9` < `1.2.3.4`. Tags with the same number of
//! segments compare segment by segment as integers; segments that are not
//! integers count as 0. This is not semver: pre-release and build metadata
//! carry no meaning.

use std::cmp::Ordering;

/// Compare two tags.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a_segments: Vec<&str> = a.split('.').collect();
    let b_segments: Vec<&str> = b.split('.').collect();

    a_segments.len().cmp(&b_segments.len()).then_with(|| {
        a_segments
            .iter()
            .zip(&b_segments)
            .map(|(x, y)| segment_value(x).cmp(&segment_value(y)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// Sort tags in ascending order. Equal tags keep their relative order.
pub fn sort_versions(tags: &mut [String]) {
    tags.sort_by(|a, b| compare_versions(a, b));
}

/// Pick the highest tag, i.e. the last one after an ascending sort.
///
/// Returns `None` for an empty tag list.
pub fn latest_tag(tags: &[String]) -> Option<&str> {
    tags.iter()
        .max_by(|a, b| compare_versions(a, b))
        .map(String::as_str)
}

fn segment_value(segment: &str) -> i64 {
    segment.parse().unwrap_or(0)
}
