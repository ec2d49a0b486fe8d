//! Child selection for the next frontier
//!
//! Each page contributes at most `width` children. With uniqueness on,
//! already-visited URLs are removed first and the cap applies to what
//! remains.

use crate::crawler::visited::VisitedSet;

/// URLs to fetch at one depth
pub type Frontier = Vec<String>;

/// Picks the children of one page for the next depth
///
/// Candidates are examined in extraction order and iteration stops once
/// `width` children are selected, so candidates past the cap are never
/// marked visited and remain available to other pages.
///
/// # Arguments
///
/// * `candidates` - Links extracted from the page
/// * `width` - Maximum children to take; `None` means unbounded
/// * `visited` - Shared visited set when uniqueness is enabled
pub fn select_children(
    candidates: Vec<String>,
    width: Option<usize>,
    visited: Option<&VisitedSet>,
) -> Frontier {
    let limit = width.unwrap_or(usize::MAX);

    candidates
        .into_iter()
        .filter(|url| visited.map_or(true, |visited| visited.mark_if_new(url)))
        .take(limit)
        .collect()
}
