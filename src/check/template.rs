//! Template conformance heuristic.

use crate::base::types::Issue;

/// Marker that issue templates embed in their body.
pub const TEMPLATE_MARKER: &str = "<!-- TEMPLATE";

/// Whether the issue looks like it was opened from a template.
///
/// This is a heuristic, not a schema check: an issue passes when its body contains
/// [`TEMPLATE_MARKER`] or when it carries at least one label (templates usually apply one).
pub fn check_template(issue: &Issue) -> bool {
    issue.body.contains(TEMPLATE_MARKER) || !issue.labels.is_empty()
}
