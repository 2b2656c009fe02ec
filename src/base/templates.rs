//! Built-in comment templates.
//!
//! These ship inside the binary and are used for every template the configured directory does
//! not provide.

/// Name of the template posted when an issue does not follow a template.
pub const INVALID_TEMPLATE: &str = "invalid_template";

/// Name of the template posted when duplicates were found.
pub const DUPLICATED: &str = "duplicated";

/// Name of the template posted when the issue passed triage.
pub const PASSED: &str = "passed";

/// File extension of template files on disk.
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Comment posted in place of a template that failed to render.
pub const RENDER_ERROR_COMMENT: &str = "Error rendering template. Please contact maintainers.";

/// Get the built-in source for a template name, if there is one.
pub fn builtin(name: &str) -> Option<&'static str> {
    match name {
        INVALID_TEMPLATE => Some(include_str!("../../templates/invalid_template.j2")),
        DUPLICATED => Some(include_str!("../../templates/duplicated.j2")),
        PASSED => Some(include_str!("../../templates/passed.j2")),
        _ => None,
    }
}
