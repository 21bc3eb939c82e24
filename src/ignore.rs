//! Files that are never copied out of a template directory.
//! Template manifests and operating system metadata are matched by base
//! name at any depth of the template tree.

use crate::constants::{SYSTEM_FILES, TEMPLATE_FILES};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Builds the set of patterns excluded from every template walk.
///
/// # Returns
/// * `Result<GlobSet>` - Patterns matched against paths relative to the template root
pub fn build_exclusions() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for name in TEMPLATE_FILES.iter().chain(SYSTEM_FILES.iter()) {
        let pattern = format!("**/{name}");
        builder.add(Glob::new(&pattern).map_err(|e| Error::GlobPatternError {
            pattern,
            reason: e.to_string(),
        })?);
    }
    builder.build().map_err(|e| Error::GlobPatternError {
        pattern: "<exclusions>".to_string(),
        reason: e.to_string(),
    })
}
