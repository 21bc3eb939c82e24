//! Write-intercept hook.
//! Lets a caller inspect every file right before it is written and replace
//! its content, its destination, or both.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// A file about to be written.
#[derive(Debug, Clone, Copy)]
pub struct WriteFile<'a> {
    /// Destination path, already joined onto the output directory.
    pub path: &'a Path,
    /// Substituted content. Empty for binary files.
    pub text: &'a str,
    pub is_binary: bool,
}

/// What to do with a file offered to a [`BeforeWrite`] hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteAction {
    /// Write the file as computed.
    Unchanged,
    /// Write this text at the computed path.
    Text(String),
    /// Write the computed content at this path.
    Path(PathBuf),
    /// Write this text at this path.
    Full { path: PathBuf, text: String },
}

/// Hook invoked before each file is written.
///
/// Implemented for any `Fn(&WriteFile) -> Result<WriteAction>`, so a closure
/// can be passed directly. An error aborts the write loop.
pub trait BeforeWrite {
    fn before_write(&self, file: &WriteFile<'_>) -> Result<WriteAction>;
}

impl<F> BeforeWrite for F
where
    F: Fn(&WriteFile<'_>) -> Result<WriteAction>,
{
    fn before_write(&self, file: &WriteFile<'_>) -> Result<WriteAction> {
        self(file)
    }
}
