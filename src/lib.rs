//! stencil is a project scaffolding tool.
//! It loads a catalog of file-tree templates listed in a `stencil.yml`
//! configuration and creates new directories from them, substituting
//! `__key__` placeholders in file paths and content.

/// Command-line interface module for the stencil application
pub mod cli;

/// Configuration handling: root `stencil.yml` lookup and parsing,
/// template manifests (.template.yml, .template.yaml)
pub mod config;

/// Common constants: file names, sentinels and defaults
pub mod constants;

/// Library-level `create` and `ls` operations
pub mod create;

/// Error types and handling for the stencil application
pub mod error;

/// Write-intercept hook invoked before each file is written
pub mod hooks;

/// Files excluded from every template walk
pub mod ignore;

/// Dependency install step
pub mod install;

/// Logger setup for the binary
pub mod logger;

/// `__LATEST__` version resolution for package.json files
pub mod npm;

/// Template materialization: walk, substitute, write
pub mod processor;

/// User input and interaction handling
pub mod prompt;

/// Template registry loading
pub mod settings;
