//! Common constants used throughout stencil.

/// Root configuration file, located by walking up from the working directory.
pub const CONFIG_FILE: &str = "stencil.yml";

/// Supported template manifest file names, in lookup order.
pub const TEMPLATE_FILES: [&str; 2] = [".template.yml", ".template.yaml"];

/// Operating system metadata files that are never copied into the output.
pub const SYSTEM_FILES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

/// Variable key used for the output folder when a manifest does not declare one.
pub const DEFAULT_FOLDER_KEY: &str = "NAME";

/// Output folder name used when the folder variable has no value.
pub const UNNAMED_FOLDER: &str = "Unnamed";

/// Dependency manifest whose sentinel versions are resolved during a write.
pub const PACKAGE_JSON: &str = "package.json";

/// Dependency version that requests the latest published release.
pub const LATEST_VERSION: &str = "__LATEST__";
