//! Common constants used throughout confsync.

/// Suffix marking a file under the template root as a template.
pub const TEMPLATE_SUFFIX: &str = ".tmpl";

/// Reserved context key holding the process environment.
pub const ENV_KEY: &str = "Env";

/// Marker prefixed to every destination directory.
pub const ROOT_MARKER: &str = "/";

/// Default template root scanned for templates.
pub const DEFAULT_TEMPLATES_DIR: &str = "/var/lib/confsync/templates";

/// Default staging root for rendered files.
pub const DEFAULT_STAGING_DIR: &str = "/tmp/confsync/dist";

/// Default YAML configuration source.
pub const DEFAULT_CONFIG_FILE: &str = "/var/lib/confsync/config.yml";

/// Default live configuration root.
pub const DEFAULT_LIVE_ROOT: &str = "/";

/// Mode used for every directory confsync creates.
pub const DIR_MODE: u32 = 0o755;
