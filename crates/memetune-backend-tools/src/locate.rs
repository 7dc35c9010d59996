//! Executable discovery.

use std::path::{Path, PathBuf};

/// Where to look for one external tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolLookup {
    /// Environment variable holding an explicit path.
    pub env_var: &'static str,
    /// Executable names tried in `PATH`, in order.
    pub names: &'static [&'static str],
    /// Install locations tried last.
    pub common_paths: &'static [&'static str],
}

/// Finds an executable.
///
/// Checks the configured override first, then the environment variable,
/// then `PATH`, then common install locations. Overrides that do not exist
/// are skipped.
pub fn find_tool(override_path: Option<&Path>, lookup: &ToolLookup) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        log::debug!("configured path {} does not exist", path.display());
    }

    if let Some(path) = std::env::var_os(lookup.env_var) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        log::debug!("{}={} does not exist", lookup.env_var, path.display());
    }

    for name in lookup.names {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    lookup
        .common_paths
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}
