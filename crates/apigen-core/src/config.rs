use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level project configuration loaded from `.apigen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApigenConfig {
    /// Directory holding the spec documents, relative to the config file.
    pub spec_dir: String,
    /// Base output directory; each target owns one subtree below it.
    pub output: String,
    pub targets: Vec<TargetConfig>,
}

impl Default for ApigenConfig {
    fn default() -> Self {
        Self {
            spec_dir: "openapi".to_string(),
            output: "src/generated".to_string(),
            targets: Vec::new(),
        }
    }
}

/// One generation target: a spec document rendered into one namespace.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// Output namespace; `::` or `.` separated segments become directories.
    pub namespace: String,
    #[serde(default = "default_spec")]
    pub spec: String,
    /// Emit the server binding in addition to types and client.
    #[serde(default = "default_server")]
    pub server: bool,
}

fn default_spec() -> String {
    "spec.yml".to_string()
}

fn default_server() -> bool {
    true
}

impl TargetConfig {
    /// Namespace segments, in order.
    pub fn namespace_segments(&self) -> Vec<&str> {
        self.namespace
            .split("::")
            .flat_map(|part| part.split('.'))
            .collect()
    }

    /// Directory of this target below the base output directory.
    pub fn output_dir(&self, base: &Path) -> PathBuf {
        self.namespace_segments()
            .into_iter()
            .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
    }
}

impl ApigenConfig {
    /// Check that every target has a usable, distinct namespace.
    ///
    /// Two targets may not write to the same subtree, and neither may one
    /// target's subtree contain another's.
    pub fn validate(&self) -> Result<(), String> {
        if self.targets.is_empty() {
            return Err("no targets configured".to_string());
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            for segment in target.namespace_segments() {
                if !is_identifier(segment) {
                    return Err(format!(
                        "invalid namespace `{}`: segment `{segment}` is not an identifier",
                        target.namespace
                    ));
                }
            }
            let segments = target.namespace_segments().join("::");
            if !seen.insert(segments.clone()) {
                return Err(format!("namespace `{}` is configured twice", target.namespace));
            }
        }
        for a in &seen {
            for b in &seen {
                if a != b && b.starts_with(&format!("{a}::")) {
                    return Err(format!("namespace `{b}` is nested inside `{a}`"));
                }
            }
        }
        Ok(())
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apigen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<ApigenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: ApigenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# apigen configuration
spec_dir: openapi          # directory holding the spec documents
output: src/generated      # each target is written below this directory

targets:
  - namespace: petstore    # `::` or `.` separated segments become subdirectories
    spec: spec.yml         # file inside spec_dir
    server: true           # also emit the axum server binding
"#
}
