//! Output formats for parse trees
//!
//!     Every format works from a [TreeSnapshot](snapshot::TreeSnapshot), so tree traversal is
//!     written once:
//!         - treeviz: one line per node, indentation for nesting
//!         - sexp: a compact one-line `Name(arg, arg)` form
//!         - json / yaml: the snapshot serialized with serde

pub mod sexp;
pub mod snapshot;
pub mod treeviz;

use crate::engine::instance::ElementInstance;
use std::fmt;
use std::str::FromStr;

pub use snapshot::{snapshot_from_root, TreeSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Treeviz,
    Sexp,
    Json,
    Yaml,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Treeviz,
        OutputFormat::Sexp,
        OutputFormat::Json,
        OutputFormat::Yaml,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Sexp => "sexp",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| format!("Unknown format '{}'", s))
    }
}

/// Render a parsed tree in `format`
pub fn render(root: &ElementInstance<'_>, format: OutputFormat) -> Result<String, String> {
    let snapshot = snapshot_from_root(root);
    match format {
        OutputFormat::Treeviz => Ok(treeviz::to_treeviz_str(&snapshot)),
        OutputFormat::Sexp => Ok(sexp::to_sexp_str(&snapshot)),
        OutputFormat::Json => serde_json::to_string_pretty(&snapshot)
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization failed: {}", e)),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&snapshot).map_err(|e| format!("YAML serialization failed: {}", e))
        }
    }
}
