//! Export configuration for lottie-core.

use serde::{Deserialize, Serialize};

/// Options for writing wire values as JSON text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Indented output with sorted keys.
    pub pretty: bool,

    /// Spaces per indentation level when `pretty` is set.
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 4,
        }
    }
}

impl ExportOptions {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let opts: ExportOptions = serde_json::from_str(r#"{"pretty": true}"#).unwrap();
        assert_eq!(opts, ExportOptions::pretty());
        assert_eq!(opts.indent, 4);
    }
}
