//! Extension-based dispatch policy.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::Path;

use crate::types::DispatchKind;

/// How a target will be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Run `program <target>`
    Interpreter { program: String },
    /// Read and measure only
    Text,
    /// `chmod 0755` then run directly
    Binary,
}

impl Dispatch {
    /// Decide dispatch from the target's extension (case-insensitive).
    ///
    /// Text extensions are checked before interpreters; anything matching
    /// neither is treated as a binary.
    pub fn for_path(
        target: &Path,
        interpreters: &BTreeMap<String, String>,
        text_extensions: &[String],
    ) -> Self {
        let Some(ext) = target
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
        else {
            return Self::Binary;
        };

        if text_extensions.iter().any(|t| normalize(t) == ext) {
            return Self::Text;
        }

        interpreters
            .iter()
            .find(|(key, _)| normalize(key) == ext)
            .map_or(Self::Binary, |(_, program)| Self::Interpreter {
                program: program.clone(),
            })
    }

    pub const fn kind(&self) -> DispatchKind {
        match self {
            Self::Interpreter { .. } => DispatchKind::Interpreter,
            Self::Text => DispatchKind::Text,
            Self::Binary => DispatchKind::Binary,
        }
    }
}

/// Config keys may be written as `py` or `.PY`.
fn normalize(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}
