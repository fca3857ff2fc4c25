/// Shader stage kinds and source text

use std::fmt;
use std::path::Path;
use crate::error::{Error, Result};

/// Pipeline stage a source compiles into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

impl StageKind {
    /// Infer the stage from a file extension (`vert`/`vs`, `frag`/`fs`)
    ///
    /// Matching is case-insensitive. Returns `None` for anything else.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "vert" | "vs" => Some(StageKind::Vertex),
            "frag" | "fs" => Some(StageKind::Fragment),
            _ => None,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => write!(f, "Vertex"),
            StageKind::Fragment => write!(f, "Fragment"),
        }
    }
}

/// Source text for one shader stage
///
/// Immutable once built. Construction rejects empty and whitespace-only text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    kind: StageKind,
    text: String,
    label: Option<String>,
}

impl ShaderSource {
    /// Create a source from text
    ///
    /// # Errors
    ///
    /// `Error::InvalidSource` if `text` has no non-whitespace character.
    pub fn new(kind: StageKind, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidSource(format!("{} source is empty", kind)));
        }
        Ok(Self { kind, text, label: None })
    }

    /// Shorthand for `ShaderSource::new(StageKind::Vertex, text)`
    pub fn vertex(text: impl Into<String>) -> Result<Self> {
        Self::new(StageKind::Vertex, text)
    }

    /// Shorthand for `ShaderSource::new(StageKind::Fragment, text)`
    pub fn fragment(text: impl Into<String>) -> Result<Self> {
        Self::new(StageKind::Fragment, text)
    }

    /// Attach a label (file name, material name) shown in logs
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Load a source file, inferring the stage from its extension
    ///
    /// # Errors
    ///
    /// `Error::InvalidSource` if the extension is unknown, the file cannot be
    /// read, or it is empty.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(StageKind::from_extension)
            .ok_or_else(|| Error::InvalidSource(format!(
                "Cannot infer shader stage from '{}' (expected .vert, .vs, .frag or .fs)",
                path.display()
            )))?;
        Self::from_file_with_kind(kind, path)
    }

    /// Load a source file as the given stage
    ///
    /// # Errors
    ///
    /// `Error::InvalidSource` if the file cannot be read or is empty.
    pub fn from_file_with_kind(kind: StageKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidSource(format!("Failed to read '{}': {}", path.display(), e)))?;
        Ok(Self::new(kind, text)?.with_label(path.display().to_string()))
    }

    /// Stage this source compiles into
    pub fn kind(&self) -> StageKind {
        self.kind
    }

    /// Source text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Label, if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label, or the stage name when unlabeled
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("<{} source>", self.kind),
        }
    }

    /// True if the first non-blank line is a `#version` directive
    pub fn has_version_directive(&self) -> bool {
        self.text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .is_some_and(|line| line.starts_with("#version"))
    }
}

#[cfg(test)]
#[path = "shader_source_tests.rs"]
mod tests;
