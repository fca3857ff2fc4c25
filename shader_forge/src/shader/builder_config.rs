/// Builder configuration

use std::borrow::Cow;
use crate::shader::ShaderSource;

/// Options for `ShaderProgramBuilder`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Truncate driver logs to this many bytes (on a char boundary)
    pub info_log_limit: Option<usize>,
    /// Detach stages from the program after the link attempt
    pub detach_after_link: bool,
    /// Version prepended as `#version <v>` to sources without one (e.g. "330 core")
    pub default_version: Option<String>,
    /// Emit per-step debug logs
    pub verbose: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            info_log_limit: None,
            detach_after_link: true,
            default_version: None,
            verbose: cfg!(debug_assertions),
        }
    }
}

impl BuilderConfig {
    /// Apply `info_log_limit` to a driver log
    pub fn truncate_log(&self, mut log: String) -> String {
        if let Some(limit) = self.info_log_limit {
            if log.len() > limit {
                let mut end = limit;
                while !log.is_char_boundary(end) {
                    end -= 1;
                }
                log.truncate(end);
            }
        }
        log
    }

    /// Source text as handed to the driver, with `default_version` applied
    pub fn prepare_source<'s>(&self, source: &'s ShaderSource) -> Cow<'s, str> {
        match &self.default_version {
            Some(version) if !source.has_version_directive() => {
                Cow::Owned(format!("#version {}\n{}", version, source.text()))
            }
            _ => Cow::Borrowed(source.text()),
        }
    }
}

#[cfg(test)]
#[path = "builder_config_tests.rs"]
mod tests;
