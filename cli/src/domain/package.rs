//! Android package identifiers.
//!
//! Every remote command embeds the package name inside a root shell, so the
//! name is checked against the Android package grammar before any command
//! template is resolved.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DeployError;

/// Longest package name the Android package manager accepts.
pub const MAX_PACKAGE_LEN: usize = 255;

static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$").expect("valid regex")
});

/// A validated Android package identifier such as `com.example.app`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName(String);

impl PackageName {
    /// Validate `raw` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::InvalidPackage`] if `raw` is not a valid
    /// Android package name.
    pub fn parse(raw: &str) -> Result<Self, DeployError> {
        if raw.len() > MAX_PACKAGE_LEN || !PACKAGE_RE.is_match(raw) {
            return Err(DeployError::InvalidPackage(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
