//! Secret handling for the registry and comment tokens

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// An opaque secret token, zeroed on drop.
///
/// The value is only reachable through [`Credential::expose`]; formatting
/// never prints it.
#[derive(Clone)]
pub struct Credential(SecretString);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Read a credential from an environment variable.
    ///
    /// Unset, empty and whitespace-only values are all treated as absent.
    pub fn from_env(var: &str) -> Option<Self> {
        match std::env::var(var) {
            Ok(value) if !value.trim().is_empty() => Some(Self::new(value)),
            _ => None,
        }
    }

    /// Borrow the raw secret for the one call that needs it
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Credentials loaded at process start, each scoped to one step
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Registry token, used only by the publish step
    pub registry: Option<Credential>,

    /// Platform token, used only by the notify step
    pub comment: Option<Credential>,
}

impl Credentials {
    /// Load both credentials from the named environment variables
    pub fn from_env(registry_var: &str, comment_var: &str) -> Self {
        Self {
            registry: Credential::from_env(registry_var),
            comment: Credential::from_env(comment_var),
        }
    }
}
