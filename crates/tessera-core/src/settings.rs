//! Runtime settings.
//!
//! Settings are plain data loaded from TOML. Every field has a default, so an
//! empty document yields [`Settings::default`]:
//!
//! ```toml
//! debounce_ms = 60
//! token_prefix = "bindEvt"
//! stylesheet_rel = "stylesheet"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::markers::DEFAULT_TOKEN_PREFIX;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 60;

/// Default `rel` attribute of generated stylesheet references.
pub const DEFAULT_STYLESHEET_REL: &str = "stylesheet";

/// Settings shared by every instance created from the same registry or builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Delay between the last update request and the render it triggers.
	pub debounce_ms: u64,
	/// Prefix of the placeholder attribute written in place of each event marker.
	pub token_prefix: String,
	/// `rel` attribute of the stylesheet references prepended to rendered markup.
	pub stylesheet_rel: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
			stylesheet_rel: DEFAULT_STYLESHEET_REL.to_string(),
		}
	}
}

impl Settings {
	/// Parses and validates settings from a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads, parses and validates settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = std::fs::read_to_string(path)?;
		Self::from_toml_str(&source)
	}

	/// Serializes the settings back to TOML.
	pub fn to_toml_string(&self) -> Result<String, SettingsError> {
		Ok(toml::to_string(self)?)
	}

	/// Checks that every field holds a usable value.
	///
	/// The token prefix becomes an attribute name in parsed markup, so it must be
	/// a non-empty run of ASCII alphanumerics.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.token_prefix.is_empty() {
			return Err(SettingsError::Invalid(
				"token_prefix must not be empty".to_string(),
			));
		}
		if !self
			.token_prefix
			.chars()
			.all(|c| c.is_ascii_alphanumeric())
		{
			return Err(SettingsError::Invalid(format!(
				"token_prefix must be ASCII alphanumeric: '{}'",
				self.token_prefix
			)));
		}
		if self.stylesheet_rel.trim().is_empty() {
			return Err(SettingsError::Invalid(
				"stylesheet_rel must not be empty".to_string(),
			));
		}
		Ok(())
	}

	/// Returns the debounce window as a [`Duration`].
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Sets the debounce window.
	pub fn with_debounce(mut self, debounce: Duration) -> Self {
		self.debounce_ms = u64::try_from(debounce.as_millis()).unwrap_or(u64::MAX);
		self
	}

	/// Sets the marker token prefix.
	pub fn with_token_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.token_prefix = prefix.into();
		self
	}
}
