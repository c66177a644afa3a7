//! Error types for the Tessera runtime.
//!
//! Errors are split by where they surface:
//!
//! - [`ConfigError`]: raised while building instances or registering components.
//!   These are fatal and reported immediately, never deferred to the first render.
//! - [`RenderError`]: raised by a user render function.
//! - [`HostError`]: raised by a host adapter (markup parsing, node lookups).
//! - [`SettingsError`]: raised while loading or validating [`Settings`](crate::settings::Settings).
//!
//! [`TesseraError`] wraps all of them so scheduled tasks can propagate a single type.

/// Configuration errors detected at construction or registration time.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// The instance was built without a render function.
	#[error("component has no render function")]
	MissingRenderer,

	/// The instance was built without a host adapter.
	#[error("component has no host adapter")]
	MissingHost,

	/// The instance was built without a timer.
	#[error("component has no timer")]
	MissingTimer,

	/// The instance was built without a host element.
	#[error("component has no host element")]
	MissingElement,

	/// No render function is registered under this kind.
	#[error("unknown component kind: '{0}'")]
	UnknownComponent(String),

	/// A render function is already registered under this kind.
	#[error("component kind already registered: '{0}'")]
	DuplicateComponent(String),

	/// The settings failed validation.
	#[error("{0}")]
	InvalidSettings(String),

	/// The host element already has a render root owned by another instance.
	#[error("element {0} already hosts a component")]
	AlreadyMounted(String),
}

impl From<SettingsError> for ConfigError {
	fn from(error: SettingsError) -> Self {
		Self::InvalidSettings(error.to_string())
	}
}

/// Errors returned by a component's render function.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
	/// The render function reported a failure.
	#[error("render failed: {0}")]
	Failed(String),
}

impl RenderError {
	/// Creates a render failure with the given message.
	pub fn new(message: impl Into<String>) -> Self {
		Self::Failed(message.into())
	}
}

impl From<String> for RenderError {
	fn from(message: String) -> Self {
		Self::Failed(message)
	}
}

impl From<&str> for RenderError {
	fn from(message: &str) -> Self {
		Self::Failed(message.to_string())
	}
}

/// Errors reported by a host adapter.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
	/// The markup could not be turned into a candidate tree.
	#[error("failed to parse markup: {0}")]
	Parse(String),

	/// A node handle does not refer to a node of the expected kind.
	#[error("invalid node: {0}")]
	InvalidNode(String),
}

/// Errors raised while loading or validating settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// The settings file could not be read.
	#[error("failed to read settings: {0}")]
	Io(#[from] std::io::Error),

	/// The settings source is not valid TOML for [`Settings`](crate::settings::Settings).
	#[error("failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// The settings could not be serialized.
	#[error("failed to serialize settings: {0}")]
	Serialize(#[from] toml::ser::Error),

	/// A setting holds a value outside its allowed range.
	#[error("invalid setting: {0}")]
	Invalid(String),
}

/// Umbrella error for runtime operations.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TesseraError {
	/// See [`ConfigError`].
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// See [`RenderError`].
	#[error(transparent)]
	Render(#[from] RenderError),

	/// See [`HostError`].
	#[error(transparent)]
	Host(#[from] HostError),

	/// See [`SettingsError`].
	#[error(transparent)]
	Settings(#[from] SettingsError),
}

/// Result alias used throughout the runtime.
pub type Result<T, E = TesseraError> = std::result::Result<T, E>;
