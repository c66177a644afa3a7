//! Style Registry - ordered set of stylesheet URLs.
//!
//! The registry only grows. Each URL is kept once, at the position of its first
//! registration, and rendered as a stylesheet reference in front of the
//! component's markup.

/// Ordered, duplicate-free list of stylesheet URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRegistry {
	urls: Vec<String>,
}

impl StyleRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers one URL. Returns `true` if it was not present yet.
	pub fn add_style(&mut self, url: impl Into<String>) -> bool {
		let url = url.into();
		if self.contains(&url) {
			return false;
		}
		self.urls.push(url);
		true
	}

	/// Registers several URLs in call order. Returns how many were new.
	pub fn add_styles<I, S>(&mut self, urls: I) -> usize
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		urls.into_iter()
			.map(|url| self.add_style(url))
			.filter(|added| *added)
			.count()
	}

	/// Returns `true` if `url` is registered.
	pub fn contains(&self, url: &str) -> bool {
		self.urls.iter().any(|known| known == url)
	}

	/// Returns the registered URLs in registration order.
	pub fn urls(&self) -> &[String] {
		&self.urls
	}

	/// Returns the number of registered URLs.
	pub fn len(&self) -> usize {
		self.urls.len()
	}

	/// Returns `true` if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.urls.is_empty()
	}

	/// Renders one `<link>` per URL, in registration order.
	pub fn to_markup(&self, rel: &str) -> String {
		self.urls
			.iter()
			.map(|url| {
				format!(
					"<link rel=\"{}\" href=\"{}\">",
					html_escape_attr(rel),
					html_escape_attr(url)
				)
			})
			.collect()
	}
}

/// Escapes a string for use in an HTML attribute value.
fn html_escape_attr(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}
