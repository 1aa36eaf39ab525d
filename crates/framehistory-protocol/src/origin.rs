//! Target origin for the child document's self-post.

use std::fmt;

use url::{Origin, Url};

use crate::error::{ProtocolError, ProtocolResult};

/// The origin the child frame posts its message to.
///
/// This is the hosting page's origin, so a message can only ever land back in
/// the page that produced the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetOrigin(String);

impl TargetOrigin {
    /// The `*` wildcard: deliver to whatever page hosts the frame.
    pub fn any() -> Self {
        Self("*".to_string())
    }

    /// Parses an origin, or any URL whose origin should be used.
    ///
    /// The result is normalized to `scheme://host[:port]`, the way browsers
    /// compare origins. Opaque origins (`file:`, `data:`, `about:`) are
    /// rejected because nothing can address them.
    ///
    /// # Example
    ///
    /// ```rust
    /// use framehistory_protocol::TargetOrigin;
    ///
    /// let origin = TargetOrigin::parse("https://App.Example:443/some/page").unwrap();
    /// assert_eq!(origin.as_str(), "https://app.example");
    /// ```
    pub fn parse(input: &str) -> ProtocolResult<Self> {
        let input = input.trim();
        if input == "*" {
            return Ok(Self::any());
        }

        let url = Url::parse(input)
            .map_err(|e| ProtocolError::invalid_origin(input, e.to_string()))?;
        match url.origin() {
            origin @ Origin::Tuple(..) => Ok(Self(origin.ascii_serialization())),
            Origin::Opaque(_) => Err(ProtocolError::invalid_origin(input, "opaque origin")),
        }
    }

    /// Builds the origin from the hosting page's location.
    ///
    /// Prefers the combined `origin` accessor and falls back to
    /// `protocol + "//" + host` when the environment does not expose one (or
    /// exposes the serialized opaque origin `"null"`).
    pub fn from_location(origin: Option<&str>, protocol: &str, host: &str) -> ProtocolResult<Self> {
        match origin.map(str::trim) {
            Some(origin) if !origin.is_empty() && origin != "null" => Self::parse(origin),
            _ => Self::parse(&format!("{protocol}//{host}")),
        }
    }

    /// Returns `true` for the `*` wildcard.
    pub fn is_any(&self) -> bool {
        self.0 == "*"
    }

    /// Returns `true` if a window at `origin` may receive a message posted
    /// with this target.
    pub fn admits(&self, origin: &str) -> bool {
        self.is_any() || self.0 == origin
    }

    /// Returns the serialized origin.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
