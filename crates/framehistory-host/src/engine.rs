//! Browser engine detection.
//!
//! Only one distinction matters here: legacy engines (MSIE / Trident) cannot
//! navigate an iframe to a `data:` URL, so documents must be written into the
//! frame directly.

use std::sync::LazyLock;

use regex::Regex;

static LEGACY_ENGINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)msie|trident").expect("Invalid legacy engine regex"));

/// Browser engine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// MSIE / Trident.
    Legacy,
    /// Everything else.
    Standard,
}

impl Engine {
    /// Classifies a user agent string.
    pub fn detect(user_agent: &str) -> Self {
        if LEGACY_ENGINE_REGEX.is_match(user_agent) {
            Self::Legacy
        } else {
            Self::Standard
        }
    }

    /// Returns the frame loading strategy this engine supports.
    pub fn load_strategy(self) -> LoadStrategy {
        match self {
            Self::Legacy => LoadStrategy::DocumentWrite,
            Self::Standard => LoadStrategy::DataUrl,
        }
    }
}

/// How a synthesized document reaches the child frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Open the frame's document, write the source, close it.
    DocumentWrite,
    /// Navigate the frame to a base64 `data:` URL of the source.
    DataUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_msie_and_trident() {
        for ua in [
            "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0)",
            "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.2)",
            "Mozilla/5.0 (Windows NT 10.0; WOW64; Trident/7.0; rv:11.0) like Gecko",
            "something msie lowercase",
        ] {
            assert_eq!(Engine::detect(ua), Engine::Legacy, "{ua}");
        }
    }

    #[test]
    fn modern_engines_are_standard() {
        for ua in [
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36 Edg/120.0",
            "",
        ] {
            assert_eq!(Engine::detect(ua), Engine::Standard, "{ua}");
        }
    }

    #[test]
    fn strategies() {
        assert_eq!(Engine::Legacy.load_strategy(), LoadStrategy::DocumentWrite);
        assert_eq!(Engine::Standard.load_strategy(), LoadStrategy::DataUrl);
    }
}
