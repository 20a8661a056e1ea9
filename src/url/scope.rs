use url::Url;

/// The origin every crawl starts from and stays under
///
/// Links are resolved against the origin URL itself, not against the page
/// they were found on, and kept only when their resolved text starts with the
/// origin's normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseOrigin {
    url: Url,
}

impl BaseOrigin {
    /// Parses the configured base URL
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_seek::url::BaseOrigin;
    ///
    /// let origin = BaseOrigin::parse("https://example.com").unwrap();
    /// assert_eq!(origin.as_str(), "https://example.com/");
    /// assert_eq!(
    ///     origin.scoped("/docs").as_deref(),
    ///     Some("https://example.com/docs")
    /// );
    /// assert_eq!(origin.scoped("https://other.com/"), None);
    /// ```
    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(base_url)?,
        })
    }

    /// Normalized text of the origin, used both as the base page URI and the scope prefix
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns true if `url` lies under this origin
    pub fn contains(&self, url: &str) -> bool {
        url.starts_with(self.url.as_str())
    }

    /// Resolves `href` and keeps it only if it lies under this origin
    pub fn scoped(&self, href: &str) -> Option<String> {
        self.resolve(href).filter(|url| self.contains(url))
    }

    /// Resolves a link href to an absolute URL
    ///
    /// Returns None if the link should be excluded:
    /// - javascript:, mailto:, tel: schemes
    /// - data: URIs
    /// - fragment-only references to the same page
    ///
    /// Any fragment is stripped, so `/p#top` and `/p` name the same page.
    /// - Invalid URLs
    /// - Non-HTTP(S) URLs after resolution
    pub fn resolve(&self, href: &str) -> Option<String> {
        let href = href.trim();

        if href.is_empty() || href.starts_with('#') {
            return None;
        }

        let lower = href.to_ascii_lowercase();
        if lower.starts_with("javascript:")
            || lower.starts_with("mailto:")
            || lower.starts_with("tel:")
            || lower.starts_with("data:")
        {
            return None;
        }

        match self.url.join(href) {
            Ok(mut absolute) if matches!(absolute.scheme(), "http" | "https") => {
                absolute.set_fragment(None);
                Some(absolute.to_string())
            }
            _ => None,
        }
    }
}
