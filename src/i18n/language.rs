// Request language selection.
// Chooses a supported language from a query parameter, an Accept-Language header or a default.

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap};

use super::DEFAULT_LANGUAGE;

/// Name of the query parameter carrying an explicit language.
pub const LANG_PARAM: &str = "lang";

/// Picks a language code out of the configured supported set.
///
/// `priority` is both the supported set and the order in which codes are
/// matched against a preference header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePicker {
    priority: Vec<String>,
}

impl Default for LanguagePicker {
    fn default() -> Self {
        Self::new(["de", "en"])
    }
}

impl LanguagePicker {
    pub fn new<I, S>(priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            priority: priority
                .into_iter()
                .map(|code| code.as_ref().trim().to_lowercase())
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    /// Supported codes in header tie-break order.
    pub fn supported(&self) -> &[String] {
        &self.priority
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.priority.iter().any(|c| c == code)
    }

    /// Pick a language: explicit parameter, then header, then default.
    ///
    /// The header check is a case-insensitive substring match, so `en-US`
    /// matches `en`. The first code in priority order wins.
    pub fn pick(&self, explicit: Option<&str>, header: Option<&str>, default: Option<&str>) -> String {
        if let Some(code) = explicit.filter(|code| self.is_supported(code)) {
            return code.to_string();
        }

        if let Some(header) = header {
            let header = header.to_lowercase();
            if let Some(code) = self.priority.iter().find(|code| header.contains(code.as_str())) {
                return code.clone();
            }
        }

        default
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    /// Pick a language from a raw query string and request headers.
    pub fn pick_from_request(&self, query: Option<&str>, headers: &HeaderMap, default: Option<&str>) -> String {
        let explicit = query.and_then(query_lang);
        let header = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        self.pick(explicit.as_deref(), header, default)
    }
}

/// Extract the `lang` parameter from a form-urlencoded query string.
fn query_lang(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(name, _)| name == LANG_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_explicit_param_wins() {
        let picker = LanguagePicker::default();
        assert_eq!(picker.pick(Some("de"), Some(""), Some("en")), "de");
        assert_eq!(picker.pick(Some("en"), Some("de-DE"), Some("de")), "en");
    }

    #[test]
    fn test_unsupported_explicit_is_ignored() {
        let picker = LanguagePicker::default();
        assert_eq!(picker.pick(Some("fr"), None, Some("en")), "en");
        assert_eq!(picker.pick(Some("DE"), None, Some("en")), "en");
    }

    #[test]
    fn test_header_priority_order() {
        let picker = LanguagePicker::default();
        assert_eq!(
            picker.pick(None, Some("Accept-Language: en-US,de;q=0.8"), Some("en")),
            "de"
        );
        assert_eq!(picker.pick(None, Some("EN-GB"), Some("de")), "en");

        let english_first = LanguagePicker::new(["en", "de"]);
        assert_eq!(english_first.pick(None, Some("en-US,de;q=0.8"), Some("de")), "en");
    }

    #[test]
    fn test_default_fallbacks() {
        let picker = LanguagePicker::default();
        assert_eq!(picker.pick(None, Some(""), Some("en")), "en");
        assert_eq!(picker.pick(None, Some("fr-FR"), Some("DE")), "de");
        assert_eq!(picker.pick(None, None, None), "en");
        assert_eq!(picker.pick(None, None, Some("  ")), "en");
    }

    #[test]
    fn test_new_normalizes_codes() {
        let picker = LanguagePicker::new([" DE ", "", "en"]);
        assert_eq!(picker.supported(), ["de", "en"]);
    }

    #[test]
    fn test_pick_from_request() {
        let picker = LanguagePicker::default();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        assert_eq!(picker.pick_from_request(Some("?page=2&lang=de"), &headers, None), "de");
        assert_eq!(picker.pick_from_request(Some("lang=xx"), &headers, Some("de")), "en");
        assert_eq!(picker.pick_from_request(None, &HeaderMap::new(), Some("de")), "de");
    }

    #[test]
    fn test_query_lang() {
        assert_eq!(query_lang("lang=de"), Some("de".to_string()));
        assert_eq!(query_lang("a=1&lang=en&b=2"), Some("en".to_string()));
        assert_eq!(query_lang("language=de"), None);
    }
}
