//! Locale catalog: the static set of target locales a batch can produce.
//!
//! The catalog is declared once, in a fixed order, so dispatch and log output are
//! reproducible between runs. Identifiers are compared as BCP 47 tags, so `zh-cn` and
//! `zh-CN` name the same entry.

use icu_locale::Locale;

/// A target locale: identifier, display name and the code the backend is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSpec {
    /// Identifier used for the output document and its `@@locale` tag
    pub id: &'static str,
    /// Human readable name for logs
    pub name: &'static str,
    backend: Option<&'static str>,
}

impl LocaleSpec {
    pub const fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            backend: None,
        }
    }

    /// Translate with a different backend code than the catalog identifier
    /// (regional variants served by their base language, for instance).
    pub const fn with_backend(mut self, code: &'static str) -> Self {
        self.backend = Some(code);
        self
    }

    /// Code passed to the translation backend
    pub fn backend_code(&self) -> &'static str {
        self.backend.unwrap_or(self.id)
    }

    /// Whether `other` names this locale, ignoring case and `_`/`-` differences
    pub fn matches(&self, other: &str) -> bool {
        same_locale(self.id, other)
    }
}

const BUILTIN: &[LocaleSpec] = &[
    // Indian languages
    LocaleSpec::new("hi", "Hindi"),
    LocaleSpec::new("bn", "Bengali"),
    LocaleSpec::new("ta", "Tamil"),
    LocaleSpec::new("te", "Telugu"),
    LocaleSpec::new("mr", "Marathi"),
    LocaleSpec::new("gu", "Gujarati"),
    LocaleSpec::new("kn", "Kannada"),
    LocaleSpec::new("ml", "Malayalam"),
    LocaleSpec::new("pa", "Punjabi"),
    LocaleSpec::new("ur", "Urdu"),
    LocaleSpec::new("ne", "Nepali"),
    LocaleSpec::new("as", "Assamese"),
    LocaleSpec::new("or", "Odia"),
    // European languages
    LocaleSpec::new("en", "English"),
    LocaleSpec::new("es", "Spanish"),
    LocaleSpec::new("fr", "French"),
    LocaleSpec::new("de", "German"),
    LocaleSpec::new("it", "Italian"),
    LocaleSpec::new("pt", "Portuguese"),
    LocaleSpec::new("nl", "Dutch"),
    LocaleSpec::new("pl", "Polish"),
    LocaleSpec::new("ru", "Russian"),
    LocaleSpec::new("uk", "Ukrainian"),
    LocaleSpec::new("sv", "Swedish"),
    LocaleSpec::new("da", "Danish"),
    LocaleSpec::new("no", "Norwegian"),
    LocaleSpec::new("fi", "Finnish"),
    LocaleSpec::new("cs", "Czech"),
    LocaleSpec::new("hu", "Hungarian"),
    LocaleSpec::new("ro", "Romanian"),
    LocaleSpec::new("el", "Greek"),
    LocaleSpec::new("sk", "Slovak"),
    LocaleSpec::new("sr", "Serbian"),
    LocaleSpec::new("hr", "Croatian"),
    LocaleSpec::new("bg", "Bulgarian"),
    // Asia-Pacific, Middle East, Africa
    LocaleSpec::new("zh-cn", "Chinese (Simplified)").with_backend("zh-CN"),
    LocaleSpec::new("zh-tw", "Chinese (Traditional)").with_backend("zh-TW"),
    LocaleSpec::new("ja", "Japanese"),
    LocaleSpec::new("ko", "Korean"),
    LocaleSpec::new("id", "Indonesian"),
    LocaleSpec::new("vi", "Vietnamese"),
    LocaleSpec::new("th", "Thai"),
    LocaleSpec::new("ar", "Arabic"),
    LocaleSpec::new("fa", "Persian"),
    LocaleSpec::new("he", "Hebrew"),
    LocaleSpec::new("sw", "Swahili"),
    // Americas
    LocaleSpec::new("es-MX", "Spanish (Mexico)").with_backend("es"),
    LocaleSpec::new("pt-BR", "Portuguese (Brazil)").with_backend("pt"),
];

/// Outcome of narrowing the catalog to a requested subset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Catalog entries to process, in catalog order
    pub targets: Vec<LocaleSpec>,
    /// Requested identifiers that are not in the catalog; never processed
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LocaleCatalog {
    specs: Vec<LocaleSpec>,
}

impl LocaleCatalog {
    /// The catalog shipped with the tool
    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    pub fn new(specs: Vec<LocaleSpec>) -> Self {
        Self { specs }
    }

    pub fn all(&self) -> &[LocaleSpec] {
        &self.specs
    }

    pub fn get(&self, id: &str) -> Option<&LocaleSpec> {
        self.specs.iter().find(|spec| spec.matches(id))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Narrow the catalog to `only`, or take all of it when `only` is `None`.
    ///
    /// Targets always come back in catalog order regardless of request order, and an
    /// identifier requested twice is processed once.
    pub fn select(&self, only: Option<&[String]>) -> Selection {
        let Some(requested) = only else {
            return Selection {
                targets: self.specs.clone(),
                rejected: Vec::new(),
            };
        };

        let mut rejected: Vec<String> = Vec::new();
        for id in requested {
            if self.get(id).is_none() && !rejected.contains(id) {
                rejected.push(id.clone());
            }
        }

        let targets = self
            .specs
            .iter()
            .filter(|spec| requested.iter().any(|id| spec.matches(id)))
            .copied()
            .collect();

        Selection { targets, rejected }
    }
}

impl Default for LocaleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Canonical BCP 47 form of `id`, or `None` if it is not a well-formed tag
pub fn canonical_tag(id: &str) -> Option<String> {
    id.replace('_', "-")
        .parse::<Locale>()
        .ok()
        .map(|locale| locale.to_string())
}

/// Whether two identifiers name the same locale
pub fn same_locale(a: &str, b: &str) -> bool {
    match (canonical_tag(a), canonical_tag(b)) {
        (Some(a), Some(b)) => a == b,
        _ => a.eq_ignore_ascii_case(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = LocaleCatalog::builtin();
        assert_eq!(catalog.len(), 48);
        assert_eq!(catalog.all()[0].id, "hi");
        assert_eq!(catalog.all().last().unwrap().id, "pt-BR");
    }

    #[test]
    fn test_builtin_ids_are_valid_and_unique() {
        let catalog = LocaleCatalog::builtin();
        let mut seen = Vec::new();
        for spec in catalog.all() {
            let tag = canonical_tag(spec.id)
                .unwrap_or_else(|| panic!("invalid catalog id {}", spec.id));
            assert!(!seen.contains(&tag), "duplicate catalog id {}", spec.id);
            seen.push(tag);
        }
    }

    #[test]
    fn test_backend_code_defaults_to_id() {
        let catalog = LocaleCatalog::builtin();
        assert_eq!(catalog.get("fr").unwrap().backend_code(), "fr");
        assert_eq!(catalog.get("es-MX").unwrap().backend_code(), "es");
        assert_eq!(catalog.get("zh-cn").unwrap().backend_code(), "zh-CN");
    }

    #[test]
    fn test_lookup_is_case_and_separator_insensitive() {
        let catalog = LocaleCatalog::builtin();
        assert_eq!(catalog.get("zh-CN").unwrap().id, "zh-cn");
        assert_eq!(catalog.get("pt_br").unwrap().id, "pt-BR");
        assert_eq!(catalog.get("FR").unwrap().id, "fr");
        assert!(catalog.get("tlh").is_none());
    }

    #[test]
    fn test_select_all() {
        let catalog = LocaleCatalog::builtin();
        let selection = catalog.select(None);
        assert_eq!(selection.targets.len(), 48);
        assert!(selection.rejected.is_empty());
    }

    #[test]
    fn test_select_subset_keeps_catalog_order() {
        let catalog = LocaleCatalog::builtin();
        let only = vec!["fr".to_string(), "hi".to_string(), "fr".to_string()];
        let selection = catalog.select(Some(&only));
        let ids: Vec<&str> = selection.targets.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["hi", "fr"]);
    }

    #[test]
    fn test_select_rejects_unknown_ids() {
        let catalog = LocaleCatalog::builtin();
        let only = vec!["de".to_string(), "xx-YY".to_string(), "xx-YY".to_string()];
        let selection = catalog.select(Some(&only));
        assert_eq!(selection.targets.len(), 1);
        assert_eq!(selection.rejected, vec!["xx-YY".to_string()]);
    }

    #[test]
    fn test_aliases_are_separate_targets() {
        let catalog = LocaleCatalog::builtin();
        let only = vec!["es".to_string(), "es-MX".to_string()];
        let selection = catalog.select(Some(&only));
        let ids: Vec<&str> = selection.targets.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["es", "es-MX"]);
        assert_eq!(selection.targets[0].backend_code(), selection.targets[1].backend_code());
    }

    #[test]
    fn test_same_locale() {
        assert!(same_locale("en", "EN"));
        assert!(same_locale("zh-cn", "zh_CN"));
        assert!(!same_locale("es", "es-MX"));
    }
}
