//! Name patterns for include/exclude filtering
//!
//! A [`Pattern`] decides whether a component name is eligible for caching.
//! Patterns arrive from host configuration as JSON: a comma-delimited string,
//! an array of names, or `{"regex": "..."}`. Any other shape degrades to
//! [`Pattern::Unsupported`], which never matches.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Delimiter for string patterns.
const NAME_DELIMITER: char = ',';

/// JSON field carrying a regex source.
const REGEX_FIELD: &str = "regex";

/// An include or exclude name pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches names that are elements of the list
    List(Vec<String>),
    /// Matches names among the comma-separated parts
    Delimited(String),
    /// Matches names the regex finds a match in
    Regex(Regex),
    /// Unrecognized shape, never matches
    Unsupported,
}

impl Pattern {
    pub fn list<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(names.into_iter().map(Into::into).collect())
    }

    pub fn delimited(names: impl Into<String>) -> Self {
        Self::Delimited(names.into())
    }

    /// Compile a regex pattern. Invalid sources degrade to `Unsupported`.
    pub fn regex(source: &str) -> Self {
        match Regex::new(source) {
            Ok(re) => Self::Regex(re),
            Err(e) => {
                tracing::warn!(source, error = %e, "Invalid regex pattern, treating as no-match");
                Self::Unsupported
            }
        }
    }

    /// Build a pattern from a host-supplied JSON value. Never fails.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(names) => Self::Delimited(names),
            Value::Array(items) => {
                let names: Option<Vec<String>> = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(name) => Some(name),
                        _ => None,
                    })
                    .collect();
                names.map(Self::List).unwrap_or_else(|| {
                    tracing::warn!("Pattern list contains non-string elements, treating as no-match");
                    Self::Unsupported
                })
            }
            Value::Object(mut fields) if fields.len() == 1 => match fields.remove(REGEX_FIELD) {
                Some(Value::String(source)) => Self::regex(&source),
                _ => Self::unsupported_shape(),
            },
            _ => Self::unsupported_shape(),
        }
    }

    fn unsupported_shape() -> Self {
        tracing::warn!("Unsupported pattern shape, treating as no-match");
        Self::Unsupported
    }

    /// Convert back to the JSON shape accepted by [`Pattern::from_value`].
    pub fn to_value(&self) -> Value {
        match self {
            Self::List(names) => Value::Array(names.iter().cloned().map(Value::String).collect()),
            Self::Delimited(names) => Value::String(names.clone()),
            Self::Regex(re) => {
                let mut fields = Map::new();
                fields.insert(REGEX_FIELD.to_string(), Value::String(re.as_str().to_string()));
                Value::Object(fields)
            }
            Self::Unsupported => Value::Null,
        }
    }

    /// Does `name` satisfy this pattern?
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::List(names) => names.iter().any(|n| n == name),
            Self::Delimited(names) => names.split(NAME_DELIMITER).any(|n| n == name),
            Self::Regex(re) => re.is_match(name),
            Self::Unsupported => false,
        }
    }
}

/// Free-function form of [`Pattern::matches`].
pub fn matches(pattern: &Pattern, name: &str) -> bool {
    pattern.matches(name)
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Delimited(a), Self::Delimited(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            (Self::Unsupported, Self::Unsupported) => true,
            _ => false,
        }
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// Include and exclude patterns applied together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub include: Option<Pattern>,
    #[serde(default)]
    pub exclude: Option<Pattern>,
}

impl Filters {
    pub fn new(include: Option<Pattern>, exclude: Option<Pattern>) -> Self {
        Self { include, exclude }
    }

    /// Render-time eligibility.
    ///
    /// A nameless component fails any include pattern but is never excluded.
    pub fn admits(&self, name: Option<&str>) -> bool {
        if let Some(include) = &self.include {
            if !name.is_some_and(|n| include.matches(n)) {
                return false;
            }
        }
        if let (Some(exclude), Some(n)) = (&self.exclude, name) {
            if exclude.matches(n) {
                return false;
            }
        }
        true
    }

    /// Whether an already cached entry survives a filter change.
    ///
    /// Entries cached without a name are always retained.
    pub fn retains(&self, name: Option<&str>) -> bool {
        let Some(name) = name else {
            return true;
        };
        let included = self.include.as_ref().map_or(true, |p| p.matches(name));
        let excluded = self.exclude.as_ref().is_some_and(|p| p.matches(name));
        included && !excluded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_matcher_table() {
        assert!(Pattern::list(["a", "b"]).matches("a"));
        assert!(!Pattern::delimited("a,b").matches("c"));
        assert!(Pattern::regex("^x").matches("xyz"));
        assert!(!Pattern::regex("^x").matches("yz"));
    }

    #[test]
    fn test_delimited_does_not_trim() {
        let pattern = Pattern::delimited("a, b");
        assert!(pattern.matches("a"));
        assert!(pattern.matches(" b"));
        assert!(!pattern.matches("b"));
    }

    #[test]
    fn test_unsupported_never_matches() {
        assert!(!Pattern::Unsupported.matches(""));
        assert!(!Pattern::Unsupported.matches("anything"));
        assert!(!matches(&Pattern::regex("(unclosed"), "(unclosed"));
    }

    #[test]
    fn test_from_value_shapes() {
        assert_eq!(Pattern::from_value(json!("a,b")), Pattern::delimited("a,b"));
        assert_eq!(Pattern::from_value(json!(["a", "b"])), Pattern::list(["a", "b"]));
        assert_eq!(Pattern::from_value(json!({"regex": "^Tab"})), Pattern::regex("^Tab"));
        assert_eq!(Pattern::from_value(json!(42)), Pattern::Unsupported);
        assert_eq!(Pattern::from_value(json!(true)), Pattern::Unsupported);
        assert_eq!(Pattern::from_value(json!(["a", 1])), Pattern::Unsupported);
        assert_eq!(Pattern::from_value(json!({"glob": "*"})), Pattern::Unsupported);
        assert_eq!(Pattern::from_value(Value::Null), Pattern::Unsupported);
    }

    #[test]
    fn test_serde_shapes() {
        let pattern: Pattern = serde_json::from_str(r#"{"regex":"^Edit"}"#).unwrap();
        assert!(pattern.matches("EditPanel"));
        assert_eq!(serde_json::to_string(&pattern).unwrap(), r#"{"regex":"^Edit"}"#);

        let filters: Filters = serde_json::from_str(r#"{"include":["A","C"]}"#).unwrap();
        assert_eq!(filters.include, Some(Pattern::list(["A", "C"])));
        assert_eq!(filters.exclude, None);
    }

    #[test]
    fn test_admits() {
        let filters = Filters::new(Some(Pattern::list(["A", "C"])), Some(Pattern::delimited("C")));
        assert!(filters.admits(Some("A")));
        assert!(!filters.admits(Some("B")));
        assert!(!filters.admits(Some("C")));
        assert!(!filters.admits(None));

        let exclude_only = Filters::new(None, Some(Pattern::delimited("B")));
        assert!(exclude_only.admits(None));
        assert!(!exclude_only.admits(Some("B")));
        assert!(Filters::default().admits(None));
    }

    #[test]
    fn test_retains() {
        let filters = Filters::new(Some(Pattern::list(["A", "C"])), None);
        assert!(filters.retains(Some("A")));
        assert!(!filters.retains(Some("B")));
        assert!(filters.retains(None));

        let exclude = Filters::new(None, Some(Pattern::regex("^B")));
        assert!(!exclude.retains(Some("Banner")));
        assert!(exclude.retains(Some("Card")));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Property: list and delimited forms of the same names agree.
        #[test]
        fn prop_list_and_delimited_agree(
            names in prop::collection::vec("[A-Za-z]{1,8}", 1..6),
            probe in "[A-Za-z]{1,8}",
        ) {
            let list = Pattern::list(names.clone());
            let delimited = Pattern::delimited(names.join(","));
            prop_assert_eq!(list.matches(&probe), delimited.matches(&probe));
        }

        /// Property: with names present, eligibility and retention agree.
        #[test]
        fn prop_admits_matches_retains_for_named(
            include in prop::collection::vec("[A-D]", 0..4),
            exclude in prop::collection::vec("[A-D]", 0..4),
            name in "[A-D]",
        ) {
            let filters = Filters::new(
                (!include.is_empty()).then(|| Pattern::list(include)),
                (!exclude.is_empty()).then(|| Pattern::list(exclude)),
            );
            prop_assert_eq!(filters.admits(Some(&name)), filters.retains(Some(&name)));
        }
    }
}
