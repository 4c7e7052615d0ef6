//! Naming collaborator: turns canonical model names into plural path segments.

use std::sync::LazyLock;

use regex::Regex;

/// Pluralizes model names for use as JSON:API types and URL segments.
pub trait Pluralizer: Send + Sync {
    fn pluralize(&self, word: &str) -> String;
}

/// Ordered suffix rules; the first match wins.
const PLURAL_RULES: &[(&str, &str)] = &[
    (r"(?i)(quiz)$", "${1}zes"),
    (r"(?i)^(oxen)$", "${1}"),
    (r"(?i)^(ox)$", "${1}en"),
    (r"(?i)([ml])ice$", "${1}ice"),
    (r"(?i)([ml])ouse$", "${1}ice"),
    (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
    (r"(?i)(octop|vir)i$", "${1}i"),
    (r"(?i)(octop|vir)us$", "${1}i"),
    (r"(?i)(alias|status)$", "${1}es"),
    (r"(?i)(bu)s$", "${1}ses"),
    (r"(?i)(buffal|tomat|potat)o$", "${1}oes"),
    (r"(?i)([ti])a$", "${1}a"),
    (r"(?i)([ti])um$", "${1}a"),
    (r"(?i)(ax|test)is$", "${1}es"),
    (r"(?i)sis$", "ses"),
    (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
    (r"(?i)(hive)$", "${1}s"),
    (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
    (r"(?i)(x|ch|ss|sh)$", "${1}es"),
    (r"(?i)s$", "s"),
    (r"$", "s"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "moose",
    "deer",
    "news",
    "police",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
];

#[allow(clippy::expect_used)] // good regexes, they don't panic
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    PLURAL_RULES
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("static regex should not panic"),
                *replacement,
            )
        })
        .collect()
});

/// English pluralizer: uncountables, irregular forms, then suffix rules.
///
/// Words that already end in a plain `s` are left as they are, so plural
/// names pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_owned();
        }

        for (singular, plural) in IRREGULAR {
            if lower == *singular || lower == *plural {
                return match_first_letter_case(word, plural);
            }
        }

        for (rule, replacement) in RULES.iter() {
            if rule.is_match(word) {
                return rule.replace(word, *replacement).into_owned();
            }
        }
        word.to_owned()
    }
}

fn match_first_letter_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        _ => replacement.to_owned(),
    }
}
