//! Pluralization and singularization
//!
//! The ruleset has no uncountable words. A table named `sheep`
//! produces the model `Sheep` and the accessor `Sheeps`, rather than two
//! identifiers that collide.

use std::sync::LazyLock;

static DEFAULT_RULESET: LazyLock<Ruleset> = LazyLock::new(Ruleset::default);

/// Pluralize the last `_`-separated segment of a name
///
/// `foo_bar` becomes `foo_bars`; `user_category` becomes `user_categories`.
pub fn pluralize(name: &str) -> String {
    DEFAULT_RULESET.pluralize(name)
}

/// Singularize the last `_`-separated segment of a name
pub fn singularize(name: &str) -> String {
    DEFAULT_RULESET.singularize(name)
}

/// A single suffix rewrite
///
/// Matches when the lowercased word ends with `ending` (or equals it, for
/// whole-word rules) and the guard accepts what precedes the ending. The
/// last `drop` bytes are then replaced with `append`.
#[derive(Debug, Clone, Copy)]
struct Rule {
    ending: &'static str,
    whole_word: bool,
    guard: Option<fn(&str) -> bool>,
    drop: usize,
    append: &'static str,
}

impl Rule {
    const fn suffix(ending: &'static str, drop: usize, append: &'static str) -> Self {
        Self {
            ending,
            whole_word: false,
            guard: None,
            drop,
            append,
        }
    }

    const fn word(ending: &'static str, drop: usize, append: &'static str) -> Self {
        Self {
            ending,
            whole_word: true,
            guard: None,
            drop,
            append,
        }
    }

    const fn guarded(
        ending: &'static str,
        guard: fn(&str) -> bool,
        drop: usize,
        append: &'static str,
    ) -> Self {
        Self {
            ending,
            whole_word: false,
            guard: Some(guard),
            drop,
            append,
        }
    }

    fn apply(&self, word: &str, lower: &str) -> Option<String> {
        let matched = if self.whole_word {
            lower == self.ending
        } else {
            lower.ends_with(self.ending)
        };
        if !matched {
            return None;
        }

        let prefix = &lower[..lower.len() - self.ending.len()];
        if let Some(guard) = self.guard {
            if !guard(prefix) {
                return None;
            }
        }

        let mut out = String::with_capacity(word.len() + self.append.len());
        out.push_str(&word[..word.len() - self.drop]);
        out.push_str(self.append);
        Some(out)
    }
}

fn consonant_or_qu(prefix: &str) -> bool {
    match prefix.as_bytes().last() {
        None => false,
        Some(c) => !b"aeiouy".contains(c) || prefix.ends_with("qu"),
    }
}

fn l_or_r(prefix: &str) -> bool {
    matches!(prefix.as_bytes().last(), Some(b'l' | b'r'))
}

fn not_f(prefix: &str) -> bool {
    matches!(prefix.as_bytes().last(), Some(c) if *c != b'f')
}

fn t_or_i(prefix: &str) -> bool {
    matches!(prefix.as_bytes().last(), Some(b't' | b'i'))
}

fn greek_sis(prefix: &str) -> bool {
    ["analy", "ba", "diagno", "parenthe", "progno", "synop", "the"]
        .iter()
        .any(|stem| prefix.ends_with(stem))
}

/// Highest priority first
const PLURALS: &[Rule] = &[
    Rule::suffix("quiz", 0, "zes"),
    Rule::word("mice", 0, ""),
    Rule::word("lice", 0, ""),
    Rule::word("mouse", 4, "ice"),
    Rule::word("louse", 4, "ice"),
    Rule::suffix("matrix", 2, "ices"),
    Rule::suffix("vertex", 2, "ices"),
    Rule::suffix("index", 2, "ices"),
    Rule::suffix("x", 0, "es"),
    Rule::suffix("ch", 0, "es"),
    Rule::suffix("ss", 0, "es"),
    Rule::suffix("sh", 0, "es"),
    Rule::guarded("y", consonant_or_qu, 1, "ies"),
    Rule::suffix("hive", 0, "s"),
    Rule::guarded("fe", not_f, 2, "ves"),
    Rule::guarded("f", l_or_r, 1, "ves"),
    Rule::suffix("sis", 3, "ses"),
    Rule::guarded("a", t_or_i, 0, ""),
    Rule::guarded("um", t_or_i, 2, "a"),
    Rule::suffix("buffalo", 0, "es"),
    Rule::suffix("tomato", 0, "es"),
    Rule::suffix("bus", 0, "es"),
    Rule::suffix("alias", 0, "es"),
    Rule::suffix("status", 0, "es"),
    Rule::suffix("campus", 0, "es"),
    Rule::suffix("octopi", 0, ""),
    Rule::suffix("viri", 0, ""),
    Rule::suffix("octopus", 2, "i"),
    Rule::suffix("virus", 2, "i"),
    Rule::word("axis", 2, "es"),
    Rule::word("testis", 2, "es"),
    Rule::suffix("s", 0, ""),
];

/// Highest priority first
const SINGULARS: &[Rule] = &[
    Rule::suffix("databases", 1, ""),
    Rule::suffix("quizzes", 3, ""),
    Rule::suffix("matrices", 4, "ix"),
    Rule::suffix("vertices", 4, "ex"),
    Rule::suffix("indices", 4, "ex"),
    Rule::suffix("aliases", 2, ""),
    Rule::suffix("statuses", 2, ""),
    Rule::suffix("campuses", 2, ""),
    Rule::suffix("alias", 0, ""),
    Rule::suffix("status", 0, ""),
    Rule::suffix("campus", 0, ""),
    Rule::suffix("octopi", 1, "us"),
    Rule::suffix("viri", 1, "us"),
    Rule::suffix("octopus", 0, ""),
    Rule::suffix("virus", 0, ""),
    Rule::word("axes", 2, "is"),
    Rule::word("axis", 0, ""),
    Rule::suffix("crises", 2, "is"),
    Rule::suffix("testes", 2, "is"),
    Rule::suffix("crisis", 0, ""),
    Rule::suffix("testis", 0, ""),
    Rule::suffix("shoes", 1, ""),
    Rule::suffix("oes", 2, ""),
    Rule::suffix("buses", 2, ""),
    Rule::suffix("bus", 0, ""),
    Rule::word("mice", 3, "ouse"),
    Rule::word("lice", 3, "ouse"),
    Rule::suffix("xes", 2, ""),
    Rule::suffix("ches", 2, ""),
    Rule::suffix("sses", 2, ""),
    Rule::suffix("shes", 2, ""),
    Rule::suffix("movies", 1, ""),
    Rule::suffix("series", 0, ""),
    Rule::guarded("ies", consonant_or_qu, 3, "y"),
    Rule::guarded("ves", l_or_r, 3, "f"),
    Rule::suffix("tives", 1, ""),
    Rule::suffix("hives", 1, ""),
    Rule::guarded("ves", not_f, 3, "fe"),
    Rule::guarded("ses", greek_sis, 3, "sis"),
    Rule::guarded("sis", greek_sis, 0, ""),
    Rule::guarded("a", t_or_i, 1, "um"),
    Rule::suffix("news", 0, ""),
    Rule::suffix("ss", 0, ""),
    Rule::suffix("s", 1, ""),
];

const IRREGULARS: &[(&str, &str)] = &[
    ("child", "children"),
    ("man", "men"),
    ("move", "moves"),
    ("ox", "oxen"),
    ("person", "people"),
    ("sex", "sexes"),
    ("woman", "women"),
    ("zombie", "zombies"),
];

/// Inflection rules used to derive model and accessor names
#[derive(Debug, Clone)]
pub struct Ruleset {
    /// Whole-word (singular, plural) overrides, checked before the suffix rules
    irregulars: Vec<(String, String)>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            irregulars: IRREGULARS
                .iter()
                .map(|(s, p)| (s.to_string(), p.to_string()))
                .collect(),
        }
    }
}

impl Ruleset {
    /// Add or replace a whole-word override
    pub fn with_irregular(mut self, singular: &str, plural: &str) -> Self {
        let singular = singular.to_lowercase();
        let plural = plural.to_lowercase();
        self.irregulars
            .retain(|(s, p)| *s != singular && *p != plural);
        self.irregulars.push((singular, plural));
        self
    }

    pub fn pluralize(&self, name: &str) -> String {
        map_last_segment(name, |word| self.pluralize_word(word))
    }

    pub fn singularize(&self, name: &str) -> String {
        map_last_segment(name, |word| self.singularize_word(word))
    }

    fn pluralize_word(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if let Some((_, plural)) = self.irregulars.iter().find(|(s, p)| *s == lower || *p == lower) {
            return match_initial_case(word, plural);
        }

        apply_rules(PLURALS, word, &lower).unwrap_or_else(|| format!("{}s", word))
    }

    fn singularize_word(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();
        if let Some((singular, _)) = self.irregulars.iter().find(|(s, p)| *p == lower || *s == lower) {
            return match_initial_case(word, singular);
        }

        apply_rules(SINGULARS, word, &lower).unwrap_or_else(|| word.to_string())
    }
}

fn apply_rules(rules: &[Rule], word: &str, lower: &str) -> Option<String> {
    // Rules index into `word` by byte offsets computed on `lower`.
    if lower.len() != word.len() {
        return None;
    }

    rules.iter().find_map(|rule| rule.apply(word, lower))
}

fn match_initial_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(char::is_uppercase);
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if upper => first.to_uppercase().chain(chars).collect(),
        _ => replacement.to_string(),
    }
}

fn map_last_segment(name: &str, inflect: impl FnOnce(&str) -> String) -> String {
    match name.rsplit_once('_') {
        None => inflect(name),
        Some((head, last)) => format!("{}_{}", head, inflect(last)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_words() {
        let cases = [
            ("", ""),
            ("user", "users"),
            ("users", "users"),
            ("day", "days"),
            ("category", "categories"),
            ("box", "boxes"),
            ("match", "matches"),
            ("fish", "fishes"),
            ("knife", "knives"),
            ("wolf", "wolves"),
            ("analysis", "analyses"),
            ("datum", "data"),
            ("status", "statuses"),
            ("bus", "buses"),
            ("quiz", "quizzes"),
            ("index", "indices"),
            ("mouse", "mice"),
            ("octopus", "octopi"),
            ("axis", "axes"),
            ("person", "people"),
            ("ox", "oxen"),
            ("Person", "People"),
        ];

        for (input, expected) in cases {
            assert_eq!(pluralize(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_singularize_words() {
        let cases = [
            ("", ""),
            ("users", "user"),
            ("user", "user"),
            ("categories", "category"),
            ("boxes", "box"),
            ("matches", "match"),
            ("classes", "class"),
            ("class", "class"),
            ("knives", "knife"),
            ("wolves", "wolf"),
            ("analyses", "analysis"),
            ("data", "datum"),
            ("statuses", "status"),
            ("status", "status"),
            ("buses", "bus"),
            ("quizzes", "quiz"),
            ("indices", "index"),
            ("mice", "mouse"),
            ("movies", "movie"),
            ("heroes", "hero"),
            ("shoes", "shoe"),
            ("octopi", "octopus"),
            ("axes", "axis"),
            ("news", "news"),
            ("databases", "database"),
            ("people", "person"),
        ];

        for (input, expected) in cases {
            assert_eq!(singularize(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_no_uncountables() {
        assert_eq!(pluralize("sheep"), "sheeps");
        assert_eq!(pluralize("equipment"), "equipments");
        assert_eq!(singularize("sheep"), "sheep");
    }

    #[test]
    fn test_only_last_segment_inflected() {
        assert_eq!(pluralize("foo_bar"), "foo_bars");
        assert_eq!(pluralize("user_category"), "user_categories");
        assert_eq!(pluralize("person_child"), "person_children");
        assert_eq!(singularize("users_people"), "users_person");
        assert_eq!(singularize("boxes_statuses"), "boxes_status");
        assert_eq!(pluralize("foo_"), "foo_");
    }

    #[test]
    fn test_custom_irregular() {
        let rules = Ruleset::default().with_irregular("cactus", "cacti");
        assert_eq!(rules.pluralize("garden_cactus"), "garden_cacti");
        assert_eq!(rules.singularize("cacti"), "cactus");
    }
}
