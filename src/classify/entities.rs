use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{Entities, Intent};

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("valid email regex")
});
static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid number regex"));
static SEARCH_VERBS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(search|find|look for)\b").expect("valid search verb regex"));

pub fn extract(text: &str, intent: Intent) -> Entities {
    Entities {
        email: first_email(text),
        query: if intent == Intent::Search {
            search_query(text)
        } else {
            None
        },
        number: first_number(text),
    }
}

fn first_email(text: &str) -> Option<String> {
    EMAIL_REGEX.find(text).map(|m| m.as_str().to_string())
}

// `\d` also matches non-ASCII digits; runs that do not parse as `u64` are skipped.
fn first_number(text: &str) -> Option<u64> {
    NUMBER_REGEX
        .find_iter(text)
        .find_map(|m| m.as_str().parse::<u64>().ok())
}

fn search_query(text: &str) -> Option<String> {
    let stripped = SEARCH_VERBS.replace_all(text, "");
    let query = stripped.trim();
    if query.is_empty() {
        None
    } else {
        Some(query.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_email_and_number() {
        let entities = extract("email john@example.com about item 5", Intent::ComposeEmail);
        assert_eq!(
            entities,
            Entities {
                email: Some("john@example.com".into()),
                query: None,
                number: Some(5),
            }
        );
    }

    #[test]
    fn keeps_original_casing_and_first_match() {
        let entities = extract(
            "forward to Jane.Doe@Example.ORG and bob@test.io",
            Intent::ForwardEmail,
        );
        assert_eq!(entities.email.as_deref(), Some("Jane.Doe@Example.ORG"));
    }

    #[test]
    fn single_letter_tld_is_not_an_email() {
        assert_eq!(extract("ping a@b.c", Intent::Unknown).email, None);
    }

    #[test]
    fn number_must_stand_alone() {
        assert_eq!(extract("open abc123 please", Intent::ReadEmail).number, None);
        assert_eq!(extract("open 12 then 7", Intent::ReadEmail).number, Some(12));
        assert_eq!(
            extract("open 99999999999999999999999", Intent::ReadEmail).number,
            None
        );
        assert_eq!(
            extract("open 99999999999999999999999 or 4", Intent::ReadEmail).number,
            Some(4)
        );
    }

    #[test]
    fn non_ascii_digits_do_not_hide_a_later_number() {
        assert_eq!(
            extract("open message \u{663} then 7", Intent::ReadEmail).number,
            Some(7)
        );
        assert_eq!(extract("\u{663}\u{664}", Intent::ReadEmail).number, None);
    }

    #[test]
    fn query_only_for_search() {
        let search = extract("Search for invoices from March", Intent::Search);
        assert_eq!(search.query.as_deref(), Some("for invoices from March"));

        let look = extract("look for the quarterly report", Intent::Search);
        assert_eq!(look.query.as_deref(), Some("the quarterly report"));

        let other = extract("find invoices", Intent::ReadEmail);
        assert_eq!(other.query, None);
    }

    #[test]
    fn bare_search_verb_has_no_query() {
        assert_eq!(extract("  find  ", Intent::Search).query, None);
        assert!(extract("search", Intent::Search).is_empty());
    }
}
