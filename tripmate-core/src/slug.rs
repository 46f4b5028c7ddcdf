//! Destination slugs.
//!
//! A slug is the URL-safe token that addresses a planning session
//! (`/trip/<slug>`). Encoding is one-way and lossy; [`humanize_slug`] is a
//! display heuristic used when only the token survives a restart.

/// Encode free-text destination input into a slug.
///
/// Lowercases, trims, collapses every whitespace run into one hyphen and
/// drops every character outside `[a-z0-9-]`. Never fails.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for ch in lowered.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }
    slug
}

/// Best-effort display text for a slug: hyphens become spaces and the first
/// letter of each word is uppercased.
///
/// Cannot recover original casing or punctuation (`"st-johns"` becomes
/// `"St Johns"`).
pub fn humanize_slug(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut word_start = true;
    for ch in slug.chars() {
        if ch == '-' || ch.is_whitespace() {
            out.push(' ');
            word_start = true;
        } else if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_multi_word_destination() {
        assert_eq!(slugify("New York"), "new-york");
        assert_eq!(slugify("  Rio   de\tJaneiro "), "rio-de-janeiro");
    }

    #[test]
    fn slugify_strips_punctuation_and_non_ascii() {
        assert_eq!(slugify("St. John's"), "st-johns");
        assert_eq!(slugify("Zürich"), "zrich");
        assert_eq!(slugify("Paris, France!"), "paris-france");
    }

    #[test]
    fn slugify_keeps_existing_hyphens_and_digits() {
        assert_eq!(slugify("Paris-2"), "paris-2");
        assert_eq!(slugify("a - b"), "a---b");
    }

    #[test]
    fn slugify_empty_and_blank_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn humanize_restores_word_case() {
        assert_eq!(humanize_slug("new-york"), "New York");
        assert_eq!(humanize_slug("paris"), "Paris");
        assert_eq!(humanize_slug("rio-2024"), "Rio 2024");
    }

    #[test]
    fn humanize_is_lossy() {
        assert_eq!(humanize_slug("st-johns"), "St Johns");
        assert_eq!(slugify(&humanize_slug("new-york")), "new-york");
    }
}
