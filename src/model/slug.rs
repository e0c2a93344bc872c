//! Slug normalization.

/// Normalize a human-readable name into a URL-safe slug.
///
/// Anything from the last `.` onward is treated as a file extension and
/// stripped. This also truncates names with structurally meaningful dots
/// ("3.5_mm" becomes "3"); a known quirk kept for compatibility with
/// existing slugs.
pub fn normalize(raw: &str) -> String {
    let stem = match raw.rfind('.') {
        Some(index) => &raw[..index],
        None => raw,
    };

    let dashless = stem.replace('-', "_");

    // Keep word characters and whitespace only.
    let cleaned: String = dashless
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    // Collapse runs of underscores, then runs of whitespace, each into a
    // single underscore.
    let mut collapsed = String::with_capacity(cleaned.len());
    let mut previous_underscore = false;
    for c in cleaned.chars() {
        if c == '_' {
            if !previous_underscore {
                collapsed.push('_');
            }
            previous_underscore = true;
        } else {
            collapsed.push(c);
            previous_underscore = false;
        }
    }

    let mut slug = String::with_capacity(collapsed.len());
    let mut previous_whitespace = false;
    for c in collapsed.chars() {
        if c.is_whitespace() {
            if !previous_whitespace {
                slug.push('_');
            }
            previous_whitespace = true;
        } else {
            slug.push(c);
            previous_whitespace = false;
        }
    }

    slug.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_punctuation_and_whitespace() {
        assert_eq!(normalize("Hello World!"), "hello_world");
        assert_eq!(normalize("Hello   World###!&&!"), "hello_world");
        assert_eq!(normalize("Hello___World###!&&!"), "hello_world");
    }

    #[test]
    fn strips_file_extension() {
        assert_eq!(normalize("tabula-muris.h5ad"), "tabula_muris");
    }

    #[test]
    fn dot_truncation_quirk() {
        // Dots are always treated as extension separators, even when they
        // carry meaning.
        assert_eq!(normalize("3.5_mm"), "3");
    }

    #[test]
    fn idempotent_without_dots() {
        for raw in ["Hello World!", "Mouse-Brain Atlas v2", "A__B  C"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }
}
