//! Utility functions

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Build a URL-safe slug from a display name (organization profile links).
pub fn slugify(input: &str) -> String {
    let lowered = input.to_lowercase();
    let slug = SLUG_SEPARATORS.replace_all(&lowered, "-");
    slug.trim_matches('-').to_string()
}

/// Mask the local part of an email address for log output.
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        if local.len() <= 2 {
            format!("{}***{}", &local[..1], domain)
        } else {
            format!("{}***{}", &local[..2], domain)
        }
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Ever Technologies, LTD."), "ever-technologies-ltd");
        assert_eq!(slugify("  My  Org  "), "my-org");
    }

    #[test]
    fn slugify_handles_empty_input() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn mask_email_keeps_domain() {
        assert_eq!(mask_email("admin@example.com"), "ad***@example.com");
        assert_eq!(mask_email("a@example.com"), "a***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
