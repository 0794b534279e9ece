//! Fixed letter vocabulary with its user-facing metadata.

use serde::Serialize;

pub const ASL_CATEGORY: &str = "asl_alphabet";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterInfo {
    pub name: String,
    pub description: String,
    pub category: String,
}

/// A single uppercase ASCII letter.
pub fn is_known_letter(label: &str) -> bool {
    let mut chars = label.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_uppercase())
}

pub fn alphabet() -> Vec<String> {
    ('A'..='Z').map(String::from).collect()
}

pub fn describe(label: &str) -> LetterInfo {
    LetterInfo {
        name: label.to_string(),
        description: format!("Letter {} of the ASL alphabet", label),
        category: ASL_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_letters() {
        assert!(is_known_letter("A"));
        assert!(is_known_letter("Z"));
        assert!(!is_known_letter("a"));
        assert!(!is_known_letter("AB"));
        assert!(!is_known_letter(""));
        assert!(!is_known_letter("Ä"));
    }

    #[test]
    fn test_alphabet_has_26_letters() {
        let letters = alphabet();
        assert_eq!(letters.len(), 26);
        assert!(letters.iter().all(|l| is_known_letter(l)));
    }

    #[test]
    fn test_describe() {
        let info = describe("Q");
        assert_eq!(info.description, "Letter Q of the ASL alphabet");
        assert_eq!(info.category, ASL_CATEGORY);
    }
}
