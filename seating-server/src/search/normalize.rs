//! Name normalization for search

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Case- and diacritic-insensitive form of a name
///
/// NFD decomposition, combining marks dropped, lowercased, trimmed, and
/// whitespace runs collapsed to a single space.
pub fn normalize(input: &str) -> String {
    let folded: String = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_diacritics_and_case() {
        assert_eq!(normalize("Élodie LEFÈVRE"), "elodie lefevre");
        assert_eq!(normalize("François Ñúñez"), "francois nunez");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize("  Jean \t  Pierre\n"), "jean pierre");
        assert_eq!(normalize("   "), "");
    }
}
