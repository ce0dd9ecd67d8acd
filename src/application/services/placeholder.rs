//! Fallback avatars for users without an image.

use sha2::{Digest, Sha256};

use crate::domain::entities::AvatarColor;
use crate::domain::ports::AvatarColorStore;

const AVATAR_PALETTE: &[AvatarColor] = &[
    AvatarColor::rgb(0x1a, 0xbc, 0x9c),
    AvatarColor::rgb(0x2e, 0xcc, 0x71),
    AvatarColor::rgb(0x34, 0x98, 0xdb),
    AvatarColor::rgb(0x9b, 0x59, 0xb6),
    AvatarColor::rgb(0x34, 0x49, 0x5e),
    AvatarColor::rgb(0x16, 0xa0, 0x85),
    AvatarColor::rgb(0x27, 0xae, 0x60),
    AvatarColor::rgb(0x29, 0x80, 0xb9),
    AvatarColor::rgb(0x8e, 0x44, 0xad),
    AvatarColor::rgb(0xf3, 0x9c, 0x12),
    AvatarColor::rgb(0xe6, 0x7e, 0x22),
    AvatarColor::rgb(0xe7, 0x4c, 0x3c),
];

/// Initials plus background color shown in place of a missing avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// One or two uppercase letters, or `?`.
    pub initials: String,
    /// Background color.
    pub color: AvatarColor,
}

/// First letter of each of the first two words, uppercased.
#[must_use]
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

/// Deterministic palette color for `name`.
#[must_use]
pub fn hash_name_to_color(name: &str) -> AvatarColor {
    let digest = Sha256::digest(name.trim().as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    #[allow(clippy::cast_possible_truncation)]
    let index = (u64::from_be_bytes(prefix) % AVATAR_PALETTE.len() as u64) as usize;
    AVATAR_PALETTE[index]
}

/// Builds the placeholder for `name`, memoizing the color in `store`.
#[must_use]
pub fn placeholder_for(name: &str, store: &dyn AvatarColorStore) -> Placeholder {
    let key = name.trim();
    let color = store.get(key).unwrap_or_else(|| {
        let color = hash_name_to_color(key);
        store.put(key, color);
        color
    });

    Placeholder {
        initials: initials(name),
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::image::LruColorStore;
    use test_case::test_case;

    #[test_case("Jane Doe", "JD" ; "two_words")]
    #[test_case("ada", "A" ; "one_word")]
    #[test_case("  maria  del  carmen ", "MD" ; "extra_words_and_spaces")]
    #[test_case("", "?" ; "empty")]
    #[test_case("   ", "?" ; "blank")]
    #[test_case("émile zola", "ÉZ" ; "non_ascii")]
    fn test_initials(name: &str, expected: &str) {
        assert_eq!(initials(name), expected);
    }

    #[test]
    fn test_color_is_deterministic() {
        assert_eq!(hash_name_to_color("Jane Doe"), hash_name_to_color("Jane Doe"));
        assert_eq!(hash_name_to_color(" Jane Doe "), hash_name_to_color("Jane Doe"));
        assert!(AVATAR_PALETTE.contains(&hash_name_to_color("someone")));
    }

    #[test]
    fn test_placeholder_memoizes_color() {
        let store = LruColorStore::new(4);
        assert!(store.get("Jane Doe").is_none());

        let first = placeholder_for("Jane Doe", &store);
        assert_eq!(store.get("Jane Doe"), Some(first.color));

        let pinned = AvatarColor::rgb(1, 2, 3);
        store.put("Jane Doe", pinned);
        assert_eq!(placeholder_for("Jane Doe", &store).color, pinned);
        assert_eq!(first.initials, "JD");
    }
}
