//! Avatar file, profile, and placeholder color types.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Media type of every rasterized avatar.
pub const AVATAR_MEDIA_TYPE: &str = "image/png";
/// File name used for rasterized avatar uploads.
pub const AVATAR_FILE_NAME: &str = "avatar.png";

/// An image file picked by the user or produced by the editor.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarFile {
    /// File name, without any directory part.
    pub file_name: String,
    /// Declared media type, e.g. `image/jpeg`.
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl AvatarFile {
    /// Creates a file from its parts.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Wraps encoded PNG bytes as the upload file.
    #[must_use]
    pub fn png(bytes: impl Into<Bytes>) -> Self {
        Self::new(AVATAR_FILE_NAME, AVATAR_MEDIA_TYPE, bytes)
    }

    /// Returns true if the declared media type is an image type.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.media_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    /// Guesses a media type from a file extension.
    #[must_use]
    pub fn media_type_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "txt" | "md" => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for AvatarFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// User profile returned by the avatar upload and removal endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedProfile {
    /// User identifier.
    pub id: String,
    /// Login name.
    pub username: String,
    /// Display name, if set.
    pub full_name: Option<String>,
    /// Path of the current avatar, if one is set.
    pub avatar: Option<String>,
    /// Server-side modification time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdatedProfile {
    /// Returns true if the profile carries an avatar path.
    #[must_use]
    pub fn has_avatar(&self) -> bool {
        self.avatar.as_deref().is_some_and(|a| !a.trim().is_empty())
    }

    /// Name used for placeholder initials.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Background color of a generated placeholder avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvatarColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl AvatarColor {
    /// Creates a color from RGB channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the color as `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Parses `#rrggbb` (the `#` is optional).
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        let mut rgb = [0u8; 3];
        hex::decode_to_slice(digits, &mut rgb).ok()?;
        Some(Self::rgb(rgb[0], rgb[1], rgb[2]))
    }
}

impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("image/png", true ; "png")]
    #[test_case("IMAGE/JPEG", true ; "uppercase")]
    #[test_case("text/plain", false ; "text")]
    #[test_case("", false ; "empty")]
    fn test_is_image(media_type: &str, expected: bool) {
        let file = AvatarFile::new("f", media_type, Bytes::new());
        assert_eq!(file.is_image(), expected);
    }

    #[test]
    fn test_png_upload_file() {
        let file = AvatarFile::png(vec![1, 2, 3]);
        assert_eq!(file.file_name, "avatar.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.bytes.len(), 3);
    }

    #[test]
    fn test_debug_omits_contents() {
        let file = AvatarFile::new("a.png", "image/png", vec![0xAB; 4]);
        let debug = format!("{file:?}");
        assert!(debug.contains("len: 4"));
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut profile = UpdatedProfile {
            id: "7".to_string(),
            username: "jdoe".to_string(),
            full_name: Some("  ".to_string()),
            avatar: None,
            updated_at: None,
        };
        assert_eq!(profile.display_name(), "jdoe");

        profile.full_name = Some("Jane Doe".to_string());
        assert_eq!(profile.display_name(), "Jane Doe");
        assert!(!profile.has_avatar());
    }

    #[test]
    fn test_color_hex() {
        let color = AvatarColor::rgb(0x1a, 0xbc, 0x9c);
        assert_eq!(color.to_hex(), "#1abc9c");
        assert_eq!(AvatarColor::from_hex("#1ABC9C"), Some(color));
        assert_eq!(AvatarColor::from_hex("1abc9c"), Some(color));
        assert_eq!(AvatarColor::from_hex("#1abc"), None);
        assert_eq!(AvatarColor::from_hex("zzzzzz"), None);
    }
}
