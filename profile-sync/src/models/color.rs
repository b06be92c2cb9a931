use std::fmt;

use serde::{Deserialize, Serialize};

/// An avatar background color as packed 32-bit ARGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarColor(pub u32);

impl AvatarColor {
    /// Opaque color from a `0xRRGGBB` value.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Picks `palette[index % palette.len()]`.
    pub fn round_robin(palette: &[AvatarColor], index: usize) -> Self {
        palette[index % palette.len()]
    }
}

impl Default for AvatarColor {
    fn default() -> Self {
        Self::from_rgb(0x2196F3)
    }
}

impl fmt::Display for AvatarColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

// SQLite has no unsigned integers, colors are stored as their i64 value.
impl From<AvatarColor> for i64 {
    fn from(value: AvatarColor) -> Self {
        value.0 as i64
    }
}

impl From<i64> for AvatarColor {
    fn from(value: i64) -> Self {
        Self(value as u32)
    }
}

pub const FOLLOWER_PALETTE: [AvatarColor; 10] = [
    AvatarColor::from_rgb(0xE91E63),
    AvatarColor::from_rgb(0x9C27B0),
    AvatarColor::from_rgb(0x2196F3),
    AvatarColor::from_rgb(0x4CAF50),
    AvatarColor::from_rgb(0xFF9800),
    AvatarColor::from_rgb(0xF44336),
    AvatarColor::from_rgb(0x00BCD4),
    AvatarColor::from_rgb(0x8BC34A),
    AvatarColor::from_rgb(0xFFEB3B),
    AvatarColor::from_rgb(0x795548),
];

pub const STORY_PALETTE: [AvatarColor; 6] = [
    AvatarColor::from_rgb(0xE91E63),
    AvatarColor::from_rgb(0x9C27B0),
    AvatarColor::from_rgb(0x2196F3),
    AvatarColor::from_rgb(0x4CAF50),
    AvatarColor::from_rgb(0xFF9800),
    AvatarColor::from_rgb(0xF44336),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_sets_alpha() {
        assert_eq!(AvatarColor::from_rgb(0xE91E63).argb(), 0xFFE91E63);
        assert_eq!(AvatarColor::from_rgb(0xAAE91E63).argb(), 0xFFE91E63);
    }

    #[test]
    fn test_round_robin_wraps() {
        assert_eq!(AvatarColor::round_robin(&STORY_PALETTE, 0), STORY_PALETTE[0]);
        assert_eq!(AvatarColor::round_robin(&STORY_PALETTE, 7), STORY_PALETTE[1]);
        assert_eq!(
            AvatarColor::round_robin(&FOLLOWER_PALETTE, 19),
            FOLLOWER_PALETTE[9]
        );
    }

    #[test]
    fn test_i64_conversion_keeps_high_bit() {
        let color = AvatarColor::from_rgb(0xFF9800);
        let stored: i64 = color.into();
        assert!(stored > 0);
        assert_eq!(AvatarColor::from(stored), color);
    }

    #[test]
    fn test_display() {
        assert_eq!(AvatarColor::from_rgb(0x795548).to_string(), "#FF795548");
    }
}
