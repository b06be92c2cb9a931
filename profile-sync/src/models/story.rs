use serde::{Deserialize, Serialize};

use super::{AvatarColor, STORY_PALETTE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,
    pub user_name: String,
    #[serde(default)]
    pub is_viewed: bool,
    pub avatar_color: AvatarColor,
}

impl Story {
    /// The stories inserted together with the seed profile.
    pub fn seeds() -> Vec<Story> {
        [
            (1, "Alex", false),
            (2, "Maria", true),
            (3, "John", false),
            (4, "Sarah", false),
            (5, "Mike", true),
            (6, "Emma", false),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (id, user_name, is_viewed))| Story {
            id,
            user_name: user_name.into(),
            is_viewed,
            avatar_color: AvatarColor::round_robin(&STORY_PALETTE, index),
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds() {
        let seeds = Story::seeds();
        assert_eq!(seeds.len(), 6);
        assert_eq!(seeds[0].user_name, "Alex");
        assert_eq!(seeds[0].avatar_color, AvatarColor::from_rgb(0xE91E63));
        assert_eq!(seeds[5].avatar_color, AvatarColor::from_rgb(0xF44336));
        let viewed: Vec<_> = seeds.iter().filter(|s| s.is_viewed).map(|s| s.id).collect();
        assert_eq!(viewed, vec![2, 5]);
    }
}
