//! Pure functions turning a remote user list into local records.

use std::collections::HashMap;

use itertools::Itertools;

use crate::models::{AvatarColor, ExternalUser, FOLLOWER_PALETTE, Follower, STORY_PALETTE, Story};

/// Counted after duplicate ids are dropped, so a payload with repeated ids
/// can still fill all ten slots.
pub const MAX_FOLLOWERS: usize = 10;
pub const MAX_STORIES: usize = 6;

/// Builds the new follower collection from a fetched user list.
///
/// The first fetched user stands for the profile owner and is skipped, the
/// next `MAX_FOLLOWERS` become followers. A follower whose id already
/// exists locally keeps its `is_following_back` flag and color; a new one
/// gets `index % 3 == 0` and the palette color at its index. Duplicate ids
/// keep their first occurrence. Output is ordered by id.
pub fn merge_followers(existing: &[Follower], fetched: &[ExternalUser]) -> Vec<Follower> {
    let existing: HashMap<i64, &Follower> = existing.iter().map(|f| (f.id, f)).collect();
    fetched
        .iter()
        .skip(1)
        .unique_by(|user| user.id)
        .take(MAX_FOLLOWERS)
        .enumerate()
        .map(|(index, user)| {
            let prior = existing.get(&user.id);
            Follower {
                id: user.id,
                name: user.name.clone(),
                username: format!("@{}", user.username),
                is_following_back: prior.map_or(index % 3 == 0, |f| f.is_following_back),
                avatar_color: prior.map_or_else(
                    || AvatarColor::round_robin(&FOLLOWER_PALETTE, index),
                    |f| f.avatar_color,
                ),
            }
        })
        .sorted_by_key(|f| f.id)
        .collect()
}

/// Builds the new story collection from the first `MAX_STORIES` fetched
/// users, the profile owner included. Even positions start out viewed.
pub fn merge_stories(fetched: &[ExternalUser]) -> Vec<Story> {
    fetched
        .iter()
        .unique_by(|user| user.id)
        .take(MAX_STORIES)
        .enumerate()
        .map(|(index, user)| Story {
            id: user.id,
            user_name: user.username.clone(),
            is_viewed: index % 2 == 0,
            avatar_color: AvatarColor::round_robin(&STORY_PALETTE, index),
        })
        .sorted_by_key(|s| s.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(n: i64) -> Vec<ExternalUser> {
        (1..=n)
            .map(|id| ExternalUser::new(id, format!("User {id}"), format!("user{id}")))
            .collect()
    }

    #[test]
    fn test_follower_count_is_capped() {
        for (n, expected) in [(0, 0), (1, 0), (2, 1), (11, 10), (15, 10)] {
            assert_eq!(merge_followers(&[], &users(n)).len(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_story_count_is_capped() {
        for (n, expected) in [(0, 0), (1, 1), (6, 6), (10, 6)] {
            assert_eq!(merge_stories(&users(n)).len(), expected, "n = {n}");
        }
    }

    #[test]
    fn test_new_followers_get_defaults_by_index() {
        let followers = merge_followers(&[], &users(11));
        assert_eq!(followers[0].id, 2);
        assert_eq!(followers[0].username, "@user2");
        for (index, follower) in followers.iter().enumerate() {
            assert_eq!(follower.is_following_back, index % 3 == 0);
            assert_eq!(follower.avatar_color, FOLLOWER_PALETTE[index]);
        }
    }

    #[test]
    fn test_existing_followers_keep_flag_and_color() {
        let existing = vec![Follower {
            id: 3,
            name: "Old name".into(),
            username: "@old".into(),
            is_following_back: true,
            avatar_color: AvatarColor::from_rgb(0x123456),
        }];
        let followers = merge_followers(&existing, &users(5));
        let merged = followers.iter().find(|f| f.id == 3).unwrap();
        // index 1 would default to not following back with the second color
        assert!(merged.is_following_back);
        assert_eq!(merged.avatar_color, AvatarColor::from_rgb(0x123456));
        // the rest of the record comes from the fetched user
        assert_eq!(merged.name, "User 3");
        assert_eq!(merged.username, "@user3");
    }

    #[test]
    fn test_followers_are_ordered_by_id() {
        let mut fetched = users(6);
        fetched[1..].reverse();
        let ids: Vec<_> = merge_followers(&[], &fetched).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut fetched = users(3);
        fetched.push(ExternalUser::new(2, "Dup", "dup"));
        let followers = merge_followers(&[], &fetched);
        assert_eq!(followers.len(), 2);
        assert_eq!(followers[0].name, "User 2");
    }

    #[test]
    fn test_stories_viewed_parity_and_palette() {
        let stories = merge_stories(&users(8));
        assert_eq!(stories[0].user_name, "user1");
        for (index, story) in stories.iter().enumerate() {
            assert_eq!(story.is_viewed, index % 2 == 0);
            assert_eq!(story.avatar_color, STORY_PALETTE[index]);
        }
    }
}
