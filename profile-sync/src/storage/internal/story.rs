use log::info;
use sqlx::{Acquire, Executor, FromRow, Sqlite};

use crate::error::Result;
use crate::models::Story;

#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct StoryInternal {
    pub id: i64,
    pub user_name: String,
    pub is_viewed: bool,
    pub avatar_color: i64,
}

impl From<&Story> for StoryInternal {
    fn from(value: &Story) -> Self {
        Self {
            id: value.id,
            user_name: value.user_name.clone(),
            is_viewed: value.is_viewed,
            avatar_color: value.avatar_color.into(),
        }
    }
}

impl From<StoryInternal> for Story {
    fn from(val: StoryInternal) -> Self {
        Self {
            id: val.id,
            user_name: val.user_name,
            is_viewed: val.is_viewed,
            avatar_color: val.avatar_color.into(),
        }
    }
}

pub async fn create_story_table<'e, E>(executor: E) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    info!("Creating stories table if not exists...");
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS stories ( \
             id INTEGER PRIMARY KEY, \
             user_name TEXT NOT NULL, \
             is_viewed INTEGER NOT NULL DEFAULT 0, \
             avatar_color INTEGER NOT NULL \
             )",
    )
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn list_stories<'e, E>(executor: E) -> Result<Vec<Story>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let stories = sqlx::query_as::<Sqlite, StoryInternal>("SELECT * FROM stories ORDER BY id;")
        .fetch_all(executor)
        .await?;
    Ok(stories.into_iter().map(Into::into).collect())
}

pub async fn insert_stories<'c, A>(acquirer: A, stories: &[Story]) -> Result<()>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = acquirer.acquire().await?;
    for story in stories.iter().map(StoryInternal::from) {
        sqlx::query(
            "INSERT OR REPLACE INTO stories (id, user_name, is_viewed, avatar_color) \
             VALUES (?, ?, ?, ?);",
        )
        .bind(story.id)
        .bind(&story.user_name)
        .bind(story.is_viewed)
        .bind(story.avatar_color)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Returns whether a row with that id existed.
pub async fn update_story<'e, E>(executor: E, story: &Story) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let story = StoryInternal::from(story);
    let res = sqlx::query(
        "UPDATE stories SET user_name = ?, is_viewed = ?, avatar_color = ? WHERE id = ?;",
    )
    .bind(&story.user_name)
    .bind(story.is_viewed)
    .bind(story.avatar_color)
    .bind(story.id)
    .execute(executor)
    .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all_stories<'e, E>(executor: E) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM stories;").execute(executor).await?;
    Ok(())
}
