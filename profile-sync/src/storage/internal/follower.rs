use log::info;
use sqlx::{Acquire, Executor, FromRow, Sqlite};

use crate::error::Result;
use crate::models::Follower;

#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct FollowerInternal {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub is_following_back: bool,
    pub avatar_color: i64,
}

impl From<&Follower> for FollowerInternal {
    fn from(value: &Follower) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            username: value.username.clone(),
            is_following_back: value.is_following_back,
            avatar_color: value.avatar_color.into(),
        }
    }
}

impl From<FollowerInternal> for Follower {
    fn from(val: FollowerInternal) -> Self {
        Self {
            id: val.id,
            name: val.name,
            username: val.username,
            is_following_back: val.is_following_back,
            avatar_color: val.avatar_color.into(),
        }
    }
}

pub async fn create_follower_table<'e, E>(executor: E) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    info!("Creating followers table if not exists...");
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS followers ( \
             id INTEGER PRIMARY KEY, \
             name TEXT NOT NULL, \
             username TEXT NOT NULL, \
             is_following_back INTEGER NOT NULL DEFAULT 0, \
             avatar_color INTEGER NOT NULL \
             )",
    )
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn list_followers<'e, E>(executor: E) -> Result<Vec<Follower>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let followers =
        sqlx::query_as::<Sqlite, FollowerInternal>("SELECT * FROM followers ORDER BY id;")
            .fetch_all(executor)
            .await?;
    Ok(followers.into_iter().map(Into::into).collect())
}

/// Insert-or-replace, an existing row with the same id is overwritten.
pub async fn insert_followers<'c, A>(acquirer: A, followers: &[Follower]) -> Result<()>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = acquirer.acquire().await?;
    for follower in followers.iter().map(FollowerInternal::from) {
        sqlx::query(
            r#"INSERT
OR REPLACE INTO followers (
    id,
    name,
    username,
    is_following_back,
    avatar_color
)
VALUES
    (?, ?, ?, ?, ?);"#,
        )
        .bind(follower.id)
        .bind(&follower.name)
        .bind(&follower.username)
        .bind(follower.is_following_back)
        .bind(follower.avatar_color)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Returns whether a row with that id existed.
pub async fn update_follower<'e, E>(executor: E, follower: &Follower) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let follower = FollowerInternal::from(follower);
    let res = sqlx::query(
        "UPDATE followers SET name = ?, username = ?, is_following_back = ?, avatar_color = ? \
         WHERE id = ?;",
    )
    .bind(&follower.name)
    .bind(&follower.username)
    .bind(follower.is_following_back)
    .bind(follower.avatar_color)
    .bind(follower.id)
    .execute(executor)
    .await?;
    Ok(res.rows_affected() > 0)
}

/// Returns whether a row with that id existed.
pub async fn delete_follower<'e, E>(executor: E, id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let res = sqlx::query("DELETE FROM followers WHERE id = ?;")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected() > 0)
}

pub async fn delete_all_followers<'e, E>(executor: E) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("DELETE FROM followers;")
        .execute(executor)
        .await?;
    Ok(())
}
