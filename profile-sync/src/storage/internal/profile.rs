use log::info;
use sqlx::{Acquire, Executor, FromRow, Sqlite};

use crate::error::Result;
use crate::models::Profile;

#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct ProfileInternal {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    #[sqlx(default)]
    pub bio: String,
    #[sqlx(default)]
    pub additional_info: String,
    pub follower_count: i64,
    pub is_following: bool,
}

impl From<&Profile> for ProfileInternal {
    fn from(value: &Profile) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            username: value.username.clone(),
            email: value.email.clone(),
            bio: value.bio.clone(),
            additional_info: value.additional_info.clone(),
            follower_count: value.follower_count as i64,
            is_following: value.is_following,
        }
    }
}

impl From<ProfileInternal> for Profile {
    fn from(val: ProfileInternal) -> Self {
        Self {
            id: val.id,
            name: val.name,
            username: val.username,
            email: val.email,
            bio: val.bio,
            additional_info: val.additional_info,
            // a corrupted negative count reads back as zero
            follower_count: u32::try_from(val.follower_count.max(0)).unwrap_or(u32::MAX),
            is_following: val.is_following,
        }
    }
}

pub async fn create_user_table<'e, E>(executor: E) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    info!("Creating users table if not exists...");
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users ( \
             id INTEGER PRIMARY KEY, \
             name TEXT NOT NULL, \
             username TEXT NOT NULL, \
             email TEXT NOT NULL, \
             bio TEXT NOT NULL DEFAULT '', \
             additional_info TEXT NOT NULL DEFAULT '', \
             follower_count INTEGER NOT NULL DEFAULT 0, \
             is_following INTEGER NOT NULL DEFAULT 0 \
             )",
    )
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get_profile<'e, E>(executor: E) -> Result<Option<Profile>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let profile = sqlx::query_as::<Sqlite, ProfileInternal>("SELECT * FROM users LIMIT 1;")
        .fetch_optional(executor)
        .await?;
    Ok(profile.map(Into::into))
}

/// Writes the profile and drops any other row, the table holds at most one.
pub async fn upsert_profile<'c, A>(acquirer: A, profile: &Profile) -> Result<()>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = acquirer.acquire().await?;
    let profile = ProfileInternal::from(profile);
    sqlx::query("DELETE FROM users WHERE id != ?;")
        .bind(profile.id)
        .execute(&mut *conn)
        .await?;
    sqlx::query(
        r#"INSERT
OR REPLACE INTO users (
    id,
    name,
    username,
    email,
    bio,
    additional_info,
    follower_count,
    is_following
)
VALUES
    (?, ?, ?, ?, ?, ?, ?, ?);"#,
    )
    .bind(profile.id)
    .bind(&profile.name)
    .bind(&profile.username)
    .bind(&profile.email)
    .bind(&profile.bio)
    .bind(&profile.additional_info)
    .bind(profile.follower_count)
    .bind(profile.is_following)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
