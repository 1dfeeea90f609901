use crate::Database;
use crate::models::{CommentRow, PostRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, password_hash: &str, email: &str) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, email) VALUES (?1, ?2, ?3)",
                (username, password_hash, email),
            )?;
            Ok(UserRow {
                id: conn.last_insert_rowid(),
                username: username.to_string(),
                password: password_hash.to_string(),
                email: email.to_string(),
            })
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Posts --

    pub fn insert_post(&self, user_id: i64, title: &str, body: &str) -> Result<PostRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (user_id, title, body) VALUES (?1, ?2, ?3)",
                (user_id, title, body),
            )?;
            Ok(PostRow {
                id: conn.last_insert_rowid(),
                user_id,
                title: title.to_string(),
                body: body.to_string(),
            })
        })
    }

    /// Seed-path insert with an explicit id. OR IGNORE keeps reseeding over an
    /// existing database idempotent.
    pub fn insert_post_with_id(&self, id: i64, user_id: i64, title: &str, body: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO posts (id, user_id, title, body) VALUES (?1, ?2, ?3, ?4)",
                (id, user_id, title, body),
            )?;
            Ok(())
        })
    }

    pub fn list_posts(&self) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, user_id, title, body FROM posts ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(PostRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        title: row.get(2)?,
                        body: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_post(&self, id: i64) -> Result<Option<PostRow>> {
        self.with_conn(|conn| query_post(conn, id))
    }

    /// Merges only title and body; id and user_id are never touched.
    pub fn update_post(&self, id: i64, title: &str, body: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE posts SET title = ?1, body = ?2 WHERE id = ?3",
                (title, body, id),
            )?;
            if updated == 0 {
                return Ok(None);
            }
            query_post(conn, id)
        })
    }

    pub fn delete_post(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM posts WHERE id = ?1", [id])? > 0))
    }

    // -- Comments --

    pub fn insert_comment(
        &self,
        post_id: i64,
        user_id: i64,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<CommentRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (post_id, user_id, name, email, body) VALUES (?1, ?2, ?3, ?4, ?5)",
                (post_id, user_id, name, email, body),
            )?;
            Ok(CommentRow {
                id: conn.last_insert_rowid(),
                post_id,
                user_id,
                name: name.to_string(),
                email: email.to_string(),
                body: body.to_string(),
            })
        })
    }

    pub fn insert_comment_with_id(
        &self,
        id: i64,
        post_id: i64,
        user_id: i64,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO comments (id, post_id, user_id, name, email, body) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (id, post_id, user_id, name, email, body),
            )?;
            Ok(())
        })
    }

    pub fn list_comments(&self) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, post_id, user_id, name, email, body FROM comments ORDER BY id")?;
            let rows = stmt
                .query_map([], map_comment_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, id: i64) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| query_comment(conn, id))
    }

    /// Merges only name, email and body.
    pub fn update_comment(
        &self,
        id: i64,
        name: &str,
        email: &str,
        body: &str,
    ) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let updated = conn.execute(
                "UPDATE comments SET name = ?1, email = ?2, body = ?3 WHERE id = ?4",
                (name, email, body, id),
            )?;
            if updated == 0 {
                return Ok(None);
            }
            query_comment(conn, id)
        })
    }

    pub fn delete_comment(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM comments WHERE id = ?1", [id])? > 0))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, email FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, email FROM users WHERE email = ?1")?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare("SELECT id, username, password, email FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                email: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_post(conn: &Connection, id: i64) -> Result<Option<PostRow>> {
    let mut stmt = conn.prepare("SELECT id, user_id, title, body FROM posts WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(PostRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                body: row.get(3)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_comment(conn: &Connection, id: i64) -> Result<Option<CommentRow>> {
    let mut stmt = conn
        .prepare("SELECT id, post_id, user_id, name, email, body FROM comments WHERE id = ?1")?;

    let row = stmt.query_row([id], map_comment_row).optional()?;

    Ok(row)
}

fn map_comment_row(row: &rusqlite::Row<'_>) -> std::result::Result<CommentRow, rusqlite::Error> {
    Ok(CommentRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        user_id: row.get(2)?,
        name: row.get(3)?,
        email: row.get(4)?,
        body: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
