//! Database row types — these map directly to SQLite rows.
//! Distinct from quill-types API models to keep the DB layer independent.

use quill_types::api;

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
}

pub struct PostRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub body: String,
}

pub struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

// The password hash stays behind: api::User is the public view.
impl From<UserRow> for api::User {
    fn from(row: UserRow) -> Self {
        api::User {
            id: row.id,
            username: row.username,
            email: row.email,
        }
    }
}

impl From<PostRow> for api::Post {
    fn from(row: PostRow) -> Self {
        api::Post {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            body: row.body,
        }
    }
}

impl From<CommentRow> for api::Comment {
    fn from(row: CommentRow) -> Self {
        api::Comment {
            id: row.id,
            post_id: row.post_id,
            user_id: row.user_id,
            name: row.name,
            email: row.email,
            body: row.body,
        }
    }
}
