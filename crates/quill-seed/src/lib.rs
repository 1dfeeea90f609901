//! One-shot startup seeding: pull a fixed user's posts and their comments
//! from the remote placeholder API and bulk-insert them. Runs to completion
//! before the HTTP listener starts; individual insert failures are logged,
//! never fatal.

use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use quill_db::Database;
use quill_types::api::{Comment, Post};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_SEED_USER: i64 = 7;

/// Cap on concurrent per-post tasks so a large seed set cannot open an
/// unbounded number of connections to the remote API or the store.
const MAX_CONCURRENT_POSTS: usize = 8;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
}

pub async fn fetch_posts_for_user(
    client: &Client,
    base_url: &str,
    user_id: i64,
) -> Result<Vec<Post>, SeedError> {
    let posts = client
        .get(format!("{base_url}/posts"))
        .query(&[("userId", user_id)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(posts)
}

pub async fn fetch_comments_for_post(
    client: &Client,
    base_url: &str,
    post_id: i64,
) -> Result<Vec<Comment>, SeedError> {
    let comments = client
        .get(format!("{base_url}/comments"))
        .query(&[("postId", post_id)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(comments)
}

/// Fetch posts for `user_id`, then fan out one task per post: insert the post,
/// fetch its comments, insert those concurrently. Two join barriers: the inner
/// one waits for a post's comment inserts, the outer one for all posts.
/// Returns only once every spawned task has finished.
pub async fn run(
    db: Arc<Database>,
    client: Client,
    base_url: String,
    user_id: i64,
) -> Result<(), SeedError> {
    let posts = fetch_posts_for_user(&client, &base_url, user_id).await?;
    info!("seeding {} posts for user {}", posts.len(), user_id);

    let limit = Arc::new(Semaphore::new(MAX_CONCURRENT_POSTS));
    let mut tasks = JoinSet::new();

    for post in posts {
        let permit = match limit.clone().acquire_owned().await {
            Ok(permit) => permit,
            // Only possible if the semaphore were closed, which it never is.
            Err(_) => break,
        };

        let db = db.clone();
        let client = client.clone();
        let base_url = base_url.clone();
        tasks.spawn(async move {
            let _permit = permit;
            seed_post(db, client, base_url, post).await;
        });
    }

    // Outer barrier: every post task (and its nested comment inserts) must
    // complete before the caller may start accepting connections.
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            warn!("seed task panicked: {e}");
        }
    }

    info!("seed stage complete");
    Ok(())
}

async fn seed_post(db: Arc<Database>, client: Client, base_url: String, post: Post) {
    let post_id = post.id;

    let insert_db = db.clone();
    let inserted = tokio::task::spawn_blocking(move || {
        insert_db.insert_post_with_id(post.id, post.user_id, &post.title, &post.body)
    })
    .await;
    match inserted {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("failed to insert post {post_id}: {e:#}"),
        Err(e) => warn!("insert task for post {post_id} panicked: {e}"),
    }

    let comments = match fetch_comments_for_post(&client, &base_url, post_id).await {
        Ok(comments) => comments,
        Err(e) => {
            warn!("failed to fetch comments for post {post_id}: {e}");
            return;
        }
    };

    let mut inserts = JoinSet::new();
    for comment in comments {
        let db = db.clone();
        inserts.spawn_blocking(move || {
            db.insert_comment_with_id(
                comment.id,
                comment.post_id,
                comment.user_id,
                &comment.name,
                &comment.email,
                &comment.body,
            )
        });
    }

    // Inner barrier: all comment inserts for this post.
    while let Some(joined) = inserts.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("failed to insert comment for post {post_id}: {e:#}"),
            Err(e) => warn!("comment insert task for post {post_id} panicked: {e}"),
        }
    }
}
