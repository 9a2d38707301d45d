use crate::helper::public_helpers::ReaderError;
use crate::helper::verification_helpers::{ChallengePrompt, ChallengeRequest, VerificationChallenge};
use crate::models::db_operations::{comments_db_operations, posts_db_operations};
use crate::models::{Comment, PostTranslation, Visibility};
use rusqlite::Connection;

#[derive(Debug, Clone)]
pub struct SinglePost {
    pub post: PostTranslation,
    pub comments: Vec<Comment>,
    /// Present when the caller still has to pass the configured challenge.
    pub challenge: Option<ChallengePrompt>,
}

/// Resolves one post by `(slug, lang_id)` with its approved comments.
///
/// The resolver never blocks on the challenge. While one is pending the post
/// comes back without its body, together with the prompt to show instead.
pub fn resolve(
    conn: &Connection,
    visibility: Visibility,
    slug: &str,
    lang_id: i64,
    challenge: Option<&dyn VerificationChallenge>,
    challenge_request: &ChallengeRequest,
) -> Result<SinglePost, ReaderError> {
    let mut post = posts_db_operations::read_post_translation_by_slug(conn, slug, lang_id, visibility)?
        .ok_or_else(|| ReaderError::NotFound(format!("post '{}'", slug)))?;

    let challenge = challenge
        .filter(|c| c.challenge_required(challenge_request, &post))
        .map(|c| c.prompt());
    if challenge.is_some() {
        post.post_body = None;
    }

    let comments = comments_db_operations::read_approved_comments(conn, post.post.id)?;

    Ok(SinglePost { post, comments, challenge })
}
