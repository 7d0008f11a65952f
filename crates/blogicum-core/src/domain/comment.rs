use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorRef, Authored};

/// Comment entity - a reader's note under a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}

impl Authored for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// A comment joined with its author's handle.
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub comment: Comment,
    pub author: AuthorRef,
}
