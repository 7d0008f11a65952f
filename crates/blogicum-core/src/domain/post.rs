use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorRef, Authored, Category, Location};

/// Post entity - a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Author-editable post fields. The author itself is never part of a draft.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: draft.title,
            text: draft.text,
            pub_date: draft.pub_date,
            is_published: draft.is_published,
            category_id: draft.category_id,
            location_id: draft.location_id,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable fields.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = draft.pub_date;
        self.is_published = draft.is_published;
        self.category_id = draft.category_id;
        self.location_id = draft.location_id;
    }
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// A post loaded together with the references a reader needs.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post: Post,
    pub author: AuthorRef,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

impl PostRecord {
    /// The location as it may be shown: unpublished places are withheld.
    pub fn visible_location(&self) -> Option<&Location> {
        self.location.as_ref().filter(|l| l.is_published)
    }
}

impl Authored for PostRecord {
    fn author_id(&self) -> Uuid {
        self.post.author_id
    }
}
