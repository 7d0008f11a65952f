//! Visibility and authorization rules.
//!
//! Every rule is a pure function of the viewer, the item and an explicit
//! `now`. Rules answer with a plain `bool`; turning a `false` into a
//! not-found or forbidden outcome is the caller's job.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Authored, Post, PostRecord};

/// Who is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    User(Uuid),
}

impl Viewer {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User(id) => Some(*id),
        }
    }

    /// True when the viewer is the authenticated user `id`.
    pub fn is(&self, id: Uuid) -> bool {
        self.id() == Some(id)
    }
}

impl From<Option<Uuid>> for Viewer {
    fn from(id: Option<Uuid>) -> Self {
        id.map_or(Viewer::Anonymous, Viewer::User)
    }
}

/// Published, not scheduled for the future, and not filed under a hidden
/// category. A post without a category passes the category clause.
pub fn is_publicly_visible(record: &PostRecord, now: DateTime<Utc>) -> bool {
    record.post.is_published
        && record.post.pub_date <= now
        && record.category.as_ref().is_none_or(|c| c.is_published)
}

/// Authors always see their own posts.
pub fn can_read(viewer: &Viewer, record: &PostRecord, now: DateTime<Utc>) -> bool {
    is_publicly_visible(record, now) || viewer.is(record.post.author_id)
}

/// Only the author may edit or delete.
pub fn can_write<T: Authored + ?Sized>(viewer: &Viewer, item: &T) -> bool {
    viewer.is(item.author_id())
}

/// Commenting needs a session and a readable parent post.
pub fn can_comment(viewer: &Viewer, record: &PostRecord, now: DateTime<Utc>) -> bool {
    viewer.id().is_some() && can_read(viewer, record, now)
}

/// Which posts a listing draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingScope {
    Index,
    Category(Uuid),
    Profile(Uuid),
}

/// Which of the scoped posts survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Only posts publicly visible at the given instant.
    PublicAt(DateTime<Utc>),
    /// Everything in scope.
    Unrestricted,
}

/// A listing query: scope plus visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    pub scope: ListingScope,
    pub visibility: Visibility,
}

impl PostFilter {
    pub fn admits(&self, record: &PostRecord) -> bool {
        let in_scope = match self.scope {
            ListingScope::Index => true,
            ListingScope::Category(id) => record.post.category_id == Some(id),
            ListingScope::Profile(id) => record.post.author_id == id,
        };

        in_scope
            && match self.visibility {
                Visibility::PublicAt(now) => is_publicly_visible(record, now),
                Visibility::Unrestricted => true,
            }
    }
}

/// Build the filter for a listing. A user looking at their own profile
/// sees all of their posts; every other listing shows public posts only.
pub fn listing_filter(viewer: &Viewer, scope: ListingScope, now: DateTime<Utc>) -> PostFilter {
    let visibility = match scope {
        ListingScope::Profile(author_id) if viewer.is(author_id) => Visibility::Unrestricted,
        _ => Visibility::PublicAt(now),
    };

    PostFilter { scope, visibility }
}

/// Listing order: newest `pub_date` first, then newest insertion, then id.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.pub_date
        .cmp(&a.pub_date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
