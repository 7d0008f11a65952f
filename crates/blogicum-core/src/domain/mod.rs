//! Domain entities - the core business objects.

mod comment;
mod post;
mod taxonomy;
mod user;

use uuid::Uuid;

pub use comment::{Comment, CommentRecord};
pub use post::{Post, PostDraft, PostRecord};
pub use taxonomy::{Category, Location};
pub use user::{AuthorRef, Profile, User};

/// Content with a fixed owner.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}
