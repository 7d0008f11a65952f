use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentRecord, Location, Post, PostRecord, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};
use crate::policy::PostFilter;

/// Generic repository trait defining the operations every table supports.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique handle.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Persist profile changes of an existing user.
    async fn update(&self, user: User) -> Result<User, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Published categories, ordered by title.
    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// Published locations, ordered by name.
    async fn list_published(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository.
///
/// Mutations are conditional on authorship and report whether a row matched,
/// so an ownership check and the write it guards cannot be interleaved.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Load a post with its author, category, location and comment count.
    async fn find_record(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    /// One page of the posts admitted by `filter`, newest first.
    async fn list(
        &self,
        filter: &PostFilter,
        page_size: u64,
        request: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError>;

    /// Update `post` if it is still authored by `author_id`.
    async fn update_owned(&self, post: Post, author_id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Delete the post and its comments if it is still authored by `author_id`.
    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments under a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError>;

    /// Update `comment` if it is still authored by `author_id`.
    async fn update_owned(
        &self,
        comment: Comment,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError>;

    /// Delete the comment if it is still authored by `author_id`.
    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;
}
