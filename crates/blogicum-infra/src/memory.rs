//! In-memory content store - used when no database is configured, and in tests.
//!
//! All tables sit behind one async `RwLock`, so every operation, including
//! the ownership-conditional writes, is atomic with respect to the others.
//! Data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, Comment, CommentRecord, Location, Post, PostRecord, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest, paginate};
use blogicum_core::policy::{PostFilter, newest_first};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn record(&self, post: &Post) -> Result<PostRecord, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .map(AuthorRef::from)
            .ok_or_else(|| RepoError::Query(format!("post {} has no author row", post.id)))?;

        Ok(PostRecord {
            post: post.clone(),
            author,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|c| c.post_id == post.id)
                .count() as u64,
        })
    }

    fn check_post_refs(&self, post: &Post) -> Result<(), RepoError> {
        if !self.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint("unknown author".to_string()));
        }
        if post
            .category_id
            .is_some_and(|id| !self.categories.contains_key(&id))
        {
            return Err(RepoError::Constraint("unknown category".to_string()));
        }
        if post
            .location_id
            .is_some_and(|id| !self.locations.contains_key(&id))
        {
            return Err(RepoError::Constraint("unknown location".to_string()));
        }
        Ok(())
    }

    fn username_taken(&self, username: &str, except: Uuid) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && u.id != except)
    }
}

/// Every repository port over one set of in-memory tables.
#[derive(Default)]
pub struct InMemoryContentStore {
    tables: RwLock<Tables>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) || tables.username_taken(&user.username, user.id) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryContentStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables.username_taken(&user.username, user.id) {
            return Err(RepoError::Constraint("username already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.slug == category.slug) {
            return Err(RepoError::Constraint("slug already exists".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryContentStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl BaseRepository<Location, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn insert(&self, location: Location) -> Result<Location, RepoError> {
        let mut tables = self.tables.write().await;
        tables.locations.insert(location.id, location.clone());
        Ok(location)
    }
}

#[async_trait]
impl LocationRepository for InMemoryContentStore {
    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let tables = self.tables.read().await;
        let mut locations: Vec<Location> = tables
            .locations
            .values()
            .filter(|l| l.is_published)
            .cloned()
            .collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_refs(&post)?;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryContentStore {
    async fn find_record(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).map(|p| tables.record(p)).transpose()
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page_size: u64,
        request: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables.posts.values().collect();
        posts.sort_by(|a, b| newest_first(a, b));

        let mut records = Vec::new();
        for post in posts {
            let record = tables.record(post)?;
            if filter.admits(&record) {
                records.push(record);
            }
        }

        Ok(paginate(records, page_size, request))
    }

    async fn update_owned(&self, post: Post, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_post_refs(&post)?;

        match tables.posts.get_mut(&post.id) {
            Some(stored) if stored.author_id == author_id => {
                stored.title = post.title.clone();
                stored.text = post.text.clone();
                stored.pub_date = post.pub_date;
                stored.is_published = post.is_published;
                stored.category_id = post.category_id;
                stored.location_id = post.location_id;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .posts
            .get(&id)
            .is_some_and(|p| p.author_id == author_id);
        if !owned {
            return Ok(false);
        }

        tables.posts.remove(&id);
        tables.comments.retain(|_, c| c.post_id != id);
        Ok(true)
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryContentStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint("unknown post".to_string()));
        }
        if !tables.users.contains_key(&comment.author_id) {
            return Err(RepoError::Constraint("unknown author".to_string()));
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryContentStore {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let tables = self.tables.read().await;

        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|comment| {
                let author = tables
                    .users
                    .get(&comment.author_id)
                    .map(AuthorRef::from)
                    .ok_or_else(|| {
                        RepoError::Query(format!("comment {} has no author row", comment.id))
                    })?;
                Ok(CommentRecord {
                    comment: comment.clone(),
                    author,
                })
            })
            .collect()
    }

    async fn update_owned(
        &self,
        comment: Comment,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let mut tables = self.tables.write().await;

        match tables.comments.get_mut(&comment.id) {
            Some(stored) if stored.author_id == author_id => {
                stored.text = comment.text;
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;

        let owned = tables
            .comments
            .get(&id)
            .is_some_and(|c| c.author_id == author_id);
        if owned {
            tables.comments.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_core::domain::{PostDraft, Profile};
    use blogicum_core::policy::{ListingScope, Viewer, listing_filter};
    use chrono::{DateTime, TimeDelta, Utc};

    fn user(username: &str) -> User {
        User::new(
            Profile {
                username: username.to_string(),
                ..Profile::default()
            },
            "hash".to_string(),
        )
    }

    fn draft(pub_date: DateTime<Utc>, is_published: bool, category_id: Option<Uuid>) -> PostDraft {
        PostDraft {
            title: "Title".to_string(),
            text: "Text".to_string(),
            pub_date,
            is_published,
            category_id,
            location_id: None,
        }
    }

    async fn seed_user(store: &InMemoryContentStore, username: &str) -> User {
        BaseRepository::<User, Uuid>::insert(store, user(username))
            .await
            .unwrap()
    }

    async fn seed_post(store: &InMemoryContentStore, author: Uuid, draft: PostDraft) -> Post {
        BaseRepository::<Post, Uuid>::insert(store, Post::new(author, draft))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryContentStore::new();
        seed_user(&store, "tolstoy").await;

        let result = BaseRepository::<User, Uuid>::insert(&store, user("tolstoy")).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_rename_to_taken_username_rejected() {
        let store = InMemoryContentStore::new();
        seed_user(&store, "tolstoy").await;
        let mut other = seed_user(&store, "chekhov").await;

        other.username = "tolstoy".to_string();
        let result = UserRepository::update(&store, other).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_with_unknown_category_rejected() {
        let store = InMemoryContentStore::new();
        let author = seed_user(&store, "tolstoy").await;

        let post = Post::new(author.id, draft(Utc::now(), true, Some(Uuid::new_v4())));
        let result = BaseRepository::<Post, Uuid>::insert(&store, post).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let store = InMemoryContentStore::new();
        let author = seed_user(&store, "tolstoy").await;
        let now = Utc::now();

        let hidden = BaseRepository::<Category, Uuid>::insert(
            &store,
            Category::new("Hidden".into(), String::new(), "hidden".into(), false),
        )
        .await
        .unwrap();

        let old = seed_post(&store, author.id, draft(now - TimeDelta::days(3), true, None)).await;
        let new = seed_post(&store, author.id, draft(now - TimeDelta::days(1), true, None)).await;
        seed_post(&store, author.id, draft(now + TimeDelta::days(1), true, None)).await;
        seed_post(&store, author.id, draft(now - TimeDelta::days(2), false, None)).await;
        seed_post(
            &store,
            author.id,
            draft(now - TimeDelta::days(2), true, Some(hidden.id)),
        )
        .await;

        let filter = listing_filter(&Viewer::Anonymous, ListingScope::Index, now);
        let page = store.list(&filter, 10, PageRequest::default()).await.unwrap();
        let ids: Vec<Uuid> = page.items.iter().map(|r| r.post.id).collect();
        assert_eq!(ids, vec![new.id, old.id]);

        let own = listing_filter(&Viewer::User(author.id), ListingScope::Profile(author.id), now);
        let page = store.list(&own, 10, PageRequest::default()).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert!(
            page.items
                .windows(2)
                .all(|w| w[0].post.pub_date >= w[1].post.pub_date)
        );
    }

    #[tokio::test]
    async fn test_owned_mutations_require_author() {
        let store = InMemoryContentStore::new();
        let author = seed_user(&store, "tolstoy").await;
        let stranger = seed_user(&store, "chekhov").await;
        let post = seed_post(&store, author.id, draft(Utc::now(), true, None)).await;

        let mut edited = post.clone();
        edited.title = "Changed".to_string();

        assert!(
            PostRepository::update_owned(&store, edited.clone(), stranger.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            !PostRepository::delete_owned(&store, post.id, stranger.id)
                .await
                .unwrap()
        );

        let updated = PostRepository::update_owned(&store, edited, author.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Changed");
        assert_eq!(updated.author_id, author.id);
    }

    #[tokio::test]
    async fn test_deleting_post_removes_comments() {
        let store = InMemoryContentStore::new();
        let author = seed_user(&store, "tolstoy").await;
        let post = seed_post(&store, author.id, draft(Utc::now(), true, None)).await;
        let comment = BaseRepository::<Comment, Uuid>::insert(
            &store,
            Comment::new(post.id, author.id, "first".into()),
        )
        .await
        .unwrap();

        let record = store.find_record(post.id).await.unwrap().unwrap();
        assert_eq!(record.comment_count, 1);

        assert!(
            PostRepository::delete_owned(&store, post.id, author.id)
                .await
                .unwrap()
        );
        assert!(
            BaseRepository::<Comment, Uuid>::find_by_id(&store, comment.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_comments_listed_oldest_first() {
        let store = InMemoryContentStore::new();
        let author = seed_user(&store, "tolstoy").await;
        let post = seed_post(&store, author.id, draft(Utc::now(), true, None)).await;

        let mut first = Comment::new(post.id, author.id, "first".into());
        first.created_at = Utc::now() - TimeDelta::minutes(5);
        let second = Comment::new(post.id, author.id, "second".into());

        BaseRepository::<Comment, Uuid>::insert(&store, second)
            .await
            .unwrap();
        BaseRepository::<Comment, Uuid>::insert(&store, first)
            .await
            .unwrap();

        let comments = store.list_for_post(post.id).await.unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.comment.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(comments[0].author.username, "tolstoy");
    }
}
