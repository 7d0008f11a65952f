//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, Comment, CommentRecord, Location, Post, PostRecord, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageInfo, PageRequest};
use blogicum_core::policy::{ListingScope, PostFilter, Visibility};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_err, write_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{}***", first),
                _ => "***".to_string(),
            };
            format!("{}@{}", masked_local, domain)
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        tracing::debug!(user_id = %user.id, email = %mask_email(&user.email), "Updating user");

        let active: user::ActiveModel = user.into();
        let model = active.update(&self.db).await.map_err(write_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::IsPublished.eq(true))
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let result = LocationEntity::find()
            .filter(location::Column::IsPublished.eq(true))
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: Uuid,
    count: i64,
}

impl PostgresPostRepository {
    /// Load the references of a batch of posts, preserving their order.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<PostRecord>, RepoError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let author_ids: Vec<Uuid> = models.iter().map(|m| m.author_id).collect();
        let category_ids: Vec<Uuid> = models.iter().filter_map(|m| m.category_id).collect();
        let location_ids: Vec<Uuid> = models.iter().filter_map(|m| m.location_id).collect();

        let authors: HashMap<Uuid, AuthorRef> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    AuthorRef {
                        id: u.id,
                        username: u.username,
                    },
                )
            })
            .collect();

        let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(query_err)?
                .into_iter()
                .map(|c| (c.id, c.into()))
                .collect()
        };

        let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(query_err)?
                .into_iter()
                .map(|l| (l.id, l.into()))
                .collect()
        };

        let counts: HashMap<Uuid, u64> = CommentEntity::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(comment::Column::Id.count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(&self.db)
            .await
            .map_err(query_err)?
            .into_iter()
            .map(|c| (c.post_id, c.count.max(0) as u64))
            .collect();

        models
            .into_iter()
            .map(|model| {
                let author = authors.get(&model.author_id).cloned().ok_or_else(|| {
                    RepoError::Query(format!("post {} has no author row", model.id))
                })?;
                let category = model.category_id.and_then(|id| categories.get(&id).cloned());
                let location = model.location_id.and_then(|id| locations.get(&id).cloned());
                let comment_count = counts.get(&model.id).copied().unwrap_or(0);

                Ok(PostRecord {
                    post: model.into(),
                    author,
                    category,
                    location,
                    comment_count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_record(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?
        else {
            return Ok(None);
        };

        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        page_size: u64,
        request: PageRequest,
    ) -> Result<Page<PostRecord>, RepoError> {
        tracing::debug!(?filter, "Listing posts");

        let mut select =
            PostEntity::find().join(JoinType::LeftJoin, post::Relation::Category.def());

        select = match filter.scope {
            ListingScope::Index => select,
            ListingScope::Category(id) => select.filter(post::Column::CategoryId.eq(id)),
            ListingScope::Profile(id) => select.filter(post::Column::AuthorId.eq(id)),
        };

        if let Visibility::PublicAt(now) = filter.visibility {
            select = select
                .filter(post::Column::IsPublished.eq(true))
                .filter(post::Column::PubDate.lte(now.fixed_offset()))
                .filter(
                    Condition::any()
                        .add(post::Column::CategoryId.is_null())
                        .add(category::Column::IsPublished.eq(true)),
                );
        }

        let paginator = select
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_asc(post::Column::Id)
            .paginate(&self.db, page_size.max(1));

        let total = paginator.num_items().await.map_err(query_err)?;
        let info = PageInfo::resolve(total, page_size, request);
        let models = paginator
            .fetch_page(info.index())
            .await
            .map_err(query_err)?;

        let items = self.hydrate(models).await?;
        Ok(Page { items, info })
    }

    async fn update_owned(&self, post: Post, author_id: Uuid) -> Result<Option<Post>, RepoError> {
        let id = post.id;
        let mut active: post::ActiveModel = post.clone().into();
        active.id = NotSet;
        active.author_id = NotSet;
        active.created_at = NotSet;

        let result = PostEntity::update_many()
            .set(active)
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok((result.rows_affected > 0).then_some(post))
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        // Comments go with the post through ON DELETE CASCADE.
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("comment {} has no author row", comment.id))
                })?;
                Ok(CommentRecord {
                    author: AuthorRef {
                        id: author.id,
                        username: author.username,
                    },
                    comment: comment.into(),
                })
            })
            .collect()
    }

    async fn update_owned(
        &self,
        comment: Comment,
        author_id: Uuid,
    ) -> Result<Option<Comment>, RepoError> {
        let result = CommentEntity::update_many()
            .col_expr(
                comment::Column::Text,
                sea_orm::sea_query::Expr::value(comment.text.clone()),
            )
            .filter(comment::Column::Id.eq(comment.id))
            .filter(comment::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok((result.rows_affected > 0).then_some(comment))
    }

    async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::Id.eq(id))
            .filter(comment::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(write_err)?;

        Ok(result.rows_affected > 0)
    }
}
