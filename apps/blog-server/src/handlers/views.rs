//! Domain to DTO conversions.

use blogicum_core::domain::{AuthorRef, Category, CommentRecord, Location, PostRecord, User};
use blogicum_core::{Page, PageInfo};
use blogicum_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PageMeta, Paginated,
    PostResponse, PublicProfileResponse, UserResponse,
};

pub fn author(author: &AuthorRef) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username.clone(),
    }
}

pub fn category(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title.clone(),
        description: category.description.clone(),
        slug: category.slug.clone(),
    }
}

pub fn location(location: &Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name.clone(),
    }
}

/// Render a post. An unpublished location is left out.
pub fn post(record: &PostRecord) -> PostResponse {
    PostResponse {
        id: record.post.id,
        title: record.post.title.clone(),
        text: record.post.text.clone(),
        pub_date: record.post.pub_date,
        is_published: record.post.is_published,
        author: author(&record.author),
        category: record.category.as_ref().map(category),
        location: record.visible_location().map(location),
        comment_count: record.comment_count,
        created_at: record.post.created_at,
    }
}

pub fn comment(record: &CommentRecord) -> CommentResponse {
    CommentResponse {
        id: record.comment.id,
        post_id: record.comment.post_id,
        author: author(&record.author),
        text: record.comment.text.clone(),
        created_at: record.comment.created_at,
    }
}

pub fn page_meta(info: &PageInfo) -> PageMeta {
    PageMeta {
        number: info.number,
        num_pages: info.num_pages,
        page_size: info.page_size,
        total_items: info.total_items,
        has_previous: info.has_previous,
        has_next: info.has_next,
        start_index: info.start_index,
        end_index: info.end_index,
    }
}

pub fn post_page(page: Page<PostRecord>) -> Paginated<PostResponse> {
    let page = page.map(|record| post(&record));
    Paginated {
        page: page_meta(&page.info),
        items: page.items,
    }
}

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
    }
}

pub fn public_profile(user: &User) -> PublicProfileResponse {
    PublicProfileResponse {
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        created_at: user.created_at,
    }
}
