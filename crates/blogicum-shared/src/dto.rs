//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request to edit the caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
}

/// Response containing a user's private account information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// What anyone may see about a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfileResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Create or replace a post. The author is taken from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub text: String,
    /// Defaults to the time of the request.
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub author: AuthorResponse,
    pub category: Option<CategoryResponse>,
    pub location: Option<LocationResponse>,
    pub comment_count: u64,
    pub created_at: DateTime<Utc>,
}

/// A single post with its discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    /// Whether the caller may edit or delete the post.
    pub editable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: AuthorResponse,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub name: String,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: Uuid,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// Raw query pairs of a listing request. Nothing here is typed, so a bad or
/// repeated `?page=` falls back to a valid page instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageQuery(pub Vec<(String, String)>);

impl PageQuery {
    /// The last `page` value; repeated keys resolve like a form parser would.
    pub fn page(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.as_str())
    }
}

/// Page controls metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub number: u64,
    pub num_pages: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub start_index: u64,
    pub end_index: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPageResponse {
    pub category: CategoryResponse,
    pub posts: Paginated<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePageResponse {
    pub profile: PublicProfileResponse,
    pub posts: Paginated<PostResponse>,
}
