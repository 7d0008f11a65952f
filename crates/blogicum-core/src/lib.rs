//! # Blogicum Core
//!
//! The domain layer of Blogicum.
//! This crate holds the content model, the visibility and authorization rules,
//! pagination, and the ports the infrastructure implements. It has no
//! infrastructure dependencies.

pub mod clock;
pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DomainError;
pub use pagination::{POSTS_PER_PAGE, Page, PageInfo, PageRequest, paginate};
pub use policy::{ListingScope, PostFilter, Viewer};
