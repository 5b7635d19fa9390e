//! Core library for blogadmin
//!
//! This crate implements the **Functional Core** of the blogadmin application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The blogadmin project uses a two-crate architecture:
//!
//! - **`blogadmin_core`** (this crate): Pure data types and state transitions with zero I/O
//! - **`blogadmin`**: HTTP calls, the async page loader and the CLI views (the Imperative Shell)
//!
//! Nothing in this crate touches the network, the filesystem or an async runtime.
//! The shell feeds it the JSON it received and asks it what to do next.
//!
//! # Module Organization
//!
//! - [`pagination`]: The page cursor state machine behind incremental loading
//! - [`url`]: Rooting relative links at the blog's base URL
//! - [`posts`]: Post model, editor defaults and list filtering
//! - [`images`]: Gallery filtering and component-local image selection
//! - [`blog`]: Blog settings and navigation items
//! - [`user`]: Authenticated user profile
//! - [`context`]: The view context shared explicitly between views
//!
//! # Example Usage
//!
//! ```rust
//! use blogadmin_core::pagination::{LoadOutcome, PageCursor};
//!
//! let mut cursor: PageCursor<u32> = PageCursor::new("/admin/api/posts/");
//! let url = cursor.begin().unwrap();
//! assert_eq!(url, "/admin/api/posts/1");
//!
//! // The shell performs the request and hands the page back.
//! assert_eq!(cursor.complete(vec![1, 2, 3]), LoadOutcome::Appended(3));
//! assert_eq!(cursor.page(), 2);
//! ```

pub mod blog;
pub mod context;
pub mod images;
pub mod pagination;
pub mod posts;
pub mod url;
pub mod user;
