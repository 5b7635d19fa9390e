//! Explicit view context
//!
//! The post being edited, the blog settings and the authenticated user are
//! shared between views. Instead of living in a process-wide service they are
//! held in one [`AdminContext`] value that the shell hands to each view.

use crate::blog::Blog;
use crate::posts::Post;
use crate::user::User;

#[derive(Debug, Clone, Default)]
pub struct AdminContext {
    pub post: Option<Post>,
    pub blog: Option<Blog>,
    pub user: Option<User>,
}

impl AdminContext {
    /// Base URL that relative links and image references are rooted at.
    ///
    /// Falls back to `fallback` (usually the server URL the client talks to)
    /// until the blog settings have been loaded.
    pub fn blog_url<'a>(&'a self, fallback: &'a str) -> &'a str {
        match &self.blog {
            Some(blog) if !blog.url.is_empty() => &blog.url,
            _ => fallback,
        }
    }

    /// Store a freshly loaded blog after preparing it for editing.
    pub fn set_blog(&mut self, mut blog: Blog) -> &mut Blog {
        blog.prepare();
        self.blog.insert(blog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_url_falls_back_until_loaded() {
        let mut context = AdminContext::default();
        assert_eq!(context.blog_url("http://127.0.0.1:8084"), "http://127.0.0.1:8084");

        context.set_blog(Blog {
            url: "https://blog.example.com".to_string(),
            ..Default::default()
        });
        assert_eq!(
            context.blog_url("http://127.0.0.1:8084"),
            "https://blog.example.com"
        );
    }

    #[test]
    fn test_empty_blog_url_falls_back() {
        let mut context = AdminContext::default();
        context.set_blog(Blog::default());
        assert_eq!(context.blog_url("http://fallback"), "http://fallback");
    }

    #[test]
    fn test_set_blog_prepares_navigation() {
        let mut context = AdminContext::default();
        let mut blog = Blog {
            url: "https://blog.example.com".to_string(),
            ..Default::default()
        };
        blog.add_nav_item(Some("About"), Some("https://blog.example.com/about"));
        blog.navigation_items[0].url = "about".to_string();

        let stored = context.set_blog(blog);
        assert_eq!(stored.navigation_items[0].url, "https://blog.example.com/about");
    }
}
