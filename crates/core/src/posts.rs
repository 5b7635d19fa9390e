use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::url::normalize;

/// A post as exchanged with the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Post {
    #[serde(rename = "ID", alias = "Id")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Slug")]
    pub slug: String,
    #[serde(rename = "Markdown")]
    pub markdown: String,
    #[serde(rename = "HTML", skip_serializing_if = "String::is_empty")]
    pub html: String,
    #[serde(rename = "IsFeatured")]
    pub is_featured: bool,
    #[serde(rename = "IsPage")]
    pub is_page: bool,
    #[serde(rename = "IsPublished")]
    pub is_published: bool,
    /// Cover image.
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "MetaDescription")]
    pub meta_description: String,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    /// Comma separated tag names.
    #[serde(rename = "Tags")]
    pub tags: String,
}

impl Post {
    /// Starting point of the post editor.
    pub fn draft() -> Self {
        Self {
            title: "New Post".to_string(),
            markdown: "Write something!".to_string(),
            ..Default::default()
        }
    }

    /// Append an image reference to the markdown body, rooted at `blog_url`.
    pub fn insert_image(&mut self, image: &str, blog_url: &str) {
        self.markdown = append_image(&self.markdown, &normalize(image, blog_url));
    }

    /// Set the cover image, rooted at `blog_url`.
    pub fn set_cover(&mut self, image: &str, blog_url: &str) {
        self.image = normalize(image, blog_url);
    }

    pub fn clear_cover(&mut self) {
        self.image.clear();
    }

    /// Tags split on commas, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Markdown with an image block appended after a blank line.
pub fn append_image(markdown: &str, image_url: &str) -> String {
    format!("{markdown}\n\n![]({image_url})\n\n")
}

/// Human readable publication date, if the API sent a parseable one.
pub fn format_date(date: Option<&str>) -> Option<String> {
    let date = date?;
    let parsed = DateTime::parse_from_rfc3339(date).ok()?;
    Some(parsed.format("%Y-%m-%d %H:%M").to_string())
}

/// Short status label shown in post listings.
pub fn status_label(post: &Post) -> &'static str {
    match (post.is_published, post.is_page) {
        (true, true) => "page",
        (true, false) => "published",
        (false, _) => "draft",
    }
}

/// Loaded posts minus the ones deleted since they were loaded.
pub fn visible_posts<'a>(items: &'a [Post], deleted: &HashSet<i64>) -> Vec<&'a Post> {
    items
        .iter()
        .filter(|post| !deleted.contains(&post.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: i64, title: &str) -> Post {
        Post {
            id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_draft_defaults() {
        let draft = Post::draft();
        assert_eq!(draft.title, "New Post");
        assert_eq!(draft.markdown, "Write something!");
        assert_eq!(draft.slug, "");
        assert_eq!(draft.image, "");
        assert_eq!(draft.tags, "");
        assert!(!draft.is_published);
        assert_eq!(draft.id, 0);
    }

    #[test]
    fn test_deserialize_api_post() {
        let json = r##"{
            "ID": 7,
            "Title": "Hello",
            "Slug": "hello",
            "Markdown": "# Hi",
            "HTML": "<h1>Hi</h1>",
            "IsFeatured": false,
            "IsPage": false,
            "IsPublished": true,
            "Image": "/images/cover.jpg",
            "MetaDescription": "",
            "Date": "2015-05-04T10:00:00Z",
            "Tags": "rust, web"
        }"##;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.title, "Hello");
        assert!(post.is_published);
        assert_eq!(post.tag_list(), vec!["rust", "web"]);
        assert_eq!(post.date.as_deref(), Some("2015-05-04T10:00:00Z"));
    }

    #[test]
    fn test_deserialize_tolerates_missing_fields_and_id_alias() {
        let post: Post = serde_json::from_str(r#"{"Id": 3, "Title": "x", "Date": null}"#).unwrap();
        assert_eq!(post.id, 3);
        assert_eq!(post.markdown, "");
        assert_eq!(post.date, None);
    }

    #[test]
    fn test_serialize_uses_api_field_names() {
        let value = serde_json::to_value(Post::draft()).unwrap();
        assert_eq!(value["Title"], "New Post");
        assert_eq!(value["IsPublished"], false);
        assert_eq!(value["ID"], 0);
        assert!(value.get("HTML").is_none());
    }

    #[test]
    fn test_insert_image_appends_rooted_reference() {
        let mut post = Post::draft();
        post.insert_image("/images/a.png", "http://blog.local");
        assert_eq!(
            post.markdown,
            "Write something!\n\n![](http://blog.local/images/a.png)\n\n"
        );
    }

    #[test]
    fn test_set_and_clear_cover() {
        let mut post = Post::draft();
        post.set_cover("images/c.jpg", "http://blog.local");
        assert_eq!(post.image, "http://blog.local/images/c.jpg");
        post.set_cover("https://cdn.example.com/c.jpg", "http://blog.local");
        assert_eq!(post.image, "https://cdn.example.com/c.jpg");
        post.clear_cover();
        assert_eq!(post.image, "");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(
            format_date(Some("2015-05-04T10:30:00Z")),
            Some("2015-05-04 10:30".to_string())
        );
        assert_eq!(format_date(Some("yesterday")), None);
        assert_eq!(format_date(None), None);
    }

    #[test]
    fn test_status_label() {
        let mut p = post(1, "a");
        assert_eq!(status_label(&p), "draft");
        p.is_published = true;
        assert_eq!(status_label(&p), "published");
        p.is_page = true;
        assert_eq!(status_label(&p), "page");
    }

    #[test]
    fn test_visible_posts_skips_deleted() {
        let items = vec![post(1, "a"), post(2, "b"), post(3, "c")];
        let deleted: HashSet<i64> = [2].into_iter().collect();
        let titles: Vec<&str> = visible_posts(&items, &deleted)
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
    }
}
