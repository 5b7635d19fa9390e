//! Blog settings
//!
//! The settings view loads the blog, roots every navigation link at the blog
//! URL for display, lets the operator edit it, and sends it back as a whole.

use serde::{Deserialize, Serialize};

use crate::url::{home_url, normalize};

/// Label of a freshly added navigation item.
pub const DEFAULT_NAV_LABEL: &str = "Home";

/// Error type for settings edits
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Navigation item {index} does not exist ({len} items)")]
    NavIndexOutOfRange { index: usize, len: usize },

    #[error("Theme '{0}' is not installed")]
    UnknownTheme(String),

    #[error("Posts per page must be at least 1")]
    InvalidPostsPerPage,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// One entry of the blog's navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub label: String,
    pub url: String,
}

/// Blog-wide settings as exchanged with the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Blog {
    #[serde(rename = "url", alias = "Url")]
    pub url: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Logo")]
    pub logo: String,
    #[serde(rename = "Cover")]
    pub cover: String,
    #[serde(rename = "Themes")]
    pub themes: Vec<String>,
    #[serde(rename = "ActiveTheme")]
    pub active_theme: String,
    #[serde(rename = "PostsPerPage")]
    pub posts_per_page: i64,
    #[serde(rename = "NavigationItems", deserialize_with = "null_as_empty")]
    pub navigation_items: Vec<NavigationItem>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Blog {
    /// Prepare a freshly loaded blog for editing.
    ///
    /// Roots every navigation URL at the blog URL and makes sure the active
    /// theme is one of the installed themes.
    pub fn prepare(&mut self) {
        self.normalize_navigation();

        if !self.themes.contains(&self.active_theme) {
            self.active_theme = self.themes.first().cloned().unwrap_or_default();
        }
    }

    pub fn normalize_navigation(&mut self) {
        for item in &mut self.navigation_items {
            item.url = normalize(&item.url, &self.url);
        }
    }

    /// Append a navigation item. Without a URL it points to the blog's home.
    pub fn add_nav_item(&mut self, label: Option<&str>, url: Option<&str>) -> &NavigationItem {
        let url = match url {
            Some(url) => normalize(url, &self.url),
            None => home_url(&self.url),
        };
        self.navigation_items.push(NavigationItem {
            label: label.unwrap_or(DEFAULT_NAV_LABEL).to_string(),
            url,
        });
        &self.navigation_items[self.navigation_items.len() - 1]
    }

    pub fn remove_nav_item(&mut self, index: usize) -> Result<NavigationItem, SettingsError> {
        let len = self.navigation_items.len();
        if index >= len {
            return Err(SettingsError::NavIndexOutOfRange { index, len });
        }
        Ok(self.navigation_items.remove(index))
    }

    pub fn set_active_theme(&mut self, theme: &str) -> Result<(), SettingsError> {
        if !self.themes.iter().any(|t| t == theme) {
            return Err(SettingsError::UnknownTheme(theme.to_string()));
        }
        self.active_theme = theme.to_string();
        Ok(())
    }

    pub fn set_posts_per_page(&mut self, count: i64) -> Result<(), SettingsError> {
        if count < 1 {
            return Err(SettingsError::InvalidPostsPerPage);
        }
        self.posts_per_page = count;
        Ok(())
    }

    pub fn set_logo(&mut self, image: &str) {
        self.logo = normalize(image, &self.url);
    }

    pub fn set_cover(&mut self, image: &str) {
        self.cover = normalize(image, &self.url);
    }
}
