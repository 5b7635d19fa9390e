use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Body of an image deletion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteImageRequest {
    #[serde(rename = "Filename")]
    pub filename: String,
}

impl DeleteImageRequest {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// Last path segment of an image reference.
pub fn file_name(image: &str) -> &str {
    image.rsplit('/').next().unwrap_or(image)
}

/// Whether a gallery entry refers to `wanted`, either by its full path or by
/// its file name. The server deletes by file name.
pub fn matches_image(entry: &str, wanted: &str) -> bool {
    entry == wanted || file_name(entry) == file_name(wanted)
}

/// Loaded gallery entries minus the ones deleted since they were loaded.
pub fn visible_images<'a>(items: &'a [String], deleted: &HashSet<String>) -> Vec<&'a str> {
    items
        .iter()
        .filter(|image| !deleted.contains(*image))
        .map(String::as_str)
        .collect()
}

/// Which gallery image is highlighted.
///
/// Local to one gallery: picking an image only changes this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSelection {
    selected: Option<String>,
}

impl ImageSelection {
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Highlight `image` if it is part of `visible`; returns whether it was.
    pub fn select(&mut self, image: &str, visible: &[&str]) -> bool {
        match visible.iter().find(|entry| matches_image(entry, image)) {
            Some(entry) => {
                self.selected = Some((*entry).to_string());
                true
            }
            None => false,
        }
    }

    /// Highlight the first visible image, or nothing when the gallery is empty.
    pub fn select_first(&mut self, visible: &[&str]) {
        self.selected = visible.first().map(|image| (*image).to_string());
    }

    /// Keep the current selection if it is still visible, otherwise fall back
    /// to the first visible image.
    pub fn refresh(&mut self, visible: &[&str]) {
        let still_visible = self
            .selected
            .as_deref()
            .is_some_and(|current| visible.contains(&current));
        if !still_visible {
            self.select_first(visible);
        }
    }
}
