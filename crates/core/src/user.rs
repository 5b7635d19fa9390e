use serde::{Deserialize, Serialize};

use crate::blog::SettingsError;
use crate::url::normalize;

/// Response of the "who am I" endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserId {
    #[serde(rename = "Id", alias = "ID")]
    pub id: i64,
}

/// The authenticated user's profile as exchanged with the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct User {
    #[serde(rename = "ID", alias = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Slug")]
    pub slug: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Image")]
    pub image: String,
    #[serde(rename = "Cover")]
    pub cover: String,
    #[serde(rename = "Bio")]
    pub bio: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Location")]
    pub location: String,
    /// Only sent when changing the password; empty means unchanged.
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "PasswordRepeated")]
    pub password_repeated: String,
}

impl User {
    pub fn set_image(&mut self, image: &str, blog_url: &str) {
        self.image = normalize(image, blog_url);
    }

    pub fn set_cover(&mut self, image: &str, blog_url: &str) {
        self.cover = normalize(image, blog_url);
    }

    /// Stage a password change. Both entries must match.
    pub fn change_password(&mut self, password: &str, repeated: &str) -> Result<(), SettingsError> {
        if password != repeated {
            return Err(SettingsError::PasswordMismatch);
        }
        self.password = password.to_string();
        self.password_repeated = repeated.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_field_name() {
        let id: UserId = serde_json::from_str(r#"{"Id": 1}"#).unwrap();
        assert_eq!(id.id, 1);
    }

    #[test]
    fn test_deserialize_user_without_password() {
        let json = r#"{"ID":1,"Name":"kai","Slug":"kai","Email":"kai@example.com","Image":"/images/me.png","Cover":"","Bio":"","Website":"","Location":""}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.name, "kai");
        assert_eq!(user.password, "");
    }

    #[test]
    fn test_change_password() {
        let mut user = User::default();
        assert_eq!(
            user.change_password("secret", "secrit"),
            Err(SettingsError::PasswordMismatch)
        );
        assert_eq!(user.password, "");

        user.change_password("secret", "secret").unwrap();
        assert_eq!(user.password, "secret");
        assert_eq!(user.password_repeated, "secret");
    }

    #[test]
    fn test_images_are_rooted() {
        let mut user = User::default();
        user.set_image("images/me.png", "http://blog.local");
        user.set_cover("/images/bg.jpg", "http://blog.local/");
        assert_eq!(user.image, "http://blog.local/images/me.png");
        assert_eq!(user.cover, "http://blog.local//images/bg.jpg");
    }
}
