//! HTTP access to the blog's admin API
//!
//! Every endpoint the views use goes through [`AdminClient`]. Responses with a
//! non-success status are turned into [`Error::Status`] so callers can tell a
//! refused request from a transport failure.

use crate::config::AdminConfig;
use crate::error::Error;
use crate::loader::PageFetcher;
use blogadmin_core::blog::Blog;
use blogadmin_core::images::DeleteImageRequest;
use blogadmin_core::posts::Post;
use blogadmin_core::user::{User, UserId};
use futures::future::BoxFuture;
use log::debug;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::Path;

pub const POSTS_PAGE_PATH: &str = "/admin/api/posts/";
pub const IMAGES_PAGE_PATH: &str = "/admin/api/images/";
const POST_PATH: &str = "/admin/api/post";
const UPLOAD_PATH: &str = "/admin/api/upload";
const IMAGE_PATH: &str = "/admin/api/image";
const BLOG_PATH: &str = "/admin/api/blog";
const USER_ID_PATH: &str = "/admin/api/userid";
const USER_PATH: &str = "/admin/api/user";

/// Form field name used for uploaded files.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
}

/// Create an HTTP client carrying the session cookie and timeout
pub fn create_admin_client(config: &AdminConfig) -> Result<reqwest::Client, Error> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(session) = &config.session {
        headers.insert(
            COOKIE,
            HeaderValue::from_str(session)
                .map_err(|e| Error::Generic(format!("Invalid session cookie: {e}")))?,
        );
    }

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|e| Error::Generic(format!("Failed to build HTTP client: {e}")))
}

impl AdminClient {
    pub fn new(config: &AdminConfig) -> Result<Self, Error> {
        Ok(Self {
            http: create_admin_client(config)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, Error> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        Ok(response)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{method} {url}");
        self.http.request(method, url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self.send(self.request(Method::GET, path)).await?;
        response.json().await.map_err(|e| Error::Decode(e.to_string()))
    }

    pub async fn post(&self, id: i64) -> Result<Post, Error> {
        self.get_json(&format!("{POST_PATH}/{id}")).await
    }

    pub async fn create_post(&self, post: &Post) -> Result<(), Error> {
        self.send(self.request(Method::POST, POST_PATH).json(post))
            .await?;
        Ok(())
    }

    pub async fn update_post(&self, post: &Post) -> Result<(), Error> {
        self.send(self.request(Method::PATCH, POST_PATH).json(post))
            .await?;
        Ok(())
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), Error> {
        self.send(self.request(Method::DELETE, &format!("{POST_PATH}/{id}")))
            .await?;
        Ok(())
    }

    /// Upload image files. Returns the server paths of the stored images.
    pub async fn upload_images(&self, files: &[impl AsRef<Path>]) -> Result<Vec<String>, Error> {
        let mut form = reqwest::multipart::Form::new();
        for file in files {
            let file = file.as_ref();
            let bytes = tokio::fs::read(file).await?;
            let name = file
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| Error::Io(format!("Not a file: {}", file.display())))?
                .to_string();
            form = form.part(
                UPLOAD_FIELD,
                reqwest::multipart::Part::bytes(bytes).file_name(name),
            );
        }

        let response = self
            .send(self.request(Method::POST, UPLOAD_PATH).multipart(form))
            .await?;
        response.json().await.map_err(|e| Error::Decode(e.to_string()))
    }

    pub async fn delete_image(&self, filename: &str) -> Result<(), Error> {
        let body = DeleteImageRequest::new(filename);
        self.send(self.request(Method::DELETE, IMAGE_PATH).json(&body))
            .await?;
        Ok(())
    }

    pub async fn blog(&self) -> Result<Blog, Error> {
        self.get_json(BLOG_PATH).await
    }

    pub async fn update_blog(&self, blog: &Blog) -> Result<(), Error> {
        self.send(self.request(Method::PATCH, BLOG_PATH).json(blog))
            .await?;
        Ok(())
    }

    /// The authenticated user: id lookup first, then the profile.
    pub async fn current_user(&self) -> Result<User, Error> {
        let UserId { id } = self.get_json(USER_ID_PATH).await?;
        self.get_json(&format!("{USER_PATH}/{id}")).await
    }

    pub async fn update_user(&self, user: &User) -> Result<(), Error> {
        self.send(self.request(Method::PATCH, USER_PATH).json(user))
            .await?;
        Ok(())
    }
}

impl<T> PageFetcher<T> for AdminClient
where
    T: DeserializeOwned + Send + 'static,
{
    fn fetch_page<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<T>, Error>> {
        Box::pin(async move {
            debug!("GET {url}");
            let response = self.send(self.http.get(url)).await?;
            response
                .json::<Vec<T>>()
                .await
                .map_err(|e| Error::Decode(e.to_string()))
        })
    }
}
