use crate::client::AdminClient;
use crate::prelude::{println, *};
use blogadmin_core::blog::Blog;
use blogadmin_core::context::AdminContext;
use blogadmin_core::user::User;
use colored::Colorize;

#[derive(Debug, clap::Parser)]
#[command(name = "settings")]
#[command(about = "Blog and user settings")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Show blog settings and navigation
    #[clap(name = "show")]
    Show(ShowOptions),

    /// Change blog settings
    #[clap(name = "set")]
    Set(BlogFields),

    /// Edit the navigation menu
    #[clap(subcommand)]
    Nav(NavCommands),

    /// Show or edit the authenticated user
    #[clap(subcommand)]
    User(UserCommands),
}

#[derive(Debug, clap::Subcommand)]
pub enum NavCommands {
    /// Append a navigation item (defaults to "Home" linking to the blog root)
    #[clap(name = "add")]
    Add(NavAddOptions),

    /// Remove a navigation item by its position, starting at 0
    #[clap(name = "remove")]
    Remove(NavRemoveOptions),
}

#[derive(Debug, clap::Subcommand)]
pub enum UserCommands {
    /// Show the authenticated user
    #[clap(name = "show")]
    Show(ShowOptions),

    /// Change the authenticated user's profile
    #[clap(name = "set")]
    Set(UserFields),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ShowOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct BlogFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Logo image (path or URL)
    #[arg(long)]
    pub logo: Option<String>,

    /// Cover image (path or URL)
    #[arg(long)]
    pub cover: Option<String>,

    #[arg(long)]
    pub posts_per_page: Option<i64>,

    /// Active theme, one of the installed themes
    #[arg(long)]
    pub theme: Option<String>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct NavAddOptions {
    #[arg(long)]
    pub label: Option<String>,

    /// Link target, relative links are rooted at the blog URL
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct NavRemoveOptions {
    pub index: usize,
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    #[arg(long)]
    pub website: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Profile image (path or URL)
    #[arg(long)]
    pub image: Option<String>,

    /// Profile cover image (path or URL)
    #[arg(long)]
    pub cover: Option<String>,

    /// New password, must be given together with --password-repeated
    #[arg(long, requires = "password_repeated")]
    pub password: Option<String>,

    #[arg(long, requires = "password")]
    pub password_repeated: Option<String>,
}

/// Module entry point
pub async fn run(
    app: App,
    client: &AdminClient,
    context: &mut AdminContext,
    global: &crate::Global,
) -> Result<()> {
    if global.verbose {
        println!("Blog admin API: {}", client.base_url());
    }

    match app.command {
        Commands::Show(options) => show_handler(options, client, context).await,
        Commands::Set(fields) => set_handler(fields, client, context).await,
        Commands::Nav(NavCommands::Add(options)) => nav_add_handler(options, client, context).await,
        Commands::Nav(NavCommands::Remove(options)) => {
            nav_remove_handler(options, client, context).await
        }
        Commands::User(UserCommands::Show(options)) => {
            user_show_handler(options, client, context).await
        }
        Commands::User(UserCommands::Set(fields)) => {
            user_set_handler(fields, client, context).await
        }
    }
}

/// Load the blog settings into the context, ready for editing.
pub async fn load_blog<'a>(
    client: &AdminClient,
    context: &'a mut AdminContext,
) -> Result<&'a mut Blog> {
    let blog = client.blog().await?;
    Ok(context.set_blog(blog))
}

/// Load the authenticated user into the context.
pub async fn load_user<'a>(
    client: &AdminClient,
    context: &'a mut AdminContext,
) -> Result<&'a mut User> {
    let user = client.current_user().await?;
    Ok(context.user.insert(user))
}

/// Save whatever settings the context holds: the blog first, then the user.
pub async fn save_settings(client: &AdminClient, context: &AdminContext) -> Result<()> {
    if let Some(blog) = &context.blog {
        client.update_blog(blog).await?;
        println!("Blog settings saved");
    }
    if let Some(user) = &context.user {
        client.update_user(user).await?;
        println!("User settings saved");
    }
    Ok(())
}

/// Apply command line fields to the blog settings.
pub fn apply_blog_fields(blog: &mut Blog, fields: &BlogFields) -> Result<()> {
    if let Some(title) = &fields.title {
        blog.title = title.clone();
    }
    if let Some(description) = &fields.description {
        blog.description = description.clone();
    }
    if let Some(logo) = &fields.logo {
        blog.set_logo(logo);
    }
    if let Some(cover) = &fields.cover {
        blog.set_cover(cover);
    }
    if let Some(count) = fields.posts_per_page {
        blog.set_posts_per_page(count)?;
    }
    if let Some(theme) = &fields.theme {
        blog.set_active_theme(theme)?;
    }
    Ok(())
}

/// Apply command line fields to the user profile, rooting images at `blog_url`.
pub fn apply_user_fields(user: &mut User, fields: &UserFields, blog_url: &str) -> Result<()> {
    let text_fields = [
        (&fields.name, &mut user.name),
        (&fields.slug, &mut user.slug),
        (&fields.email, &mut user.email),
        (&fields.bio, &mut user.bio),
        (&fields.website, &mut user.website),
        (&fields.location, &mut user.location),
    ];
    for (value, target) in text_fields {
        if let Some(value) = value {
            *target = value.clone();
        }
    }

    if let Some(image) = &fields.image {
        user.set_image(image, blog_url);
    }
    if let Some(cover) = &fields.cover {
        user.set_cover(cover, blog_url);
    }
    if let (Some(password), Some(repeated)) = (&fields.password, &fields.password_repeated) {
        user.change_password(password, repeated)?;
    }
    Ok(())
}

async fn show_handler(
    options: ShowOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let blog = load_blog(client, context).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(blog)?);
        return Ok(());
    }

    print_blog(blog);
    Ok(())
}

fn print_blog(blog: &Blog) {
    let mut table = new_table();
    table.add_row(prettytable::row!["URL", blog.url]);
    table.add_row(prettytable::row!["Title", blog.title]);
    table.add_row(prettytable::row!["Description", blog.description]);
    table.add_row(prettytable::row!["Logo", blog.logo]);
    table.add_row(prettytable::row!["Cover", blog.cover]);
    table.add_row(prettytable::row!["Posts per page", blog.posts_per_page]);
    table.add_row(prettytable::row!["Theme", blog.active_theme]);
    table.add_row(prettytable::row!["Installed themes", blog.themes.join(", ")]);
    table.printstd();

    println!("\n{}", "Navigation".bold());
    if blog.navigation_items.is_empty() {
        println!("  (empty)");
    }
    for (index, item) in blog.navigation_items.iter().enumerate() {
        println!("  [{}] {} -> {}", index, item.label, item.url);
    }
}

async fn set_handler(
    fields: BlogFields,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let blog = load_blog(client, context).await?;
    apply_blog_fields(blog, &fields)?;

    save_settings(client, context).await?;

    Ok(())
}

async fn nav_add_handler(
    options: NavAddOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let blog = load_blog(client, context).await?;
    let item = blog
        .add_nav_item(options.label.as_deref(), options.url.as_deref())
        .clone();

    client.update_blog(blog).await?;
    println!("Added navigation item {} -> {}", item.label, item.url);

    Ok(())
}

async fn nav_remove_handler(
    options: NavRemoveOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let blog = load_blog(client, context).await?;
    let item = blog.remove_nav_item(options.index)?;

    client.update_blog(blog).await?;
    println!("Removed navigation item {} -> {}", item.label, item.url);

    Ok(())
}

async fn user_show_handler(
    options: ShowOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let user = load_user(client, context).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(user)?);
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["ID", user.id]);
    table.add_row(prettytable::row!["Name", user.name]);
    table.add_row(prettytable::row!["Slug", user.slug]);
    table.add_row(prettytable::row!["Email", user.email]);
    table.add_row(prettytable::row!["Image", user.image]);
    table.add_row(prettytable::row!["Cover", user.cover]);
    table.add_row(prettytable::row!["Bio", user.bio]);
    table.add_row(prettytable::row!["Website", user.website]);
    table.add_row(prettytable::row!["Location", user.location]);
    table.printstd();

    Ok(())
}

async fn user_set_handler(
    fields: UserFields,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    if fields.image.is_some() || fields.cover.is_some() {
        load_blog(client, context).await?;
    }
    let blog_url = context.blog_url(client.base_url()).to_string();

    let user = load_user(client, context).await?;
    apply_user_fields(user, &fields, &blog_url)?;

    save_settings(client, context).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{Json, Router};
    use blogadmin_core::blog::{NavigationItem, SettingsError};
    use std::sync::{Arc, Mutex};

    fn blog() -> Blog {
        Blog {
            url: "https://blog.example.com".to_string(),
            themes: vec!["casper".to_string()],
            active_theme: "casper".to_string(),
            posts_per_page: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_apply_blog_fields() {
        let mut b = blog();
        let fields = BlogFields {
            title: Some("New title".to_string()),
            logo: Some("images/logo.png".to_string()),
            posts_per_page: Some(8),
            theme: Some("casper".to_string()),
            ..Default::default()
        };
        apply_blog_fields(&mut b, &fields).unwrap();
        assert_eq!(b.title, "New title");
        assert_eq!(b.logo, "https://blog.example.com/images/logo.png");
        assert_eq!(b.posts_per_page, 8);
    }

    #[test]
    fn test_apply_blog_fields_rejects_unknown_theme() {
        let mut b = blog();
        let fields = BlogFields {
            theme: Some("missing".to_string()),
            ..Default::default()
        };
        let err = apply_blog_fields(&mut b, &fields).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SettingsError>(),
            Some(&SettingsError::UnknownTheme("missing".to_string()))
        );
    }

    #[test]
    fn test_apply_user_fields() {
        let mut user = User {
            id: 1,
            name: "old".to_string(),
            email: "old@example.com".to_string(),
            ..Default::default()
        };
        let fields = UserFields {
            name: Some("kai".to_string()),
            image: Some("/images/me.png".to_string()),
            password: Some("pw".to_string()),
            password_repeated: Some("pw".to_string()),
            ..Default::default()
        };
        apply_user_fields(&mut user, &fields, "https://blog.example.com").unwrap();
        assert_eq!(user.name, "kai");
        assert_eq!(user.email, "old@example.com");
        assert_eq!(user.image, "https://blog.example.com/images/me.png");
        assert_eq!(user.password, "pw");
    }

    #[test]
    fn test_apply_user_fields_password_mismatch() {
        let mut user = User::default();
        let fields = UserFields {
            password: Some("pw".to_string()),
            password_repeated: Some("wp".to_string()),
            ..Default::default()
        };
        assert!(apply_user_fields(&mut user, &fields, "http://x").is_err());
        assert_eq!(user.password, "");
    }

    #[tokio::test]
    async fn test_load_blog_prepares_navigation_and_patch_sends_it() {
        let saved: Arc<Mutex<Option<Blog>>> = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&saved);

        let router = Router::new().route(
            "/admin/api/blog",
            get(|| async {
                Json(serde_json::json!({
                    "url": "https://blog.example.com",
                    "Title": "Example",
                    "Themes": ["casper"],
                    "ActiveTheme": "casper",
                    "PostsPerPage": 5,
                    "NavigationItems": [{ "label": "About", "url": "about" }]
                }))
            })
            .patch(move |Json(blog): Json<Blog>| async move {
                *sink.lock().unwrap() = Some(blog);
                "Blog settings updated!"
            }),
        );
        let client = crate::client::tests::serve(router).await;
        let mut context = AdminContext::default();

        let blog = load_blog(&client, &mut context).await.unwrap();
        assert_eq!(
            blog.navigation_items,
            vec![NavigationItem {
                label: "About".to_string(),
                url: "https://blog.example.com/about".to_string(),
            }]
        );

        blog.add_nav_item(None, None);
        client.update_blog(blog).await.unwrap();

        let saved = saved.lock().unwrap().clone().unwrap();
        assert_eq!(saved.navigation_items.len(), 2);
        assert_eq!(saved.navigation_items[1].label, "Home");
        assert_eq!(saved.navigation_items[1].url, "https://blog.example.com/");
        assert_eq!(context.blog_url("http://fallback"), "https://blog.example.com");
    }

    #[tokio::test]
    async fn test_save_settings_patches_blog_then_user() {
        let calls: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let blog_calls = Arc::clone(&calls);
        let user_calls = Arc::clone(&calls);

        let router = Router::new()
            .route(
                "/admin/api/blog",
                axum::routing::patch(move |Json(blog): Json<Blog>| async move {
                    blog_calls.lock().unwrap().push(f!("blog {}", blog.title));
                    "Blog settings updated!"
                }),
            )
            .route(
                "/admin/api/user",
                axum::routing::patch(move |Json(user): Json<User>| async move {
                    user_calls.lock().unwrap().push(f!("user {}", user.name));
                    "User settings updated!"
                }),
            );
        let client = crate::client::tests::serve(router).await;

        let mut context = AdminContext::default();
        save_settings(&client, &context).await.unwrap();
        assert!(calls.lock().unwrap().is_empty());

        context.set_blog(Blog {
            title: "Example".to_string(),
            ..blog()
        });
        context.user = Some(User {
            id: 1,
            name: "kai".to_string(),
            ..Default::default()
        });
        save_settings(&client, &context).await.unwrap();
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["blog Example".to_string(), "user kai".to_string()]
        );
    }
}
