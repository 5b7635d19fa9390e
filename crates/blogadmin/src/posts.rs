use crate::client::{AdminClient, POSTS_PAGE_PATH};
use crate::loader::{PageFetcher, PageLoader};
use crate::prelude::{println, *};
use blogadmin_core::context::AdminContext;
use blogadmin_core::pagination::LoaderState;
use blogadmin_core::posts::{format_date, status_label, visible_posts, Post};
use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "posts")]
#[command(about = "List, create, edit and delete posts")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List posts, newest first
    #[clap(name = "list")]
    List(ListOptions),

    /// Show a single post
    #[clap(name = "show")]
    Show(ShowOptions),

    /// Create a new post
    #[clap(name = "create")]
    Create(PostFields),

    /// Edit an existing post
    #[clap(name = "edit")]
    Edit(EditOptions),

    /// Delete a post
    #[clap(name = "delete")]
    Delete(DeleteOptions),
}

#[derive(Debug, clap::Args, Clone)]
pub struct ListOptions {
    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pub pages: usize,

    /// Load every page
    #[arg(long, conflicts_with = "pages")]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct ShowOptions {
    /// Post ID
    pub id: i64,

    /// Print only the markdown body
    #[arg(long, conflicts_with = "json")]
    pub markdown: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Post fields settable from the command line
#[derive(Debug, clap::Args, Clone, Default)]
pub struct PostFields {
    #[arg(long)]
    pub title: Option<String>,

    /// Custom slug (the server derives one from the title when empty)
    #[arg(long)]
    pub slug: Option<String>,

    /// Markdown body
    #[arg(long, conflicts_with = "markdown_file")]
    pub markdown: Option<String>,

    /// Read the markdown body from a file
    #[arg(long)]
    pub markdown_file: Option<PathBuf>,

    /// Comma separated tags
    #[arg(long)]
    pub tags: Option<String>,

    #[arg(long)]
    pub meta_description: Option<String>,

    #[arg(long)]
    pub published: Option<bool>,

    #[arg(long)]
    pub featured: Option<bool>,

    /// Publish as a static page instead of a post
    #[arg(long)]
    pub page: Option<bool>,

    /// Cover image (path or URL)
    #[arg(long, conflicts_with = "clear_cover")]
    pub cover: Option<String>,

    /// Remove the cover image
    #[arg(long)]
    pub clear_cover: bool,

    /// Append an image to the markdown body (repeatable)
    #[arg(long = "insert-image", value_name = "IMAGE")]
    pub insert_images: Vec<String>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct EditOptions {
    /// Post ID
    pub id: i64,

    #[clap(flatten)]
    pub fields: PostFields,
}

#[derive(Debug, clap::Args, Clone)]
pub struct DeleteOptions {
    /// Post ID
    pub id: i64,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// The content view: posts loaded page by page, minus deleted ones.
pub struct PostList<F> {
    loader: PageLoader<Post, F>,
    deleted: HashSet<i64>,
}

impl PostList<AdminClient> {
    pub fn for_client(client: &AdminClient) -> Self {
        Self::new(client.url(POSTS_PAGE_PATH), client.clone())
    }
}

impl<F: PageFetcher<Post>> PostList<F> {
    pub fn new(resource_url: String, fetcher: F) -> Self {
        Self {
            loader: PageLoader::new(resource_url, fetcher),
            deleted: HashSet::new(),
        }
    }

    /// Load up to `pages` more pages, or all remaining pages on `None`.
    pub async fn load(&self, pages: Option<usize>) -> Result<usize, Error> {
        self.loader.load_pages(pages).await
    }

    pub fn visible(&self) -> Vec<Post> {
        self.loader.with_items(|items| {
            visible_posts(items, &self.deleted)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Find a visible post by id, loading further pages as needed.
    pub async fn find(&self, id: i64) -> Result<Option<Post>, Error> {
        loop {
            if let Some(post) = self.visible().into_iter().find(|p| p.id == id) {
                return Ok(Some(post));
            }
            if self.loader.load_pages(Some(1)).await? == 0 {
                return Ok(None);
            }
        }
    }

    /// Drop a deleted post from the view.
    pub fn forget(&mut self, id: i64) {
        self.deleted.insert(id);
    }

    pub fn state(&self) -> LoaderState {
        self.loader.state()
    }

    pub fn next_page(&self) -> u64 {
        self.loader.page()
    }
}

#[derive(Debug, Serialize)]
pub struct PostListOutput {
    pub posts: Vec<Post>,
    pub next_page: u64,
    pub state: LoaderState,
}

/// Module entry point
pub async fn run(
    app: App,
    client: &AdminClient,
    context: &mut AdminContext,
    global: &crate::Global,
) -> Result<()> {
    if global.verbose {
        println!("Posts endpoint: {}", client.url(POSTS_PAGE_PATH));
    }

    match app.command {
        Commands::List(options) => list_handler(options, client).await,
        Commands::Show(options) => show_handler(options, client, context).await,
        Commands::Create(fields) => create_handler(fields, client, context).await,
        Commands::Edit(options) => edit_handler(options, client, context).await,
        Commands::Delete(options) => delete_handler(options, client, context).await,
    }
}

/// Loads the requested pages of the post list
pub async fn list_posts_data(client: &AdminClient, pages: Option<usize>) -> Result<PostListOutput> {
    let list = PostList::for_client(client);
    list.load(pages).await?;

    Ok(PostListOutput {
        posts: list.visible(),
        next_page: list.next_page(),
        state: list.state(),
    })
}

async fn list_handler(options: ListOptions, client: &AdminClient) -> Result<()> {
    let pages = if options.all { None } else { Some(options.pages) };
    let data = list_posts_data(client, pages).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if data.posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }

    let mut table = new_table();
    table.add_row(prettytable::row!["ID", "Title", "Status", "Date", "Tags"]);
    for post in &data.posts {
        table.add_row(prettytable::row![
            post.id,
            post.title,
            status_label(post),
            format_date(post.date.as_deref()).unwrap_or_else(|| "-".to_string()),
            post.tag_list().join(", ")
        ]);
    }
    table.printstd();

    if data.state == LoaderState::Idle {
        println!(
            "\n{}",
            f!("More posts may follow: --pages {}", data.next_page).dimmed()
        );
    }

    Ok(())
}

async fn show_handler(
    options: ShowOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let post = context.post.insert(client.post(options.id).await?);

    if options.json {
        println!("{}", serde_json::to_string_pretty(post)?);
    } else if options.markdown {
        println!("{}", post.markdown);
    } else {
        print_post(post);
    }

    Ok(())
}

fn print_post(post: &Post) {
    println!("{}", post.title.bold());
    println!("{}", "=".repeat(post.title.chars().count().max(3)).dimmed());
    println!("ID:        {}", post.id);
    println!("Slug:      {}", post.slug);
    println!("Status:    {}", status_label(post));
    if let Some(date) = format_date(post.date.as_deref()) {
        println!("Date:      {}", date);
    }
    if !post.tags.is_empty() {
        println!("Tags:      {}", post.tag_list().join(", "));
    }
    if !post.image.is_empty() {
        println!("Cover:     {}", post.image);
    }
    println!();
    println!("{}", post.markdown);
}

/// Apply command line fields to a post.
///
/// Image references are rooted at `blog_url`.
pub fn apply_fields(post: &mut Post, fields: &PostFields, blog_url: &str) -> Result<()> {
    if let Some(title) = &fields.title {
        post.title = title.clone();
    }
    if let Some(slug) = &fields.slug {
        post.slug = slug.clone();
    }
    if let Some(markdown) = &fields.markdown {
        post.markdown = markdown.clone();
    }
    if let Some(path) = &fields.markdown_file {
        post.markdown = std::fs::read_to_string(path)
            .with_context(|| f!("Failed to read markdown from {}", path.display()))?;
    }
    if let Some(tags) = &fields.tags {
        post.tags = tags.clone();
    }
    if let Some(description) = &fields.meta_description {
        post.meta_description = description.clone();
    }
    if let Some(published) = fields.published {
        post.is_published = published;
    }
    if let Some(featured) = fields.featured {
        post.is_featured = featured;
    }
    if let Some(page) = fields.page {
        post.is_page = page;
    }
    if fields.clear_cover {
        post.clear_cover();
    }
    if let Some(cover) = &fields.cover {
        post.set_cover(cover, blog_url);
    }
    for image in &fields.insert_images {
        post.insert_image(image, blog_url);
    }
    Ok(())
}

fn needs_blog_url(fields: &PostFields) -> bool {
    fields.cover.is_some() || !fields.insert_images.is_empty()
}

/// Base URL for image references, loading the blog settings when needed.
async fn image_base_url(
    fields: &PostFields,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<String> {
    if needs_blog_url(fields) && context.blog.is_none() {
        crate::settings::load_blog(client, context).await?;
    }
    Ok(context.blog_url(client.base_url()).to_string())
}

async fn create_handler(
    fields: PostFields,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let blog_url = image_base_url(&fields, client, context).await?;

    let post = context.post.insert(Post::draft());
    apply_fields(post, &fields, &blog_url)?;

    client.create_post(post).await?;
    println!("Created post \"{}\"", post.title);

    Ok(())
}

async fn edit_handler(
    options: EditOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let blog_url = image_base_url(&options.fields, client, context).await?;

    let post = context.post.insert(client.post(options.id).await?);
    apply_fields(post, &options.fields, &blog_url)?;

    client.update_post(post).await?;
    println!("Updated post {} \"{}\"", post.id, post.title);

    Ok(())
}

async fn delete_handler(
    options: DeleteOptions,
    client: &AdminClient,
    context: &mut AdminContext,
) -> Result<()> {
    let mut list = PostList::for_client(client);
    let post = list
        .find(options.id)
        .await?
        .ok_or_else(|| eyre!("Post {} is not in the post list", options.id))?;

    let question = f!("Are you sure you want to delete the post \"{}\"?", post.title);
    if !options.yes && !confirm(&question)? {
        println!("Aborted.");
        return Ok(());
    }

    client.delete_post(post.id).await?;
    list.forget(post.id);
    if context.post.as_ref().is_some_and(|p| p.id == post.id) {
        context.post = None;
    }

    println!(
        "Deleted post \"{}\" ({} post(s) left on the loaded pages)",
        post.title,
        list.visible().len()
    );

    Ok(())
}
