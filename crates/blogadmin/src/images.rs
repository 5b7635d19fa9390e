use crate::client::{AdminClient, IMAGES_PAGE_PATH};
use crate::loader::{PageFetcher, PageLoader};
use crate::prelude::{eprintln, println, *};
use blogadmin_core::images::{matches_image, visible_images, ImageSelection};
use blogadmin_core::pagination::LoaderState;
use colored::Colorize;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(name = "images")]
#[command(about = "Browse, upload and delete images")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List uploaded images, newest first
    #[clap(name = "list")]
    List(ListOptions),

    /// Upload one or more images
    #[clap(name = "upload")]
    Upload(UploadOptions),

    /// Delete images
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

    /// Highlight this image instead of the first one
    #[arg(long, value_name = "IMAGE")]
    pub select: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct UploadOptions {
    /// Image files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, Clone)]
pub struct DeleteOptions {
    /// Image paths or file names
    #[arg(required = true)]
    pub images: Vec<String>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// The image gallery: images loaded page by page with a local selection.
pub struct ImageGallery<F> {
    loader: PageLoader<String, F>,
    deleted: HashSet<String>,
    selection: ImageSelection,
}

impl ImageGallery<AdminClient> {
    pub fn for_client(client: &AdminClient) -> Self {
        Self::new(client.url(IMAGES_PAGE_PATH), client.clone())
    }
}

impl<F: PageFetcher<String>> ImageGallery<F> {
    pub fn new(resource_url: String, fetcher: F) -> Self {
        Self {
            loader: PageLoader::new(resource_url, fetcher),
            deleted: HashSet::new(),
            selection: ImageSelection::default(),
        }
    }

    /// Load up to `pages` more pages (all on `None`) and keep a valid selection.
    pub async fn load(&mut self, pages: Option<usize>) -> Result<usize, Error> {
        let loaded = self.loader.load_pages(pages).await?;
        self.refresh_selection();
        Ok(loaded)
    }

    pub fn visible(&self) -> Vec<String> {
        self.loader.with_items(|items| {
            visible_images(items, &self.deleted)
                .into_iter()
                .map(str::to_string)
                .collect()
        })
    }

    pub fn selected(&self) -> Option<&str> {
        self.selection.selected()
    }

    /// Highlight an image from the loaded pages.
    pub fn select(&mut self, image: &str) -> bool {
        let visible = self.visible();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.select(image, &visible)
    }

    fn refresh_selection(&mut self) {
        let visible = self.visible();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.refresh(&visible);
    }

    /// Find a visible image by path or file name, loading further pages as needed.
    pub async fn find(&mut self, image: &str) -> Result<Option<String>, Error> {
        loop {
            if let Some(found) = self.visible().into_iter().find(|i| matches_image(i, image)) {
                return Ok(Some(found));
            }
            if self.load(Some(1)).await? == 0 {
                return Ok(None);
            }
        }
    }

    /// Drop a deleted image from the gallery and select the first image left.
    ///
    /// The server deletes by file name, so every loaded entry sharing the
    /// file name goes too.
    pub fn forget(&mut self, image: &str) {
        let removed: Vec<String> = self
            .visible()
            .into_iter()
            .filter(|entry| matches_image(entry, image))
            .collect();
        self.deleted.extend(removed);

        let visible = self.visible();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.select_first(&visible);
    }

    pub fn state(&self) -> LoaderState {
        self.loader.state()
    }

    pub fn next_page(&self) -> u64 {
        self.loader.page()
    }
}

#[derive(Debug, Serialize)]
pub struct GalleryOutput {
    pub images: Vec<String>,
    pub selected: Option<String>,
    pub next_page: u64,
    pub state: LoaderState,
}

/// Module entry point
pub async fn run(app: App, client: &AdminClient, global: &crate::Global) -> Result<()> {
    if global.verbose {
        println!("Images endpoint: {}", client.url(IMAGES_PAGE_PATH));
    }

    match app.command {
        Commands::List(options) => list_handler(options, client).await,
        Commands::Upload(options) => upload_handler(options, client).await,
        Commands::Delete(options) => delete_handler(options, client).await,
    }
}

/// Loads the requested gallery pages and applies the selection
pub async fn gallery_data(
    client: &AdminClient,
    pages: Option<usize>,
    select: Option<&str>,
) -> Result<GalleryOutput> {
    let mut gallery = ImageGallery::for_client(client);
    gallery.load(pages).await?;

    if let Some(image) = select {
        if !gallery.select(image) {
            return Err(eyre!("Image '{}' is not on the loaded pages", image));
        }
    }

    Ok(GalleryOutput {
        images: gallery.visible(),
        selected: gallery.selected().map(str::to_string),
        next_page: gallery.next_page(),
        state: gallery.state(),
    })
}

async fn list_handler(options: ListOptions, client: &AdminClient) -> Result<()> {
    let pages = if options.all { None } else { Some(options.pages) };
    let data = gallery_data(client, pages, options.select.as_deref()).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    if data.images.is_empty() {
        println!("No images uploaded.");
        return Ok(());
    }

    for image in &data.images {
        if data.selected.as_deref() == Some(image.as_str()) {
            println!("{} {}", "*".green().bold(), image.bold());
        } else {
            println!("  {}", image);
        }
    }

    if data.state == LoaderState::Idle {
        println!(
            "\n{}",
            f!("More images may follow: --pages {}", data.next_page).dimmed()
        );
    }

    Ok(())
}

async fn upload_handler(options: UploadOptions, client: &AdminClient) -> Result<()> {
    let paths = client.upload_images(&options.files).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        for path in &paths {
            println!("Uploaded {}", path);
        }
    }

    Ok(())
}

async fn delete_handler(options: DeleteOptions, client: &AdminClient) -> Result<()> {
    let mut gallery = ImageGallery::for_client(client);
    gallery.load(Some(1)).await?;

    for wanted in &options.images {
        let Some(image) = gallery.find(wanted).await? else {
            eprintln!("{}", f!("Image '{}' not found, skipping", wanted).yellow());
            continue;
        };

        if !options.yes && !confirm(&f!("Are you sure you want to delete {}?", image))? {
            continue;
        }

        client.delete_image(&image).await?;
        gallery.forget(&image);
        println!("Deleted {}", image);
    }

    match gallery.selected() {
        Some(selected) => println!("Selected image: {}", selected),
        None => println!("No images left on the loaded pages."),
    }

    Ok(())
}
