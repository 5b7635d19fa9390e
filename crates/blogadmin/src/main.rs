use crate::prelude::*;
use blogadmin_core::context::AdminContext;
use clap::Parser;

mod client;
mod config;
mod error;
mod images;
mod loader;
mod posts;
mod prelude;
mod settings;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Manage posts, images and settings of a blog through its admin API"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Admin server URL, overrides BLOGADMIN_URL
    #[clap(long, global = true)]
    url: Option<String>,

    /// Session cookie sent with every request, overrides BLOGADMIN_SESSION
    #[clap(long, global = true)]
    session: Option<String>,

    /// Request timeout in seconds, overrides BLOGADMIN_TIMEOUT
    #[clap(long, global = true)]
    timeout: Option<u64>,

    /// Whether to display additional information.
    #[clap(long, env = "BLOGADMIN_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Posts and pages
    Posts(crate::posts::App),

    /// Uploaded images
    Images(crate::images::App),

    /// Blog settings, navigation and the user profile
    Settings(crate::settings::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    let config = config::AdminConfig::resolve(&app.global)?;
    let client = client::AdminClient::new(&config)?;
    let mut context = AdminContext::default();

    match app.command {
        SubCommands::Posts(sub_app) => {
            crate::posts::run(sub_app, &client, &mut context, &app.global).await
        }
        SubCommands::Images(sub_app) => crate::images::run(sub_app, &client, &app.global).await,
        SubCommands::Settings(sub_app) => {
            crate::settings::run(sub_app, &client, &mut context, &app.global).await
        }
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
