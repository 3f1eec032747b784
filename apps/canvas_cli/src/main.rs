use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CanvasApi, HttpCanvasApi};
use page_controller::{
    Content, FormValues, GenerationState, Page, PageConfig, Region, RenderSurface, ShareState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, Settings};
use terminal::TerminalSurface;

#[derive(Parser, Debug)]
#[command(about = "Drive the canvas page flows against a canvas server")]
struct Cli {
    /// Overrides the configured server URL.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "canvas.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a page: auth badge, plus the gallery on the gallery route.
    Page {
        #[arg(long, default_value = "/")]
        path: String,
    },
    /// Load the gallery page.
    Showcase,
    /// Generate a canvas, optionally sharing it to the showcase.
    Generate {
        #[arg(long = "type", default_value = "tracks")]
        item_type: String,
        #[arg(long, default_value = "medium_term")]
        time_range: String,
        #[arg(long, default_value = "10")]
        limit: String,
        #[arg(long)]
        share: bool,
        #[arg(long, requires = "share")]
        anonymous: bool,
        /// Write the rendered canvas to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Query the server health endpoint.
    Health,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }

    let api: Arc<dyn CanvasApi> = Arc::new(HttpCanvasApi::with_session_cookie(
        &settings.server_url,
        settings.session_cookie.as_deref(),
    )?);

    match cli.command {
        Command::Page { path } => load_page(&settings, api, path).await,
        Command::Showcase => {
            let route = settings.gallery_route.clone();
            load_page(&settings, api, route).await
        }
        Command::Generate {
            item_type,
            time_range,
            limit,
            share,
            anonymous,
            out,
        } => {
            let values = FormValues {
                item_type,
                time_range,
                limit,
                share_anonymously: anonymous,
            };
            generate(&settings, api, values, share, out).await
        }
        Command::Health => {
            let health = api.healthcheck().await?;
            println!(
                "{} (version {}, at {})",
                health.status, health.version, health.timestamp
            );
            Ok(())
        }
    }
}

fn page_config(settings: &Settings, path: String) -> Result<PageConfig> {
    Ok(PageConfig {
        path,
        gallery_route: settings.gallery_route.clone(),
        timestamps: settings.timestamp_format(),
        origin: settings.origin()?,
    })
}

async fn load_page(settings: &Settings, api: Arc<dyn CanvasApi>, path: String) -> Result<()> {
    let surface = Arc::new(TerminalSurface::new([
        Region::AuthStatus,
        Region::LoginPrompt,
        Region::CanvasGenerator,
        Region::ShowcaseContainer,
    ]));
    let page = Page::new(
        page_config(settings, path)?,
        api,
        surface as Arc<dyn RenderSurface>,
    );
    let init = page.initialize().await;
    info!(?init, "page loaded");
    Ok(())
}

async fn generate(
    settings: &Settings,
    api: Arc<dyn CanvasApi>,
    values: FormValues,
    share: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let surface = Arc::new(TerminalSurface::new(
        Region::ALL
            .into_iter()
            .filter(|region| *region != Region::ShowcaseContainer),
    ));
    let page = Page::new(
        page_config(settings, "/".to_string())?,
        api,
        Arc::clone(&surface) as Arc<dyn RenderSurface>,
    );
    page.initialize().await;
    page.form().replace(values);

    let state = page
        .submit_generation()
        .await
        .ok_or_else(|| anyhow!("generation form is not mounted"))?;
    if let GenerationState::Failed(err) = state {
        bail!("canvas generation failed: {}", err.detail());
    }

    if let Some(out) = out {
        let Content::Image(image) = surface.memory().content(Region::CanvasContainer) else {
            bail!("no rendered canvas to save");
        };
        let blob = page
            .handles()
            .resolve(&image.src)
            .ok_or_else(|| anyhow!("rendered canvas handle was revoked"))?;
        tokio::fs::write(&out, &*blob.bytes)
            .await
            .with_context(|| format!("failed to write canvas to {}", out.display()))?;
        info!(path = %out.display(), mime_type = blob.mime_type, "canvas saved");
    }

    if share {
        match page.share().await? {
            ShareState::Failed(err) => bail!("share failed: {}", err.detail()),
            state => info!(?state, "share finished"),
        }
    }

    page.unload();
    Ok(())
}
