//! CLI command implementations

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Subcommand, ValueEnum};
use futures::StreamExt;
use vista_core::favorites::{FavoriteFilter, FavoriteRecord, FavoriteSync, FileFavoritesStore};
use vista_core::paging::PageSource;
use vista_core::remote::RemoteSource;
use vista_core::router::{FeedSnapshot, FeedStatus, QueryRouter};
use vista_core::{CatalogSession, LoadState, MediaItem, MediaKind, Tab, VistaConfig, VistaError};
use vista_search::build_provider;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List curated items or search results page by page
    Browse {
        /// Feed to browse
        #[arg(short, long, value_enum, default_value_t = Tab::Photos)]
        tab: Tab,
        /// Search text; blank lists curated items
        #[arg(short, long, default_value = "")]
        query: String,
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },
    /// Show details of one photo or video
    Show {
        #[arg(value_enum)]
        kind: KindArg,
        id: u64,
    },
    /// List favorites
    Favorites {
        #[arg(short, long, value_enum, default_value_t = FavoriteFilter::All)]
        filter: FavoriteFilter,
    },
    /// Add or remove a favorite by catalog id
    Toggle {
        #[arg(value_enum)]
        kind: KindArg,
        id: u64,
    },
    /// Remove a favorite
    Remove { id: String },
    /// Record that a favorite was downloaded
    MarkDownloaded {
        id: String,
        /// Where the file was saved
        path: PathBuf,
    },
}

/// Media kind argument
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Photo,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Photo => MediaKind::Photo,
            KindArg::Video => MediaKind::Video,
        }
    }
}

/// Everything a command may need, built from the environment.
struct AppContext {
    config: VistaConfig,
    remote: Arc<dyn RemoteSource>,
    favorites: FavoriteSync,
}

impl AppContext {
    async fn load(config: VistaConfig, use_demo: bool) -> anyhow::Result<Self> {
        tracing::debug!(?config, "Loaded configuration");

        let remote =
            build_provider(&config.remote, use_demo).context("Failed to set up catalog provider")?;

        let store = FileFavoritesStore::open(&config.storage.favorites_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to open favorites at {}",
                    config.storage.favorites_path.display()
                )
            })?;

        Ok(Self {
            favorites: FavoriteSync::new(Arc::new(store)),
            remote,
            config,
        })
    }

    fn session(&self) -> CatalogSession {
        CatalogSession::new(
            Arc::clone(&self.remote),
            self.favorites.clone(),
            &self.config.paging,
        )
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns the failure of the command with context for display
pub async fn handle_command(
    command: Commands,
    config: VistaConfig,
    use_demo: bool,
) -> anyhow::Result<()> {
    let app = AppContext::load(config, use_demo).await?;

    match command {
        Commands::Browse { tab, query, pages } => browse(&app, tab, &query, pages).await,
        Commands::Show { kind, id } => show(&app, kind.into(), id).await,
        Commands::Favorites { filter } => list_favorites(&app, filter).await,
        Commands::Toggle { kind, id } => toggle(&app, kind.into(), id).await,
        Commands::Remove { id } => remove(&app, &id).await,
        Commands::MarkDownloaded { id, path } => mark_downloaded(&app, &id, path).await,
    }
}

/// Load and print `pages` pages of the selected feed.
async fn browse(app: &AppContext, tab: Tab, query: &str, pages: usize) -> anyhow::Result<()> {
    let session = app.session();
    session.browse(tab, query);

    let wait = app.config.remote.request_timeout + Duration::from_secs(5);
    let snapshot = match tab {
        Tab::Photos => load_pages(session.photos(), pages, wait).await?,
        Tab::Videos => load_pages(session.videos(), pages, wait).await?,
    };

    let heading = match &snapshot.query {
        Some(query) => query.to_string(),
        None => "curated".to_string(),
    };
    println!("{tab:?}: {heading}");
    println!("{:-<60}", "");

    if snapshot.item_count() == 0 {
        println!("No results.");
        return Ok(());
    }

    for item in snapshot.items() {
        let favorited = app
            .favorites
            .is_favorite(&item.favorite_key())
            .next()
            .await
            .unwrap_or(false);
        print_item(item, favorited);
    }

    println!();
    println!(
        "{} items in {} pages{}",
        snapshot.item_count(),
        snapshot.pages.len(),
        if snapshot.status == FeedStatus::Exhausted {
            " (end of results)"
        } else {
            ""
        }
    );
    Ok(())
}

/// Loads pages until `pages` are present, the feed ends, or a load fails.
async fn load_pages<S>(
    router: &QueryRouter<S>,
    pages: usize,
    wait: Duration,
) -> anyhow::Result<FeedSnapshot<MediaItem>>
where
    S: PageSource<Item = MediaItem> + 'static,
{
    let mut updates = router.subscribe();
    loop {
        let snapshot = tokio::time::timeout(wait, updates.wait_for(|s| !s.is_loading()))
            .await
            .context("Timed out waiting for the catalog")?
            .context("Feed closed unexpectedly")?
            .clone();

        match &snapshot.status {
            FeedStatus::Failed(error) => {
                let message = VistaError::from(error.clone()).user_message();
                return Err(anyhow::Error::new(error.clone()).context(message));
            }
            FeedStatus::Exhausted | FeedStatus::Idle => return Ok(snapshot),
            FeedStatus::Ready if snapshot.pages.len() >= pages => return Ok(snapshot),
            FeedStatus::Ready | FeedStatus::Loading => {
                if !router.load_next() {
                    return Ok(snapshot);
                }
            }
        }
    }
}

/// Print details of one catalog item.
async fn show(app: &AppContext, kind: MediaKind, id: u64) -> anyhow::Result<()> {
    let session = app.session();
    let item: MediaItem = match kind {
        MediaKind::Photo => match session.photo_details(id).await {
            LoadState::Success(photo) => photo.into(),
            LoadState::Error { message } => bail!(message),
            LoadState::Loading => bail!("Lookup did not complete"),
        },
        MediaKind::Video => match session.video_details(id).await {
            LoadState::Success(video) => video.into(),
            LoadState::Error { message } => bail!(message),
            LoadState::Loading => bail!("Lookup did not complete"),
        },
    };

    let favorited = app
        .favorites
        .is_favorite(&item.favorite_key())
        .next()
        .await
        .unwrap_or(false);

    let (width, height) = item.dimensions();
    println!("{} {}", item.kind(), item.id());
    println!("{:-<60}", "");
    println!("Creator:   {}", item.creator_name());
    println!("Size:      {width}x{height}");
    println!("Preview:   {}", item.preview_url());
    println!("Original:  {}", item.original_url());
    match &item {
        MediaItem::Photo(photo) => {
            if let Some(alt) = &photo.alt {
                println!("Alt:       {alt}");
            }
            println!("Color:     {}", photo.avg_color);
        }
        MediaItem::Video(video) => {
            println!("Duration:  {}s", video.duration_seconds);
            for variant in &video.variants {
                println!("  {:<4} {}", variant.quality, variant.link);
            }
        }
    }
    println!("Favorite:  {}", if favorited { "yes" } else { "no" });
    Ok(())
}

async fn list_favorites(app: &AppContext, filter: FavoriteFilter) -> anyhow::Result<()> {
    let records = app
        .favorites
        .favorites_filtered(filter)
        .next()
        .await
        .unwrap_or_default();
    let total = app.favorites.favorites_count().next().await.unwrap_or(0);

    println!("Favorites ({filter:?}): {} of {total}", records.len());
    println!("{:-<60}", "");
    if records.is_empty() {
        println!("No favorites yet.");
        println!("Use 'vista toggle <photo|video> <id>' to add one.");
        return Ok(());
    }
    for record in &records {
        print_record(record);
    }
    Ok(())
}

async fn toggle(app: &AppContext, kind: MediaKind, id: u64) -> anyhow::Result<()> {
    let item: MediaItem = match kind {
        MediaKind::Photo => app.remote.get_photo_by_id(id).await.map(MediaItem::from),
        MediaKind::Video => app.remote.get_video_by_id(id).await.map(MediaItem::from),
    }
    .map_err(VistaError::from)
    .with_context(|| format!("Failed to look up {kind} {id}"))?;

    let favorited = app
        .favorites
        .toggle_atomic(&item)
        .await
        .with_context(|| format!("Failed to update favorite {kind} {id}"))?;

    if favorited {
        println!("Added {kind} {id} to favorites");
    } else {
        println!("Removed {kind} {id} from favorites");
    }
    Ok(())
}

async fn remove(app: &AppContext, id: &str) -> anyhow::Result<()> {
    app.favorites
        .remove(id)
        .await
        .with_context(|| format!("Failed to remove favorite {id}"))?;
    println!("Removed favorite {id}");
    Ok(())
}

async fn mark_downloaded(app: &AppContext, id: &str, path: PathBuf) -> anyhow::Result<()> {
    if app.favorites.store().get_by_id(id).await?.is_none() {
        bail!("No favorite with id {id}");
    }
    app.favorites
        .mark_downloaded(id, path.display().to_string())
        .await
        .with_context(|| format!("Failed to update favorite {id}"))?;
    println!("Marked {id} as downloaded to {}", path.display());
    Ok(())
}

fn print_item(item: &MediaItem, favorited: bool) {
    let marker = if favorited { "*" } else { " " };
    match item {
        MediaItem::Photo(photo) => println!(
            "{marker} {:>10}  {:<24} {}",
            photo.id,
            photo.creator_name,
            photo.alt.as_deref().unwrap_or("")
        ),
        MediaItem::Video(video) => println!(
            "{marker} {:>10}  {:<24} {}s",
            video.id, video.creator_name, video.duration_seconds
        ),
    }
}

fn print_record(record: &FavoriteRecord) {
    let downloaded = match (&record.local_path, record.downloaded) {
        (Some(path), true) => format!("downloaded to {path}"),
        (None, true) => "downloaded".to_string(),
        _ => String::new(),
    };
    println!(
        "{:<5} {:>10}  {:<32} {}  {}",
        record.kind,
        record.id,
        record.title,
        record.added_at.format("%Y-%m-%d %H:%M"),
        downloaded
    );
}
