//! Command handlers for Content Gallery CLI
//!
//! This module implements the command handlers that connect CLI arguments to
//! the record store, the gallery and the Drive client.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::app::{
    load_records, render_page, save_bytes, DriveClient, FilterCriteria, Gallery, GalleryPage,
    ImageOutcome, LinkResolver, PageState, RecordField, RenderedRecord,
};
use crate::auth::{clear_credentials, setup_credentials, show_auth_status, verify_credentials};
use crate::cli::prompt::{prompt_action, prompt_filters, BrowseAction};
use crate::cli::{
    AuthAction, AuthArgs, BrowseArgs, ConfigAction, ConfigArgs, GlobalArgs, SearchArgs,
};
use crate::config::AppConfig;
use crate::constants::files;
use crate::errors::{AppError, FetchError, GalleryError, Result};

/// Where fetched images are written, if anywhere
#[derive(Debug, Clone)]
struct ImageOutput {
    dir: Option<PathBuf>,
    force: bool,
}

impl ImageOutput {
    fn new(cli_dir: Option<PathBuf>, config: &AppConfig, force: bool) -> Self {
        Self {
            dir: cli_dir.or_else(|| config.gallery.image_dir.clone()),
            force,
        }
    }

    /// Save a loaded image; failures are reported and never stop the page
    async fn save(&self, item: &RenderedRecord<'_>, bytes: &[u8], resolver: &LinkResolver) {
        let Some(dir) = &self.dir else {
            return;
        };

        let file_id = item
            .record
            .link
            .as_deref()
            .and_then(|link| resolver.resolve(link))
            .unwrap_or("image");
        let path = dir.join(image_file_name(item.index, file_id, bytes));

        match save_bytes(&path, bytes, self.force).await {
            Ok(()) => println!("│  💾 Saved to {}", path.display()),
            Err(FetchError::FileExists { .. }) => {
                println!("│  💾 {} exists (use --force to overwrite)", path.display())
            }
            Err(e) => {
                warn!("Failed to save image to {}: {}", path.display(), e);
                println!("│  ⚠️  Failed to save image: {}", e);
            }
        }
    }
}

/// `{position}_{file_id}.{ext}`, the extension guessed from the content
fn image_file_name(index: usize, file_id: &str, bytes: &[u8]) -> String {
    format!("{:03}_{}.{}", index + 1, file_id, image_extension(bytes))
}

/// Guess an image file extension from its magic bytes
fn image_extension(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "jpg"
    } else if bytes.starts_with(b"GIF8") {
        "gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "webp"
    } else {
        files::DEFAULT_IMAGE_EXTENSION
    }
}

/// Format bytes in human-readable format
fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Load the session dataset behind a spinner
///
/// Store failures are fatal. An empty table prints a notice and yields None.
async fn load_gallery(global: &GlobalArgs, config: &AppConfig) -> Result<Option<Gallery>> {
    let source = config.record_source(global.records.clone(), global.database_url.clone())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| AppError::generic(format!("Invalid progress template: {}", e)))?
            .tick_strings(&["◐", "◓", "◑", "◒"]),
    );
    spinner.set_message(format!("Loading records from {}...", source.describe()));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let load_start = Instant::now();
    let records = load_records(&source).await;
    spinner.finish_and_clear();
    let records = records?;

    info!(
        "Record loading completed: {} records in {:?}",
        records.len(),
        load_start.elapsed()
    );

    if records.is_empty() {
        println!("⚠️  No data found in the database.");
        return Ok(None);
    }

    Ok(Some(Gallery::new(records)))
}

/// Open the Drive client; without one every record shows as unavailable
fn open_drive_client(config: &AppConfig, no_images: bool) -> Option<DriveClient> {
    if no_images {
        debug!("Image fetching disabled");
        return None;
    }

    match DriveClient::from_env_with_config(config.client_config()) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Drive client unavailable: {}", e);
            println!("⚠️  Google Drive unavailable ({}). Images will not be loaded.", e);
            None
        }
    }
}

fn describe_filters(criteria: &FilterCriteria) -> String {
    let mut parts = vec![
        format!(
            "category: {}",
            criteria.selected_category.label(RecordField::Category)
        ),
        format!("client: {}", criteria.selected_client.label(RecordField::Client)),
    ];
    if !criteria.search_term.is_empty() {
        parts.push(format!("search: '{}'", criteria.search_term));
    }
    parts.join(", ")
}

fn print_record(item: &RenderedRecord<'_>) {
    let record = item.record;

    println!("┌─ {}. {}", item.index + 1, record.display_title());
    if let Some(description) = &record.description {
        println!("│  {}", description);
    }
    println!("│  Category: {}", record.category.as_deref().unwrap_or("-"));
    println!("│  Keywords: {}", record.keywords.as_deref().unwrap_or("-"));
    if let Some(client) = &record.client {
        println!("│  Client:   {}", client);
    }
    if let Some(link) = &record.link {
        println!("│  Link:     {}", link);
    }

    match &item.image {
        ImageOutcome::Loaded(bytes) => {
            println!("│  🖼️  Image loaded ({})", format_bytes(bytes.len() as u64))
        }
        ImageOutcome::Unavailable => {
            println!("│  ⚠️  Invalid Drive link or service unavailable")
        }
        ImageOutcome::FetchFailed(reason) => {
            println!("│  ⚠️  Failed to load image: {}", reason)
        }
    }
}

/// Render one page: header, position, records and their images
async fn show_page(
    page: &GalleryPage<'_>,
    criteria: &FilterCriteria,
    resolver: &LinkResolver,
    drive: Option<&DriveClient>,
    output: &ImageOutput,
) {
    println!();
    println!("🔎 Search results ({} found)", page.total_items);
    if criteria.is_active() {
        println!("   {}", describe_filters(criteria));
    }
    println!();

    if page.is_empty() {
        println!("ℹ️  No results match your search.");
        return;
    }

    println!("{}", page.position());
    if let Some(summary) = page.summary() {
        println!("{}", summary);
    }
    println!();

    let rendered = render_page(page, resolver, drive).await;
    let loaded = rendered.iter().filter(|item| item.image.is_loaded()).count();

    for item in &rendered {
        print_record(item);
        if let ImageOutcome::Loaded(bytes) = &item.image {
            output.save(item, bytes, resolver).await;
        }
        println!("└─");
    }

    debug!("Loaded {} of {} images on this page", loaded, rendered.len());

    println!();
    println!("{}", page.position());
}

/// Handle the search command
///
/// Renders one page non-interactively.
pub async fn handle_search(
    args: SearchArgs,
    global: &GlobalArgs,
    config: &AppConfig,
) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let Some(gallery) = load_gallery(global, config).await? else {
        return Ok(());
    };

    let category = gallery.select(RecordField::Category, args.category.as_deref())?;
    let client = gallery.select(RecordField::Client, args.client.as_deref())?;
    let criteria = args.criteria(category, client);
    info!("Searching with {}", describe_filters(&criteria));

    let mut page_state = PageState::new();
    let first_pass = gallery.view(&criteria, &mut page_state);
    let total_pages = first_pass.total_pages();

    if !page_state.go_to(args.page) {
        return Err(GalleryError::PageOutOfRange {
            page: args.page,
            total_pages,
        }
        .into());
    }

    let page = gallery.view(&criteria, &mut page_state);
    let drive = open_drive_client(config, args.no_images);
    let output = ImageOutput::new(args.image_dir.clone(), config, args.force);

    show_page(
        &page,
        &criteria,
        &config.link_resolver(),
        drive.as_ref(),
        &output,
    )
    .await;

    Ok(())
}

/// Handle the browse command
///
/// One `PageState` lives for the whole session; changing filters recounts it.
pub async fn handle_browse(
    args: BrowseArgs,
    global: &GlobalArgs,
    config: &AppConfig,
) -> Result<()> {
    let Some(gallery) = load_gallery(global, config).await? else {
        return Ok(());
    };

    let drive = open_drive_client(config, args.no_images);
    let output = ImageOutput::new(args.image_dir.clone(), config, false);
    let resolver = config.link_resolver();

    let mut criteria = FilterCriteria::all();
    let mut page_state = PageState::new();

    println!("🖼️  Content Gallery: {} records", gallery.len());

    loop {
        let page = gallery.view(&criteria, &mut page_state);
        show_page(&page, &criteria, &resolver, drive.as_ref(), &output).await;
        println!();

        match prompt_action(&page_state)? {
            BrowseAction::Next => {
                if !page_state.advance() {
                    println!("Already on the last page.");
                }
            }
            BrowseAction::Previous => {
                if !page_state.retreat() {
                    println!("Already on the first page.");
                }
            }
            BrowseAction::Filters => {
                criteria = prompt_filters(&gallery, &criteria)?;
                info!("Filters changed: {}", describe_filters(&criteria));
            }
            BrowseAction::Quit => break,
        }
    }

    Ok(())
}

/// Handle the options command
pub async fn handle_options(global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let Some(gallery) = load_gallery(global, config).await? else {
        return Ok(());
    };

    println!();
    println!("📊 {} records", gallery.len());

    for (field, heading) in [
        (RecordField::Category, "📂 Categories"),
        (RecordField::Client, "🏢 Clients"),
    ] {
        println!();
        println!("{}:", heading);
        let counts = gallery.option_counts(field);
        if counts.is_empty() {
            println!("  (none)");
        }
        let width = counts.iter().map(|(value, _)| value.len()).max().unwrap_or(0);
        for (value, count) in counts {
            println!("  {:<width$}  {:>5}", value, count, width = width);
        }
    }

    Ok(())
}

/// Handle credential commands
pub async fn handle_auth(args: AuthArgs, config: &AppConfig) -> Result<()> {
    let client_config = config.client_config();

    match args.action {
        AuthAction::Setup { force } => {
            if force || !crate::auth::check_credentials() {
                setup_credentials(client_config).await?;
            } else {
                println!("✅ Credentials already configured. Use --force to update.");
            }
        }
        AuthAction::Verify => {
            if verify_credentials(client_config).await? {
                println!("✅ Drive token verified successfully");
            } else {
                println!("❌ Drive token verification failed");
            }
        }
        AuthAction::Status => {
            show_auth_status(client_config).await?;
        }
        AuthAction::Clear => {
            println!("🗑️  Clearing stored credentials...");
            let removed = clear_credentials()?;
            if removed == 0 {
                println!("No stored credentials found in .env");
            } else {
                println!("✅ Removed {} credential line(s) from .env", removed);
            }
        }
    }

    Ok(())
}

/// Handle configuration commands
pub async fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Init { force } => {
            let path = AppConfig::initialize(force).await?;
            println!("✅ Configuration file: {}", path.display());
        }
        ConfigAction::Show => {
            println!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{ImageRecord, Selection};
    use tempfile::TempDir;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension(&[0x89, b'P', b'N', b'G', 0x0D]), "png");
        assert_eq!(image_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpg");
        assert_eq!(image_extension(b"GIF89a"), "gif");
        assert_eq!(image_extension(b"RIFF\0\0\0\0WEBPVP8 "), "webp");
        assert_eq!(image_extension(b"plain"), "img");
    }

    #[test]
    fn test_image_file_name() {
        assert_eq!(image_file_name(0, "abc", b"GIF89a"), "001_abc.gif");
        assert_eq!(image_file_name(11, "xyz", b""), "012_xyz.img");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_describe_filters() {
        let criteria = FilterCriteria {
            selected_category: Selection::Only("Banners".to_string()),
            selected_client: Selection::All,
            search_term: "cat".to_string(),
        };
        assert_eq!(
            describe_filters(&criteria),
            "category: Banners, client: All clients, search: 'cat'"
        );
    }

    #[tokio::test]
    async fn test_image_output_saves_into_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output = ImageOutput {
            dir: Some(temp_dir.path().to_path_buf()),
            force: false,
        };
        let record = ImageRecord {
            link: Some("https://drive.google.com/file/d/abc/view".to_string()),
            ..Default::default()
        };
        let item = RenderedRecord {
            index: 4,
            record: &record,
            image: ImageOutcome::Loaded(b"GIF89a".to_vec()),
        };

        output.save(&item, b"GIF89a", &LinkResolver::default()).await;

        let saved = temp_dir.path().join("005_abc.gif");
        assert_eq!(tokio::fs::read(&saved).await.unwrap(), b"GIF89a");
    }

    #[tokio::test]
    async fn test_empty_records_file_halts_quietly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        tokio::fs::write(&path, "[]").await.unwrap();

        let global = GlobalArgs {
            records: Some(path),
            ..Default::default()
        };
        let gallery = load_gallery(&global, &AppConfig::default()).await.unwrap();
        assert!(gallery.is_none());
    }

    #[tokio::test]
    async fn test_missing_records_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            records: Some(temp_dir.path().join("missing.json")),
            ..Default::default()
        };
        let result = load_gallery(&global, &AppConfig::default()).await;
        assert!(matches!(result, Err(AppError::Store(_))));
    }

    #[tokio::test]
    async fn test_search_rejects_page_past_end() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        tokio::fs::write(&path, r#"[{"title": "A"}, {"title": "B"}]"#)
            .await
            .unwrap();

        let global = GlobalArgs {
            records: Some(path),
            ..Default::default()
        };
        let args = SearchArgs {
            page: 2,
            no_images: true,
            ..Default::default()
        };

        let result = handle_search(args, &global, &AppConfig::default()).await;
        assert!(matches!(
            result,
            Err(AppError::Gallery(GalleryError::PageOutOfRange {
                page: 2,
                total_pages: 1
            }))
        ));
    }

    #[tokio::test]
    async fn test_search_rejects_unknown_category() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("records.json");
        tokio::fs::write(&path, r#"[{"title": "A", "category": "Banners"}]"#)
            .await
            .unwrap();

        let global = GlobalArgs {
            records: Some(path),
            ..Default::default()
        };
        let args = SearchArgs {
            category: Some("Posters".to_string()),
            page: 1,
            no_images: true,
            ..Default::default()
        };

        let result = handle_search(args, &global, &AppConfig::default()).await;
        assert!(matches!(result, Err(AppError::Gallery(_))));
    }
}
