use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use oxiview::application::Gallery;
use oxiview::domain::entities::ImageId;
use oxiview::infrastructure::{
    AppConfig, CliArgs, ConsoleDisplay, DiskImageStore, ImageLoader, StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> AppConfig {
    let loaded = StorageManager::new()
        .and_then(|manager| manager.load_config(args.config.as_deref()));

    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {e}");
            AppConfig::default()
        }
    };
    config.merge_with_args(args);
    config
}

async fn run(args: CliArgs, config: AppConfig) -> Result<()> {
    let root = config
        .store_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let store = Arc::new(DiskImageStore::open(root).await?);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let loader = Arc::new(ImageLoader::new(
        config.cache.loader_config(),
        store.clone(),
        &event_tx,
    ));

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event.result {
                Ok(loaded) => {
                    info!(id = %event.id, source = %loaded.source, "Background load finished");
                }
                Err(e) => warn!(id = %event.id, error = %e, "Background load failed"),
            }
        }
    });

    let display = Arc::new(ConsoleDisplay::stdout(config.display.active_preview_cols()));

    let images = if args.images.is_empty() {
        store
            .scan()
            .await?
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect()
    } else {
        args.images.clone()
    };

    if images.is_empty() {
        println!("No images found in {}", store.root().display());
        return Ok(());
    }

    if args.prefetch {
        loader.prefetch_batch(images.iter().map(|name| ImageId::new(name.as_str())));
    }

    let mut gallery = Gallery::new(loader.clone(), display);
    for name in &images {
        if args.eager {
            if let Err(e) = gallery.add_eager(name.clone()).await {
                warn!(id = %name, error = %e, "Skipping image that failed to load");
            }
        } else {
            gallery.add(name.clone());
        }
    }

    let results = gallery.render_all().await;

    if let Some(name) = &args.repeat {
        gallery.render(&ImageId::new(name.as_str())).await?;
    }

    let stats = loader.cache_stats();
    println!("{stats}");
    info!(stats = %stats, "Render pass complete");

    let failed = results.iter().filter(|(_, result)| result.is_err()).count();
    if failed > 0 {
        return Err(eyre!("{failed} of {} images failed to render", results.len()));
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args);

    init_logging(&config)?;
    info!(version = oxiview::VERSION, "Starting oxiview");

    run(args, config).await
}
