use std::path::{Path, PathBuf};

use axum::Router;
use blobcluster::html_writer::HtmlWriter;
use blobcluster::io::{FormatRegistry, Writer};
use blobcluster::session::Session;
use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tower_http::services::ServeDir;
use tower_livereload::LiveReloadLayer;
use tracing::{error, info};

/// Regenerate the page from the config file
fn regenerate(config: &Path, output: &Path, pkg: Option<&Path>) -> anyhow::Result<()> {
    let registry = FormatRegistry::with_defaults();
    let session = Session::new(registry.read_config(config)?)?;

    let writer = match pkg {
        Some(pkg) => HtmlWriter::with_pkg(pkg),
        None => HtmlWriter::new(),
    };
    writer.write(&session, output)?;
    Ok(())
}

/// Start the development server with hot reload
pub async fn serve(
    config: &Path,
    output: &Path,
    pkg: Option<&Path>,
    port: u16,
) -> anyhow::Result<()> {
    // Generate the initial page
    regenerate(config, output, pkg)?;
    info!(output = %output.display(), "generated initial page");

    // Create channel for file change notifications
    let (tx, mut rx) = mpsc::channel::<()>(1);

    let config_name = config.file_name().map(|n| n.to_os_string());
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            let touches_config = event
                .paths
                .iter()
                .any(|p| p.file_name() == config_name.as_deref());
            if touches_config && (event.kind.is_modify() || event.kind.is_create()) {
                let _ = tx.blocking_send(());
            }
        }
    })?;

    // Watch the config file's parent directory so editor renames are seen
    let watch_path = config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    watcher.watch(&watch_path, RecursiveMode::NonRecursive)?;

    // Spawn regeneration task
    let config_for_regen = config.to_path_buf();
    let output_for_regen = output.to_path_buf();
    let pkg_for_regen = pkg.map(Path::to_path_buf);
    tokio::spawn(async move {
        while rx.recv().await.is_some() {
            // Debounce: wait a bit for rapid changes to settle
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            // Drain any additional notifications
            while rx.try_recv().is_ok() {}

            match regenerate(
                &config_for_regen,
                &output_for_regen,
                pkg_for_regen.as_deref(),
            ) {
                Ok(()) => info!("regenerated page"),
                Err(e) => error!("error regenerating: {e:#}"),
            }
        }
    });

    // Create live reload layer
    let livereload = LiveReloadLayer::new();
    let reloader = livereload.reloader();

    // Set up file watcher for output directory to trigger browser reload
    let mut output_watcher = notify::recommended_watcher(move |res: Result<Event, _>| {
        if let Ok(event) = res {
            if event.kind.is_modify() || event.kind.is_create() {
                reloader.reload();
            }
        }
    })?;
    output_watcher.watch(output, RecursiveMode::Recursive)?;

    // Build the router
    let app = Router::new()
        .fallback_service(ServeDir::new(output))
        .layer(livereload);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!("Development server running at http://localhost:{port}");
    println!("Watching {} for changes...", config.display());
    println!("Press Ctrl+C to stop");

    // Keep watchers alive
    let _watcher = watcher;
    let _output_watcher = output_watcher;

    axum::serve(listener, app).await?;

    Ok(())
}
