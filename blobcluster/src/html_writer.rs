//! HTML Writer
//!
//! Writes the interactive page: `index.html` hosting the wasm visualization,
//! `config.json` with the resolved settings, and a copy of the wasm bundle.

use std::fs;
use std::path::{Path, PathBuf};

use askama::Template;
use tracing::{debug, warn};

use crate::io::{IoError, IoResult, Writer};
use crate::session::Session;

/// Files produced by `wasm-pack build --target web` that the page loads
const BUNDLE_FILES: &[&str] = &["blobcluster_viz.js", "blobcluster_viz_bg.wasm"];

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
    version: &'a str,
    width: f64,
    height: f64,
    /// Configuration embedded for the browser (already JSON)
    config_json: &'a str,
}

/// Writer for the interactive HTML page
pub struct HtmlWriter {
    /// wasm-pack output directory to copy into `<output>/pkg`
    pub pkg_dir: Option<PathBuf>,
}

impl HtmlWriter {
    /// Create a new HTML writer that does not copy a wasm bundle
    pub fn new() -> Self {
        Self { pkg_dir: None }
    }

    /// Create a new HTML writer that copies the bundle from `pkg_dir`
    pub fn with_pkg(pkg_dir: impl Into<PathBuf>) -> Self {
        Self {
            pkg_dir: Some(pkg_dir.into()),
        }
    }

    /// Render the page for a session
    pub fn render(session: &Session, config_json: &str) -> IoResult<String> {
        let config = session.config();
        let template = IndexTemplate {
            title: "blobcluster",
            version: env!("CARGO_PKG_VERSION"),
            width: config.width,
            height: config.height,
            config_json,
        };
        template.render().map_err(|e| IoError::Write(e.to_string()))
    }

    /// Copy the wasm bundle. A missing bundle only warns: the page is still
    /// written and works once the bundle is built into `pkg/`.
    fn copy_bundle(&self, output: &Path) -> IoResult<usize> {
        let Some(pkg_dir) = &self.pkg_dir else {
            warn!("no wasm bundle directory given; page will need ./pkg to run");
            return Ok(0);
        };

        let target = output.join("pkg");
        fs::create_dir_all(&target)?;
        let mut copied = 0;
        for name in BUNDLE_FILES {
            let source = pkg_dir.join(name);
            if source.is_file() {
                fs::copy(&source, target.join(name))?;
                copied += 1;
            } else {
                warn!(path = %source.display(), "wasm bundle file missing");
            }
        }
        Ok(copied)
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for HtmlWriter {
    fn write(&self, session: &Session, output: &Path) -> IoResult<()> {
        // Create output directory if it doesn't exist
        fs::create_dir_all(output).map_err(IoError::Io)?;

        // Escape "</" so the embedded JSON cannot close its script element
        let config_json = serde_json::to_string(session.config())
            .map_err(|e| IoError::Write(e.to_string()))?
            .replace("</", "<\\/");
        let html = Self::render(session, &config_json)?;

        fs::write(output.join("index.html"), html).map_err(IoError::Io)?;
        let pretty = serde_json::to_string_pretty(session.config())
            .map_err(|e| IoError::Write(e.to_string()))?;
        fs::write(output.join("config.json"), pretty).map_err(IoError::Io)?;

        let copied = self.copy_bundle(output)?;
        debug!(output = %output.display(), copied, "wrote html page");
        Ok(())
    }

    fn format_id(&self) -> &str {
        "html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobcluster_sim::SimulationConfig;
    use tempfile::TempDir;

    fn session() -> Session {
        Session::new(SimulationConfig {
            width: 640.0,
            height: 480.0,
            seed: Some(12),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn html_writer_format_id() {
        assert_eq!(HtmlWriter::new().format_id(), "html");
    }

    #[test]
    fn page_embeds_config_and_controls() {
        let html = HtmlWriter::render(&session(), r#"{"nodes":40}"#).unwrap();

        assert!(html.contains(r#"<html lang="en" class="play-sim">"#));
        assert!(html.contains(r#"<i class="fa fa-pause"></i>"#));
        assert!(html.contains(r#"{"nodes":40}"#));
        assert!(html.contains(r#"width="640""#));
        assert!(html.contains("./pkg/blobcluster_viz.js"));
    }

    #[test]
    fn writes_page_and_config() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        HtmlWriter::new().write(&session(), dir.path()).unwrap();

        assert!(dir.path().join("index.html").exists());
        let config: SimulationConfig = serde_json::from_str(
            &fs::read_to_string(dir.path().join("config.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(config.seed, Some(12));
        assert!(!dir.path().join("pkg").exists());
    }

    #[test]
    fn copies_available_bundle_files() {
        let pkg = TempDir::new().expect("Failed to create temp dir");
        fs::write(pkg.path().join("blobcluster_viz.js"), "export default 1;").unwrap();

        let out = TempDir::new().expect("Failed to create temp dir");
        HtmlWriter::with_pkg(pkg.path())
            .write(&session(), out.path())
            .unwrap();

        assert!(out.path().join("pkg/blobcluster_viz.js").exists());
        assert!(!out.path().join("pkg/blobcluster_viz_bg.wasm").exists());
    }
}
