//! Reader/Writer traits and format dispatch
//!
//! Readers load a [`SimulationConfig`] from a file; writers turn a running
//! [`Session`] into an output artifact inside a directory.

use std::path::Path;

use blobcluster_sim::{ConfigError, SimulationConfig};
use thiserror::Error;

use crate::config_reader::{JsonConfigReader, YamlConfigReader};
use crate::html_writer::HtmlWriter;
use crate::json_writer::JsonWriter;
use crate::png_writer::PngWriter;
use crate::session::Session;
use crate::svg_writer::SvgWriter;

/// Errors that can occur during reading or writing
#[derive(Error, Debug)]
pub enum IoError {
    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file extension could not be determined
    #[error("could not determine file format from path: {0}")]
    UnknownExtension(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A parsing error occurred
    #[error("parse error: {0}")]
    Parse(String),

    /// A rendering/writing error occurred
    #[error("write error: {0}")]
    Write(String),

    /// The configuration was read but is not usable
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for reader/writer operations
pub type IoResult<T> = Result<T, IoError>;

/// A reader parses a configuration file
pub trait Reader {
    /// Parse the input file into a SimulationConfig
    fn read(&self, input: &Path) -> IoResult<SimulationConfig>;

    /// File extensions this reader can handle (e.g., ["yaml", "yml"])
    fn supported_extensions(&self) -> &[&str];

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// A writer renders a session into an output directory
pub trait Writer {
    /// Write the artifact into the `output` directory
    fn write(&self, session: &Session, output: &Path) -> IoResult<()>;

    /// Identifier for this output format (e.g., "svg", "png", "html")
    fn format_id(&self) -> &str;
}

/// Registry of available readers and writers
pub struct FormatRegistry {
    readers: Vec<Box<dyn Reader>>,
    writers: Vec<Box<dyn Writer>>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            readers: Vec::new(),
            writers: Vec::new(),
        }
    }

    /// Create a registry with all default readers and writers registered
    ///
    /// Currently registers:
    /// - Readers: `YamlConfigReader` (yaml, yml), `JsonConfigReader` (json)
    /// - Writers: `SvgWriter` (svg), `PngWriter` (png), `JsonWriter` (json),
    ///   `HtmlWriter` (html)
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_reader(Box::new(YamlConfigReader::new()));
        registry.register_reader(Box::new(JsonConfigReader::new()));
        registry.register_writer(Box::new(SvgWriter::new()));
        registry.register_writer(Box::new(PngWriter::new()));
        registry.register_writer(Box::new(JsonWriter::new()));
        registry.register_writer(Box::new(HtmlWriter::new()));
        registry
    }

    /// Register a reader
    pub fn register_reader(&mut self, reader: Box<dyn Reader>) {
        self.readers.push(reader);
    }

    /// Register a writer. A later writer with the same format id replaces
    /// the earlier one.
    pub fn register_writer(&mut self, writer: Box<dyn Writer>) {
        self.writers
            .retain(|w| !w.format_id().eq_ignore_ascii_case(writer.format_id()));
        self.writers.push(writer);
    }

    /// Find a reader for the given file extension
    pub fn reader_for_extension(&self, ext: &str) -> Option<&dyn Reader> {
        self.readers
            .iter()
            .find(|r| r.supports_extension(ext))
            .map(|r| r.as_ref())
    }

    /// Find a writer by format ID
    pub fn writer_for_format(&self, format_id: &str) -> Option<&dyn Writer> {
        self.writers
            .iter()
            .find(|w| w.format_id().eq_ignore_ascii_case(format_id))
            .map(|w| w.as_ref())
    }

    /// Get file extension from a path
    pub fn extension_from_path(path: &Path) -> Option<&str> {
        path.extension().and_then(|e| e.to_str())
    }

    /// Find a reader for the given path based on its extension
    pub fn reader_for_path(&self, path: &Path) -> IoResult<&dyn Reader> {
        let ext = Self::extension_from_path(path)
            .ok_or_else(|| IoError::UnknownExtension(path.display().to_string()))?;

        self.reader_for_extension(ext)
            .ok_or_else(|| IoError::UnsupportedFormat(ext.to_string()))
    }

    /// Read and validate a configuration file
    pub fn read_config(&self, path: &Path) -> IoResult<SimulationConfig> {
        let config = self.reader_for_path(path)?.read(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct MockReader {
        extensions: Vec<&'static str>,
    }

    impl Reader for MockReader {
        fn read(&self, _input: &Path) -> IoResult<SimulationConfig> {
            Ok(SimulationConfig {
                nodes: 4,
                ..Default::default()
            })
        }

        fn supported_extensions(&self) -> &[&str] {
            &self.extensions
        }
    }

    struct MockWriter {
        format: &'static str,
    }

    impl Writer for MockWriter {
        fn write(&self, _session: &Session, _output: &Path) -> IoResult<()> {
            Ok(())
        }

        fn format_id(&self) -> &str {
            self.format
        }
    }

    #[test]
    fn reader_supports_extension_case_insensitive() {
        let reader = MockReader {
            extensions: vec!["yaml", "yml"],
        };
        assert!(reader.supports_extension("yaml"));
        assert!(reader.supports_extension("YML"));
        assert!(!reader.supports_extension("toml"));
    }

    #[test]
    fn registry_finds_reader_by_extension() {
        let mut registry = FormatRegistry::new();
        registry.register_reader(Box::new(MockReader {
            extensions: vec!["yaml"],
        }));

        assert!(registry.reader_for_extension("yaml").is_some());
        assert!(registry.reader_for_extension("json").is_none());
    }

    #[test]
    fn registry_finds_writer_by_format() {
        let mut registry = FormatRegistry::new();
        registry.register_writer(Box::new(MockWriter { format: "svg" }));

        assert!(registry.writer_for_format("svg").is_some());
        assert!(registry.writer_for_format("SVG").is_some()); // case insensitive
        assert!(registry.writer_for_format("png").is_none());
    }

    #[test]
    fn registering_same_format_replaces_writer() {
        let mut registry = FormatRegistry::new();
        registry.register_writer(Box::new(MockWriter { format: "svg" }));
        registry.register_writer(Box::new(MockWriter { format: "SVG" }));
        assert_eq!(registry.writers.len(), 1);
    }

    #[test]
    fn registry_reader_for_path_extracts_extension() {
        let mut registry = FormatRegistry::new();
        registry.register_reader(Box::new(MockReader {
            extensions: vec!["yaml"],
        }));

        let path = PathBuf::from("/some/path/blobs.yaml");
        assert!(registry.reader_for_path(&path).is_ok());

        let unknown_path = PathBuf::from("/some/path/blobs.xyz");
        assert!(matches!(
            registry.reader_for_path(&unknown_path),
            Err(IoError::UnsupportedFormat(_))
        ));

        let bare = PathBuf::from("/some/path/blobs");
        assert!(matches!(
            registry.reader_for_path(&bare),
            Err(IoError::UnknownExtension(_))
        ));
    }

    struct InvalidReader;

    impl Reader for InvalidReader {
        fn read(&self, _input: &Path) -> IoResult<SimulationConfig> {
            Ok(SimulationConfig {
                clusters: 0,
                ..Default::default()
            })
        }

        fn supported_extensions(&self) -> &[&str] {
            &["bad"]
        }
    }

    #[test]
    fn read_config_validates() {
        let mut registry = FormatRegistry::new();
        registry.register_reader(Box::new(MockReader {
            extensions: vec!["yaml"],
        }));
        registry.register_reader(Box::new(InvalidReader));

        let config = registry.read_config(Path::new("blobs.yaml")).unwrap();
        assert_eq!(config.nodes, 4);
        assert!(matches!(
            registry.read_config(Path::new("blobs.bad")),
            Err(IoError::Config(ConfigError::NoClusters))
        ));
    }

    #[test]
    fn io_error_display() {
        let err = IoError::UnsupportedFormat("xyz".to_string());
        assert_eq!(err.to_string(), "unsupported format: xyz");

        let err = IoError::Parse("invalid syntax".to_string());
        assert_eq!(err.to_string(), "parse error: invalid syntax");

        let err = IoError::Config(ConfigError::NoClusters);
        assert!(err.to_string().starts_with("invalid configuration: "));
    }

    #[test]
    fn with_defaults_registers_config_readers() {
        let registry = FormatRegistry::with_defaults();

        assert!(registry.reader_for_extension("yaml").is_some());
        assert!(registry.reader_for_extension("yml").is_some());
        assert!(registry.reader_for_extension("json").is_some());
        assert!(registry.reader_for_extension("ttl").is_none());
    }

    #[test]
    fn with_defaults_registers_snapshot_writers() {
        let registry = FormatRegistry::with_defaults();

        for format in ["svg", "png", "json", "html", "HTML"] {
            assert!(registry.writer_for_format(format).is_some(), "{format}");
        }
        assert!(registry.writer_for_format("markdown").is_none());
    }
}
