//! Configuration file source with format dispatch and path search.
//!
//! A descriptor such as `file://name=app;type=yaml;path=.,/etc/app` names a
//! logical configuration file; init searches the listed directories in order
//! for `app.yaml` (or `app.yml`) and records the first hit. Load parses the
//! file with the format's ecosystem parser and converts the document into
//! this crate's [`Value`] tree.

use camino::{Utf8Path, Utf8PathBuf};

use crate::descriptor::{SourceOptions, option_first};
use crate::error::{StrataError, StrataResult};
use crate::source::ConfigSource;
use crate::value::Value;

/// Construct a [`StrataError::File`] for a configuration path.
fn file_error(
    path: impl Into<Utf8PathBuf>,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> StrataError {
    StrataError::File {
        path: path.into(),
        source: err.into(),
    }
}

/// Supported on-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Yaml,
    Json,
}

impl FileFormat {
    fn from_option(option: Option<&str>) -> Option<Self> {
        match option {
            // TOML is the default format when the descriptor names none.
            None | Some("toml") => Some(Self::Toml),
            Some("yaml" | "yml") => Some(Self::Yaml),
            Some("json") => Some(Self::Json),
            Some(_) => None,
        }
    }

    /// File extensions probed during the path search.
    const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Toml => &["toml"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
        }
    }

    fn parse(self, path: &Utf8Path, data: &str) -> StrataResult<Value> {
        match self {
            Self::Toml => toml::from_str::<toml::Value>(data)
                .map(Value::from)
                .map_err(|e| file_error(path, e)),
            Self::Yaml => serde_yaml::from_str::<serde_yaml::Value>(data)
                .map(Value::from)
                .map_err(|e| file_error(path, e)),
            Self::Json => serde_json::from_str::<serde_json::Value>(data)
                .map(Value::from)
                .map_err(|e| file_error(path, e)),
        }
    }
}

/// Built-in source for the `file` scheme.
#[derive(Debug)]
pub struct FileSource {
    format: FileFormat,
    resolved: Option<Utf8PathBuf>,
}

impl FileSource {
    /// Create an uninitialised source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: FileFormat::Toml,
            resolved: None,
        }
    }

    /// Search `paths` in order for `name` with one of `format`'s extensions.
    fn locate(name: &str, paths: &[String], format: FileFormat) -> Option<Utf8PathBuf> {
        let cwd = [".".to_owned()];
        let search_dirs: &[String] = if paths.is_empty() { &cwd } else { paths };
        for dir in search_dirs {
            for ext in format.extensions() {
                let candidate = Utf8Path::new(dir).join(format!("{name}.{ext}"));
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn init(&mut self, options: &SourceOptions) -> StrataResult<()> {
        let name = option_first(options, "name")
            .ok_or_else(|| StrataError::source_message("file", "missing required option 'name'"))?;
        self.format = FileFormat::from_option(option_first(options, "type")).ok_or_else(|| {
            StrataError::source_message(
                "file",
                "option 'type' must be one of 'toml', 'yaml' or 'json'",
            )
        })?;

        let paths = options.get("path").cloned().unwrap_or_default();
        let located = Self::locate(name, &paths, self.format).ok_or_else(|| {
            file_error(
                Utf8PathBuf::from(name),
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no '{name}' file found in search paths"),
                ),
            )
        })?;
        self.resolved = Some(located);
        Ok(())
    }

    fn load(&self) -> StrataResult<Value> {
        let path = self
            .resolved
            .as_ref()
            .ok_or_else(|| StrataError::source_message("file", "load called before init"))?;
        let data = std::fs::read_to_string(path).map_err(|e| file_error(path.clone(), e))?;
        self.format.parse(path, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_option_maps_to_format() {
        assert_eq!(FileFormat::from_option(None), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_option(Some("yml")), Some(FileFormat::Yaml));
        assert_eq!(FileFormat::from_option(Some("json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_option(Some("ini")), None);
    }

    #[test]
    fn init_rejects_missing_name() {
        let mut source = FileSource::new();
        let err = source.init(&SourceOptions::new()).expect_err("no name");
        assert!(matches!(err, StrataError::Source { .. }));
    }
}
