//! Launch settings of the visualizer binary, read from an optional `deriv_plot.txt`.
use crate::Utils::task_parser::{SettingsDocument, parse_settings_document};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "deriv_plot.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct PlotterSettings {
    /// PNG the plot is rendered into
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// debug, info, warn or error
    pub loglevel: String,
    /// also write a `log_<date>.txt` file
    pub log_to_file: bool,
}

impl Default for PlotterSettings {
    fn default() -> Self {
        PlotterSettings {
            output: PathBuf::from("derivative_plot.png"),
            width: 700,
            height: 400,
            loglevel: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl PlotterSettings {
    /// Reads the sections `plot` and `logging`; absent keys keep their defaults.
    ///
    /// # Errors
    /// A malformed document or a value of the wrong kind.
    pub fn from_document(text: &str) -> Result<Self, String> {
        let document = parse_settings_document(text)?;
        let mut settings = PlotterSettings::default();
        if let Some(output) = text_value(&document, "plot", "output")? {
            settings.output = PathBuf::from(output);
        }
        if let Some(width) = pixel_value(&document, "plot", "width")? {
            settings.width = width;
        }
        if let Some(height) = pixel_value(&document, "plot", "height")? {
            settings.height = height;
        }
        if let Some(level) = text_value(&document, "logging", "loglevel")? {
            let level = level.to_lowercase();
            if !matches!(level.as_str(), "debug" | "info" | "warn" | "error") {
                return Err(format!("loglevel must be debug, info, warn or error, got '{}'", level));
            }
            settings.loglevel = level;
        }
        if let Some(value) = document.first("logging", "log_to_file") {
            settings.log_to_file = value
                .as_boolean()
                .ok_or_else(|| format!("logging.log_to_file must be true or false, got '{}'", value))?;
        }
        Ok(settings)
    }

    /// Reads `path` if it exists, defaults otherwise.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(PlotterSettings::default());
        }
        let text = fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
        PlotterSettings::from_document(&text)
    }
}

fn text_value(document: &SettingsDocument, section: &str, key: &str) -> Result<Option<String>, String> {
    match document.first(section, key) {
        None => Ok(None),
        Some(value) => value
            .as_text()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| format!("{}.{} must be text, got '{}'", section, key, value)),
    }
}

fn pixel_value(document: &SettingsDocument, section: &str, key: &str) -> Result<Option<u32>, String> {
    match document.first(section, key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .and_then(|i| u32::try_from(i).ok())
            .filter(|&px| px > 0)
            .map(Some)
            .ok_or_else(|| format!("{}.{} must be a positive integer, got '{}'", section, key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_full_document() {
        let text = "
        plot
         output: out/plot.png
         width: 1024
         height: 768
        logging
         loglevel: debug
         log_to_file: true
        ";
        let settings = PlotterSettings::from_document(text).unwrap();
        assert_eq!(settings.output, PathBuf::from("out/plot.png"));
        assert_eq!(settings.width, 1024);
        assert_eq!(settings.height, 768);
        assert_eq!(settings.loglevel, "debug");
        assert!(settings.log_to_file);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let settings = PlotterSettings::from_document("plot\n width: 300").unwrap();
        assert_eq!(settings.width, 300);
        assert_eq!(settings.height, PlotterSettings::default().height);
        assert_eq!(settings.output, PlotterSettings::default().output);
        assert_eq!(PlotterSettings::from_document("").unwrap(), PlotterSettings::default());
    }

    #[test]
    fn test_bad_values() {
        assert!(PlotterSettings::from_document("plot\n width: wide").is_err());
        assert!(PlotterSettings::from_document("plot\n height: -5").is_err());
        assert!(PlotterSettings::from_document("logging\n loglevel: loud").is_err());
        assert!(PlotterSettings::from_document("logging\n log_to_file: maybe").is_err());
        assert!(PlotterSettings::from_document("plot width").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let mut file = File::create(&path).unwrap();
        writeln!(file, "# render target").unwrap();
        writeln!(file, "plot").unwrap();
        writeln!(file, " output: custom.png").unwrap();
        drop(file);
        let settings = PlotterSettings::load(&path).unwrap();
        assert_eq!(settings.output, PathBuf::from("custom.png"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let settings = PlotterSettings::load(&dir.path().join("absent.txt")).unwrap();
        assert_eq!(settings, PlotterSettings::default());
    }
}
