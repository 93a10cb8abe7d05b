//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\speech-feedback\
//!   macOS:   ~/Library/Application Support/speech-feedback/
//!   Linux:   ~/.config/speech-feedback/
//!
//! Data dir (pronunciation dictionaries):
//!   Windows: %LOCALAPPDATA%\speech-feedback\
//!   macOS:   ~/Library/Application Support/speech-feedback/
//!   Linux:   ~/.local/share/speech-feedback/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for downloaded pronunciation dictionaries.
    pub dictionaries_dir: PathBuf,
    /// Default pronunciation dictionary.
    pub lexicon_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "speech-feedback";

    /// Resolves all paths using the `dirs` crate, falling back to the current
    /// directory when the platform provides none.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let dictionaries_dir = data_dir.join("dictionaries");
        let lexicon_file = dictionaries_dir.join("german_mfa.dict");

        Self {
            config_dir,
            settings_file,
            dictionaries_dir,
            lexicon_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
