//! App data and config file management
//
// Layout under the platform data dir:
//   configs/prefs.toml   user preferences, written with defaults on first run
//   configs/keymap.toml  optional keymap overrides
//   documents/untitled.toml  document saved when no --file is given
//   logs/<timestamp>/    one folder per run

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use directories::ProjectDirs;
use engine_state::{MemoryStage, Preferences};
use window_manager::Keymap;

use crate::args::ParsedArgs;
use crate::consts::{APP_DIR_NAME, APP_ORGANIZATION, APP_QUALIFIER};

#[derive(Debug, Clone)]
pub struct AppDataPaths {
    pub appdata_dir: PathBuf,
    pub config_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub prefs_file: PathBuf,
    pub keymap_file: PathBuf,
    pub document_file: PathBuf,
}

impl AppDataPaths {
    /// Paths under the platform's data directory.
    pub fn resolve() -> anyhow::Result<Self> {
        let proj_dirs = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_DIR_NAME)
            .context("Could not determine app data directory")?;
        Ok(Self::under(proj_dirs.data_dir()))
    }

    pub fn under(appdata_dir: &Path) -> Self {
        let config_dir = appdata_dir.join("configs");
        Self {
            appdata_dir: appdata_dir.to_path_buf(),
            logs_dir: appdata_dir.join("logs"),
            prefs_file: config_dir.join("prefs.toml"),
            keymap_file: config_dir.join("keymap.toml"),
            document_file: appdata_dir.join("documents").join("untitled.toml"),
            config_dir,
        }
    }
}

/// Preferences for this run.
///
/// `--factory-startup` skips every file. An explicit `--prefs` file must
/// exist; the default file is created with defaults when missing.
pub fn load_preferences(paths: &AppDataPaths, args: &ParsedArgs) -> anyhow::Result<Preferences> {
    if args.factory_startup {
        tracing::info!("Factory startup, using default preferences");
        return Ok(Preferences::default());
    }

    match &args.prefs {
        Some(path) => {
            tracing::info!("Loading preferences from {}", path.display());
            Preferences::load(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => {
            tracing::info!("Loading preferences from {}", paths.prefs_file.display());
            Preferences::load_or_create(&paths.prefs_file)
                .with_context(|| format!("Failed to load {}", paths.prefs_file.display()))
        }
    }
}

/// The default window keymap with the user's overrides merged in.
///
/// A malformed override file is reported and ignored.
pub fn load_keymap(paths: &AppDataPaths, args: &ParsedArgs) -> Keymap {
    let mut keymap = Keymap::default_window_keymap();
    if args.factory_startup || !paths.keymap_file.exists() {
        return keymap;
    }

    let overrides = fs::read_to_string(&paths.keymap_file)
        .map_err(anyhow::Error::from)
        .and_then(|text| toml::from_str::<Keymap>(&text).map_err(anyhow::Error::from));
    match overrides {
        Ok(overrides) => {
            tracing::info!(
                "Merging {} keymap items from {}",
                overrides.items.len(),
                paths.keymap_file.display()
            );
            keymap.merge(overrides);
        }
        Err(e) => tracing::warn!("Ignoring keymap file {}: {e:#}", paths.keymap_file.display()),
    }
    keymap
}

/// The stage backing this run's document: `--file` or the default document.
///
/// An existing file is loaded; otherwise it is created on the first save.
pub fn open_document(paths: &AppDataPaths, args: &ParsedArgs) -> anyhow::Result<MemoryStage> {
    let path = args.file.as_ref().unwrap_or(&paths.document_file);
    tracing::info!("Document file: {}", path.display());
    MemoryStage::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_default_prefs() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppDataPaths::under(dir.path());

        let prefs = load_preferences(&paths, &ParsedArgs::default()).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(paths.prefs_file.exists());
    }

    #[test]
    fn test_explicit_prefs_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppDataPaths::under(dir.path());
        let args = ParsedArgs {
            prefs: Some(dir.path().join("missing.toml")),
            ..Default::default()
        };
        assert!(load_preferences(&paths, &args).is_err());
    }

    #[test]
    fn test_factory_startup_ignores_files() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppDataPaths::under(dir.path());
        fs::create_dir_all(&paths.config_dir).unwrap();
        fs::write(&paths.prefs_file, "show_save_prompt = false").unwrap();
        let args = ParsedArgs {
            factory_startup: true,
            ..Default::default()
        };

        assert!(load_preferences(&paths, &args).unwrap().show_save_prompt);
        assert!(!load_preferences(&paths, &ParsedArgs::default()).unwrap().show_save_prompt);
    }

    #[test]
    fn test_document_defaults_to_app_data() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppDataPaths::under(dir.path());

        let stage = open_document(&paths, &ParsedArgs::default()).unwrap();
        assert_eq!(stage.file_path(), Some(paths.document_file.as_path()));

        let args = ParsedArgs {
            file: Some(dir.path().join("mine.toml")),
            ..Default::default()
        };
        let stage = open_document(&paths, &args).unwrap();
        assert_eq!(stage.file_path(), Some(dir.path().join("mine.toml").as_path()));
    }

    #[test]
    fn test_broken_keymap_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppDataPaths::under(dir.path());
        fs::create_dir_all(&paths.config_dir).unwrap();
        fs::write(&paths.keymap_file, "item = 3").unwrap();

        let keymap = load_keymap(&paths, &ParsedArgs::default());
        assert_eq!(keymap, Keymap::default_window_keymap());
    }
}
