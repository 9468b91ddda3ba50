//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::app::palette::{DEFAULT_ALPHA, DaySeed, Palette};
use crate::app::params::{Language, SessionParams};
use crate::app::validation::ValidationOptions;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".spanlink/config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub palette: PaletteConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// `[session]`: unset keys fall through to lower layers, then to the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionDefaults {
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    submit_to: Option<String>,
    #[serde(default)]
    assignment_id: Option<String>,
}

impl SessionDefaults {
    const DEFAULT_LANGUAGE: &'static str = "fr";
    const DEFAULT_SUBMIT_TO: &'static str = "https://www.mturk.com";

    pub fn language_code(&self) -> &str {
        self.language.as_deref().unwrap_or(Self::DEFAULT_LANGUAGE)
    }

    /// The configured target language.
    pub fn language(&self) -> Result<Language> {
        let code = self.language_code();
        code.parse().with_context(|| format!("invalid [session] language '{code}'"))
    }

    pub fn submit_to(&self) -> &str {
        self.submit_to.as_deref().unwrap_or(Self::DEFAULT_SUBMIT_TO)
    }

    pub fn assignment_id(&self) -> Option<&str> {
        self.assignment_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaletteConfig {
    #[serde(default)]
    alpha: Option<f32>,
    /// Fixed day label (e.g. `"Mon Oct 19 2026"`) instead of today.
    #[serde(default)]
    seed: Option<String>,
}

impl PaletteConfig {
    /// Background opacity, clamped to `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        match self.alpha {
            Some(alpha) if (0.0..=1.0).contains(&alpha) => alpha,
            Some(alpha) => {
                warn!(alpha, "palette alpha outside [0, 1]; clamping");
                alpha.clamp(0.0, 1.0)
            }
            None => DEFAULT_ALPHA,
        }
    }

    pub fn seed(&self) -> Option<&str> {
        self.seed.as_deref()
    }

    /// Build the palette for the configured (or current) day.
    pub fn palette(&self) -> Result<Palette> {
        let seed = match self.seed() {
            Some(label) => DaySeed::from_label(label),
            None => DaySeed::today()?,
        };
        Ok(Palette::new(seed).with_alpha(self.alpha()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationConfig {
    #[serde(default)]
    warn_on_bare_entities: Option<bool>,
}

impl ValidationConfig {
    pub fn warn_on_bare_entities(&self) -> bool {
        self.warn_on_bare_entities.unwrap_or(true)
    }

    pub fn options(&self) -> ValidationOptions {
        ValidationOptions {
            warn_on_bare_entities: self.warn_on_bare_entities(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    language: Option<String>,
    submit_to: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            language: env::var("SPANLINK_LANGUAGE").ok(),
            submit_to: env::var("SPANLINK_SUBMIT_TO").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(language: &str, submit_to: &str) -> Self {
        Self {
            language: Some(language.to_owned()),
            submit_to: Some(submit_to.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    /// Load a single config file; missing keys take their built-in defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            session: merge_session(self.session, other.session),
            palette: merge_palette(self.palette, other.palette),
            validation: merge_validation(self.validation, other.validation),
        }
    }

    /// Session parameters for a non-preview task using the configured defaults.
    pub fn session_params(&self) -> Result<SessionParams> {
        let mut params = SessionParams::new(self.session.language()?, self.session.submit_to());
        if let Some(assignment_id) = self.session.assignment_id() {
            params = params.with_assignment_id(assignment_id);
        }
        Ok(params)
    }
}

fn merge_session(mut base: SessionDefaults, overlay: SessionDefaults) -> SessionDefaults {
    if let Some(value) = overlay.language {
        base.language = Some(value);
    }
    if let Some(value) = overlay.submit_to {
        base.submit_to = Some(value);
    }
    if let Some(value) = overlay.assignment_id {
        base.assignment_id = Some(value);
    }
    base
}

fn merge_palette(mut base: PaletteConfig, overlay: PaletteConfig) -> PaletteConfig {
    if let Some(value) = overlay.alpha {
        base.alpha = Some(value);
    }
    if let Some(value) = overlay.seed {
        base.seed = Some(value);
    }
    base
}

fn merge_validation(mut base: ValidationConfig, overlay: ValidationConfig) -> ValidationConfig {
    if let Some(value) = overlay.warn_on_bare_entities {
        base.warn_on_bare_entities = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("spanlink/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(language) = env.language {
        config.session.language = Some(language);
    }
    if let Some(submit_to) = env.submit_to {
        config.session.submit_to = Some(submit_to);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config.session.language_code(), "fr");
        assert_eq!(config.session.submit_to(), "https://www.mturk.com");
        assert_eq!(config.palette.alpha(), DEFAULT_ALPHA);
        assert!(config.validation.warn_on_bare_entities());
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[session]
language = "ko"
[palette]
alpha = 0.5
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".spanlink"))?;
        fs::create_dir_all(workspace_dir.join(".git"))?;
        fs::write(
            workspace_dir.join(".spanlink/config.toml"),
            r#"
[session]
submit_to = "https://workersandbox.mturk.com"
[palette]
seed = "Mon Oct 19 2026"
[validation]
warn_on_bare_entities = false
"#,
        )?;

        let global_path = Some(global);
        let workspace_path = Some(workspace_dir.join(".spanlink/config.toml"));

        let config =
            Config::load_with_layers(global_path, workspace_path, EnvOverrides::default())?;

        assert_eq!(config.session.language()?, Language::Korean);
        assert_eq!(config.session.submit_to(), "https://workersandbox.mturk.com");
        assert_eq!(config.palette.alpha(), 0.5);
        assert_eq!(config.palette.seed(), Some("Mon Oct 19 2026"));
        assert!(!config.validation.options().warn_on_bare_entities);

        Ok(())
    }

    #[test]
    fn workspace_can_restore_default_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
[session]
language = "ko"
submit_to = "https://workersandbox.mturk.com"
"#,
        )?;
        let workspace = temp.path().join("workspace.toml");
        fs::write(
            &workspace,
            r#"
[session]
language = "fr"
submit_to = "https://www.mturk.com"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(workspace), EnvOverrides::default())?;
        assert_eq!(config.session.language()?, Language::French);
        assert_eq!(config.session.submit_to(), "https://www.mturk.com");
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("ru", "https://example.test");
        let config = Config::load_with_layers(None, None, overrides)?;
        let params = config.session_params()?;
        assert_eq!(params.language, Language::Russian);
        assert_eq!(params.submit_url(), "https://example.test/mturk/externalSubmit");
        Ok(())
    }

    #[test]
    fn fixed_seed_gives_a_stable_palette() -> Result<()> {
        let config: Config = toml::from_str("[palette]\nseed = \"Mon Oct 19 2026\"\n")?;
        let first = config.palette.palette()?;
        let second = config.palette.palette()?;
        assert_eq!(first.entity_color(1), second.entity_color(1));
        Ok(())
    }

    #[test]
    fn out_of_range_alpha_is_clamped() -> Result<()> {
        let config: Config = toml::from_str("[palette]\nalpha = 1.5\n")?;
        assert_eq!(config.palette.alpha(), 1.0);
        Ok(())
    }

    #[test]
    fn unknown_language_is_reported() {
        let overrides = EnvOverrides::for_tests("xx", "https://example.test");
        let config = Config::load_with_layers(None, None, overrides).unwrap();
        assert!(config.session_params().is_err());
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
