// ============================================================================
// config.rs — Optional iconforge.toml settings
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IconError, Result};

/// Name of the config file looked up in the asset directory.
pub const CONFIG_FILE_NAME: &str = "iconforge.toml";

/// Standard Windows icon sizes.
pub const DEFAULT_ICO_SIZES: [u32; 6] = [16, 32, 48, 64, 128, 256];

/// Largest dimension an ICO directory entry can describe.
pub const MAX_ICO_SIZE: u32 = 256;

pub const DEFAULT_PNG_SIZE: u32 = 256;

/// Upper bound for the rendered PNG edge (a 4096² RGBA canvas is 64 MiB).
pub const MAX_PNG_SIZE: u32 = 4096;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Shown in the banner ("<app_name> - Icon Generator")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    pub files: FileNames,
    pub render: RenderConfig,
    pub icon: IconConfig,
    pub install: InstallConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileNames {
    pub svg: String,
    pub png: String,
    pub ico: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IconConfig {
    pub sizes: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InstallConfig {
    pub program: String,
    pub args: Vec<String>,
}

/// Input, intermediate and output file of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPaths {
    pub svg: PathBuf,
    pub png: PathBuf,
    pub ico: PathBuf,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            svg: "app_icon.svg".to_string(),
            png: "app_icon.png".to_string(),
            ico: "app_icon.ico".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_PNG_SIZE,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_ICO_SIZES.to_vec(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            program: "cargo".to_string(),
            args: vec![
                "install".to_string(),
                "--path".to_string(),
                env!("CARGO_MANIFEST_DIR").to_string(),
                "--features".to_string(),
                "svg,ico".to_string(),
                "--force".to_string(),
            ],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: None,
            files: FileNames::default(),
            render: RenderConfig::default(),
            icon: IconConfig::default(),
            install: InstallConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| IconError::io(path, e))?;
        let config: Config = toml::from_str(&content).map_err(|e| IconError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate().map_err(|e| IconError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Loads `path` when given, else `<dir>/iconforge.toml` if it exists, else defaults.
    pub fn discover(dir: &Path, path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let candidate = dir.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    tracing::debug!(path = %candidate.display(), "loading config");
                    Self::load(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| IconError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, content).map_err(|e| IconError::io(path, e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.size == 0 || self.render.size > MAX_PNG_SIZE {
            return Err(IconError::InvalidRenderSize(self.render.size));
        }
        normalize_sizes(&self.icon.sizes)?;
        Ok(())
    }

    pub fn resolve_paths(&self, dir: &Path) -> IconPaths {
        IconPaths {
            svg: dir.join(&self.files.svg),
            png: dir.join(&self.files.png),
            ico: dir.join(&self.files.ico),
        }
    }
}

/// Sorts and dedups ICO sizes; rejects an empty list and sizes outside 1..=256.
pub fn normalize_sizes(sizes: &[u32]) -> Result<Vec<u32>> {
    if sizes.is_empty() {
        return Err(IconError::Config {
            path: PathBuf::from(CONFIG_FILE_NAME),
            message: "icon sizes list is empty".to_string(),
        });
    }
    if let Some(&bad) = sizes.iter().find(|&&s| s == 0 || s > MAX_ICO_SIZE) {
        return Err(IconError::InvalidSize(bad));
    }
    let mut sizes = sizes.to_vec();
    sizes.sort_unstable();
    sizes.dedup();
    Ok(sizes)
}

/// Parses "16,32,48" as given on the command line.
pub fn parse_size_list(s: &str) -> std::result::Result<Vec<u32>, String> {
    s.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|e| format!("invalid size '{}': {}", part, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.files.svg, "app_icon.svg");
        assert_eq!(config.files.png, "app_icon.png");
        assert_eq!(config.files.ico, "app_icon.ico");
        assert_eq!(config.render.size, 256);
        assert_eq!(config.icon.sizes, vec![16, 32, 48, 64, 128, 256]);
        assert_eq!(config.install.program, "cargo");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
app_name = "Libasu Thaqva"

[icon]
sizes = [256, 16, 32]
"#,
        )
        .unwrap();
        assert_eq!(config.app_name.as_deref(), Some("Libasu Thaqva"));
        assert_eq!(config.icon.sizes, vec![256, 16, 32]);
        assert_eq!(config.files, FileNames::default());
        assert_eq!(config.render.size, 256);
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        assert!(matches!(normalize_sizes(&[16, 512]), Err(IconError::InvalidSize(512))));
        assert!(matches!(normalize_sizes(&[0]), Err(IconError::InvalidSize(0))));
        assert!(normalize_sizes(&[]).is_err());
        assert_eq!(normalize_sizes(&[48, 16, 48]).unwrap(), vec![16, 48]);
    }

    #[test]
    fn test_load_and_discover() {
        let dir = tempfile::tempdir().unwrap();
        // No config file → defaults
        let config = Config::discover(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[files]\nsvg = \"logo.svg\"\n[render]\nsize = 128\n",
        )
        .unwrap();
        let config = Config::discover(dir.path(), None).unwrap();
        assert_eq!(config.files.svg, "logo.svg");
        assert_eq!(config.render.size, 128);
        let paths = config.resolve_paths(dir.path());
        assert_eq!(paths.svg, dir.path().join("logo.svg"));
        assert_eq!(paths.ico, dir.path().join("app_icon.ico"));

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[icon]\nsizes = [300]\n").unwrap();
        let err = Config::discover(dir.path(), None).unwrap_err();
        assert!(matches!(err, IconError::Config { .. }));
    }

    #[test]
    fn test_render_size_bounds() {
        let mut config = Config::default();
        config.render.size = 0;
        assert!(matches!(config.validate(), Err(IconError::InvalidRenderSize(0))));
        config.render.size = 100_000;
        assert!(matches!(config.validate(), Err(IconError::InvalidRenderSize(100_000))));
        config.render.size = MAX_PNG_SIZE;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_size_list() {
        assert_eq!(parse_size_list("16, 32,48").unwrap(), vec![16, 32, 48]);
        assert!(parse_size_list("16,abc").is_err());
    }
}
