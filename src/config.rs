use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::api::{ApiConfig, ImageType, Orientation};

/// Environment variable consulted when no API key flag is set.
pub const API_KEY_ENV: &str = "PIXABAY_API_KEY";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub api_key: Option<String>,
    pub per_page: Option<u32>,
    pub image_type: Option<ImageType>,
    pub orientation: Option<Orientation>,
    pub no_safesearch: bool,
    pub no_images: bool,
    pub force_half_cell: bool,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            per_page: other.per_page.or(self.per_page),
            image_type: other.image_type.or(self.image_type),
            orientation: other.orientation.or(self.orientation),
            no_safesearch: self.no_safesearch || other.no_safesearch,
            no_images: self.no_images || other.no_images,
            force_half_cell: self.force_half_cell || other.force_half_cell,
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    /// Build the API settings, falling back to `env_key` for the key.
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured anywhere.
    pub fn api_config(&self, env_key: Option<String>) -> Result<ApiConfig> {
        let key = self
            .api_key
            .clone()
            .or(env_key)
            .filter(|k| !k.trim().is_empty())
            .with_context(|| format!("No API key: pass --api-key or set {API_KEY_ENV}"))?;
        let mut config = ApiConfig::new(key);
        if let Some(per_page) = self.per_page {
            config = config.with_per_page(per_page);
        }
        if let Some(image_type) = self.image_type {
            config.image_type = image_type;
        }
        if let Some(orientation) = self.orientation {
            config.orientation = orientation;
        }
        config.safesearch = !self.no_safesearch;
        Ok(config)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("pixgrid").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pixgrid")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("pixgrid").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("pixgrid").join("config");
        }
    }

    PathBuf::from(".pixgridrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".pixgridrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# pixgrid defaults (saved with --save)".to_string());
    if let Some(key) = &flags.api_key {
        lines.push(format!("--api-key {key}"));
    }
    if let Some(per_page) = flags.per_page {
        lines.push(format!("--per-page {per_page}"));
    }
    if let Some(image_type) = flags.image_type {
        lines.push(format!("--image-type {}", image_type.as_str()));
    }
    if let Some(orientation) = flags.orientation {
        lines.push(format!("--orientation {}", orientation.as_str()));
    }
    if flags.no_safesearch {
        lines.push("--no-safesearch".to_string());
    }
    if flags.no_images {
        lines.push("--no-images".to_string());
    }
    if flags.force_half_cell {
        lines.push("--force-half-cell".to_string());
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of a token list; everything else is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--api-key" | "--per-page" | "--image-type" | "--orientation" | "--log-file"
        );
        let value = if takes_value {
            inline.or_else(|| {
                let next = tokens.get(i + 1).map(String::as_str);
                if next.is_some() {
                    i += 1;
                }
                next
            })
        } else {
            None
        };

        match (name, value) {
            ("--api-key", Some(v)) => flags.api_key = Some(v.to_string()),
            ("--per-page", Some(v)) => flags.per_page = v.parse().ok(),
            ("--image-type", Some(v)) => flags.image_type = parse_image_type(v),
            ("--orientation", Some(v)) => flags.orientation = parse_orientation(v),
            ("--log-file", Some(v)) => flags.log_file = Some(PathBuf::from(v)),
            ("--no-safesearch", _) => flags.no_safesearch = true,
            ("--no-images", _) => flags.no_images = true,
            ("--force-half-cell", _) => flags.force_half_cell = true,
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_image_type(s: &str) -> Option<ImageType> {
    match s {
        "all" => Some(ImageType::All),
        "photo" => Some(ImageType::Photo),
        "illustration" => Some(ImageType::Illustration),
        "vector" => Some(ImageType::Vector),
        _ => None,
    }
}

fn parse_orientation(s: &str) -> Option<Orientation> {
    match s {
        "all" => Some(Orientation::All),
        "horizontal" => Some(Orientation::Horizontal),
        "vertical" => Some(Orientation::Vertical),
        _ => None,
    }
}
