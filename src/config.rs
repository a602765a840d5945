use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "tika-samples.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub generator: Generator,
    #[serde(default)]
    pub logging: Logging,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// Loads `user` if given, else `./tika-samples.toml` when present, else defaults.
    pub fn resolve(user: Option<&Path>) -> Result<Self> {
        if let Some(p) = user {
            return Self::load(p);
        }
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        if default.exists() {
            Self::load(&default)
        } else {
            Ok(Self::default())
        }
    }

    /// Replaces `server.url` with the value of the `server.url_env` variable when set.
    pub fn apply_env(&mut self) {
        let value = std::env::var(&self.server.url_env).ok();
        self.apply_url_override(value.as_deref());
    }

    pub fn apply_url_override(&mut self, value: Option<&str>) {
        if let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.server.url = url.to_string();
        }
    }

    pub fn base_url(&self) -> &str {
        self.server.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub samples_dir: String,
    pub out_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            samples_dir: "tika_samples".into(),
            out_dir: "tika_output".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub url: String,
    pub url_env: String,
    pub timeout_seconds: u64,
}
impl Default for Server {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9998".into(),
            url_env: "TIKA_URL".into(),
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub text: String,
    pub meta: String,
    pub rmeta: String,
    pub detect: String,
    pub language: String,
}
impl Default for Endpoints {
    fn default() -> Self {
        Self {
            text: "/tika".into(),
            meta: "/meta".into(),
            rmeta: "/rmeta/json".into(),
            detect: "/detect/stream".into(),
            language: "/language/stream".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub text_dir: String,
    pub meta_dir: String,
    pub rmeta_dir: String,
    pub mime_summary: String,
    pub language_summary: String,
    pub print_summary: bool,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            text_dir: "text".into(),
            meta_dir: "meta".into(),
            rmeta_dir: "rmeta".into(),
            mime_summary: "detected_mime.tsv".into(),
            language_summary: "detected_language.tsv".into(),
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generator {
    /// TrueType files tried in order for the logo label.
    pub font_candidates: Vec<String>,
    pub font_px: f32,
}
impl Default for Generator {
    fn default() -> Self {
        Self {
            font_candidates: vec![
                "DejaVuSans-Bold.ttf".into(),
                "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf".into(),
                "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf".into(),
                "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf".into(),
                "/Library/Fonts/DejaVuSans-Bold.ttf".into(),
            ],
            font_px: 64.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: false,
            file_path: "".into(),
        }
    }
}
