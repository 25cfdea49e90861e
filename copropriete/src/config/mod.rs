//! Configuration de lecture des exports
//!
//! Ordre de priorité: options de la ligne de commande, puis variables
//! d'environnement (`COPRO_*`, éventuellement depuis `.env`), puis preset
//! ou fichier JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use titre_foncier::{LayoutVariant, ParserOptions};

pub const ENV_SEPARATOR: &str = "COPRO_SEPARATOR";
pub const ENV_LAYOUT: &str = "COPRO_LAYOUT";
pub const ENV_HEADER_SKIP: &str = "COPRO_HEADER_SKIP";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Séparateur de champs
    #[serde(default = "default_separator")]
    pub separator: char,

    /// Disposition des colonnes
    #[serde(default)]
    pub layout: LayoutVariant,

    /// Lignes consommées à partir du marqueur "Propriété dite"
    #[serde(default = "default_header_skip")]
    pub header_skip: usize,
}

fn default_separator() -> char {
    ';'
}

fn default_header_skip() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            layout: LayoutVariant::default(),
            header_skip: default_header_skip(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "standard" => Self::load_embedded(include_str!("presets/standard.json")),
            "decale" => Self::load_embedded(include_str!("presets/decale.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: standard, decale", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Nom de preset ou chemin d'un fichier JSON
    pub fn resolve(spec: &str) -> Result<Self> {
        match spec {
            "standard" | "decale" => Self::from_preset(spec),
            _ => Self::load(Path::new(spec)),
        }
    }

    /// Applique les variables d'environnement `COPRO_*`
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = var(ENV_SEPARATOR) {
            self.separator = parse_separator(&value)
                .with_context(|| format!("Invalid {}", ENV_SEPARATOR))?;
        }
        if let Some(value) = var(ENV_LAYOUT) {
            self.layout = value
                .parse()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid {}", ENV_LAYOUT))?;
        }
        if let Some(value) = var(ENV_HEADER_SKIP) {
            self.header_skip = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {}", ENV_HEADER_SKIP, value))?;
        }
        self.validate()
    }

    /// Vérifie que la configuration est utilisable par le parser
    pub fn validate(&self) -> Result<()> {
        if !self.separator.is_ascii() || self.separator == '"' {
            anyhow::bail!("Separator must be a single ASCII character other than '\"'");
        }
        if self.header_skip == 0 {
            anyhow::bail!("header_skip must be at least 1");
        }
        Ok(())
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            separator: self.separator,
            layout: self.layout,
            header_skip: self.header_skip,
        }
    }
}

/// Accepte un caractère, ou les noms "tab" / "\t"
pub fn parse_separator(value: &str) -> Result<char> {
    if matches!(value, "tab" | "\\t") {
        return Ok('\t');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => anyhow::bail!("Separator must be one character, got {:?}", value),
    }
}
