// ============================================================================
// Configuration
// ============================================================================
// Charge rbravo.toml (optionnel). Tous les champs ont une valeur par défaut :
// sans fichier, le dashboard interroge chain.so toutes les 30 secondes.
//
// Exemple :
//   api_base_url = "https://chain.so/api/v2"
//   refresh_interval_secs = 60
//   page_size = 20
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::models::REFERENCE_EXCHANGE;

/// Variable d'environnement pour surcharger le chemin du fichier
pub const CONFIG_ENV_VAR: &str = "RBRAVO_CONFIG";

/// Chemin par défaut
pub const DEFAULT_CONFIG_PATH: &str = "rbravo.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Racine de l'API chain.so
    pub api_base_url: String,

    /// Exchange dont le prix est affiché
    pub reference_exchange: String,

    /// Réseau interrogé pour les adresses (get_tx_received/{network}/...)
    pub wallet_network: String,

    /// Intervalle de revalidation automatique du prix
    pub refresh_interval_secs: u64,

    /// Timeout de chaque requête HTTP
    pub request_timeout_secs: u64,

    /// Nombre de lignes par page du tableau de transactions
    pub page_size: usize,

    /// Répertoire des fichiers de log
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://chain.so/api/v2".to_string(),
            reference_exchange: REFERENCE_EXCHANGE.to_string(),
            wallet_network: "btc".to_string(),
            refresh_interval_secs: 30,
            request_timeout_secs: 10,
            page_size: 10,
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl Config {
    /// Parse et valide un fichier TOML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("lecture de {}", path.display()))?;
        Self::from_toml(&s).with_context(|| format!("parse {}", path.display()))
    }

    /// Parse et valide du TOML
    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Charge la configuration : $RBRAVO_CONFIG, sinon ./rbravo.toml,
    /// sinon les valeurs par défaut
    ///
    /// Un fichier absent n'est pas une erreur ; un fichier invalide, si.
    pub fn load() -> Result<Self> {
        let path = env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Rejette les valeurs qui rendraient le dashboard inutilisable
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url ne peut pas être vide");
        }
        if reqwest::Url::parse(&self.api_base_url).is_err() {
            bail!("api_base_url invalide : {}", self.api_base_url);
        }
        if self.reference_exchange.trim().is_empty() {
            bail!("reference_exchange ne peut pas être vide");
        }
        if self.refresh_interval_secs == 0 {
            bail!("refresh_interval_secs doit être > 0");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs doit être > 0");
        }
        if self.page_size == 0 {
            bail!("page_size doit être > 0");
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
