// ============================================================================
// Module : config
// ============================================================================
// Paramètres de l'application, avec des valeurs par défaut raisonnables.
// Seul le chemin du fichier de watchlist peut venir de l'environnement.
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

/// Variable d'environnement pour changer le fichier de watchlist
pub const WATCHLIST_ENV: &str = "QUOTETERM_WATCHLIST";

/// Configuration de quoteterm
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Fichier JSON contenant les symboles de la watchlist
    pub watchlist_path: PathBuf,

    /// Période du rafraîchissement automatique
    pub refresh_period: Duration,

    /// Timeout de chaque requête HTTP vers le fournisseur
    pub request_timeout: Duration,

    /// Répertoire des fichiers de logs
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watchlist_path: PathBuf::from("watchlist.json"),
            refresh_period: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl Config {
    /// Valeurs par défaut, chemin de watchlist surchargeable
    pub fn from_env() -> Self {
        Self::with_watchlist_override(std::env::var_os(WATCHLIST_ENV).map(PathBuf::from))
    }

    fn with_watchlist_override(path: Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(path) = path.filter(|p| !p.as_os_str().is_empty()) {
            config.watchlist_path = path;
        }
        config
    }
}
