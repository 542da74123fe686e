// ============================================================================
// Configuration
// ============================================================================
// Résolue depuis l'environnement au démarrage
//
// Variables :
// - MONEYMUFFIN_DATA_DIR : répertoire des blobs persistés
//   (défaut : ~/.local/share/moneymuffin sur Linux, ./data sinon)
// - MONEYMUFFIN_LOG_DIR  : répertoire des logs (défaut : ./logs)
// - RUST_LOG             : filtre de logs (défaut : moneymuffin=debug,info)
// ============================================================================

use std::path::PathBuf;

/// Variable d'environnement du répertoire de données
pub const DATA_DIR_ENV: &str = "MONEYMUFFIN_DATA_DIR";

/// Variable d'environnement du répertoire de logs
pub const LOG_DIR_ENV: &str = "MONEYMUFFIN_LOG_DIR";

/// Filtre utilisé quand RUST_LOG n'est pas défini
pub const DEFAULT_LOG_FILTER: &str = "moneymuffin=debug,info";

/// Nom du fichier de logs (avant suffixe de rotation)
pub const LOG_FILE_NAME: &str = "moneymuffin.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Config {
    /// Lit la configuration depuis les variables d'environnement du processus
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Résout la configuration à partir d'une fonction de lookup
    ///
    /// CONCEPT RUST : Closure en paramètre générique
    /// - Les tests passent un lookup factice au lieu de muter l'environnement
    /// - Les valeurs vides sont ignorées
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let log_dir = non_empty(LOG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./logs"));

        Self { data_dir, log_dir }
    }
}

/// Répertoire de données de la plateforme
///
/// - Linux/WSL : ~/.local/share/moneymuffin
/// - macOS : ~/Library/Application Support/moneymuffin
/// - Windows : C:\Users\<user>\AppData\Roaming\moneymuffin
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("moneymuffin"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(|name| match name {
            DATA_DIR_ENV => Some("/tmp/mm-data".to_string()),
            LOG_DIR_ENV => Some("/tmp/mm-logs".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, PathBuf::from("/tmp/mm-data"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/mm-logs"));
    }

    #[test]
    fn test_defaults_ignore_empty_values() {
        let config = Config::from_lookup(|name| match name {
            DATA_DIR_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.data_dir, default_data_dir());
        assert_eq!(config.log_dir, PathBuf::from("./logs"));
        assert!(config.data_dir.ends_with("moneymuffin") || config.data_dir.ends_with("data"));
    }
}
