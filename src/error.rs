// ============================================================================
// Erreurs de l'application
// ============================================================================
// Taxonomie des échecs possibles
//
// CONCEPTS RUST :
// 1. thiserror : dérive Display + std::error::Error à partir d'attributs
// 2. #[from] : conversion automatique, permet d'utiliser ? entre types
// 3. Aucune erreur n'est fatale : chaque variant laisse l'état en mémoire
//    dans son dernier état cohérent
// ============================================================================

use std::fmt;
use std::io;

use thiserror::Error;

use crate::models::WalletId;

/// Action refusée sur un portefeuille verrouillé
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockedAction {
    Edit,
    Delete,
    Duplicate,
}

impl fmt::Display for LockedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            LockedAction::Edit => "edit",
            LockedAction::Delete => "delete",
            LockedAction::Duplicate => "copy",
        };
        f.write_str(verb)
    }
}

/// Tentative de modification d'un portefeuille verrouillé
///
/// Présentée à l'utilisateur comme un avertissement bloquant :
/// l'opération est abandonnée, rien n'est modifié.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("This wallet is locked. Unlock it first to {action} it.")]
pub struct LockedWalletError {
    pub id: WalletId,
    pub action: LockedAction,
}

/// Saisie invalide dans le formulaire de portefeuille
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in the wallet name.")]
    EmptyName,

    #[error("Please fill in the amount.")]
    MissingAmount,
}

/// Erreurs des opérations du WalletStore
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    #[error(transparent)]
    Locked(#[from] LockedWalletError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("wallet {0} not found")]
    NotFound(WalletId),
}

/// Échec de lecture/écriture du stockage clé-valeur
///
/// Toujours journalisée puis ignorée : la session continue en mémoire.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("malformed blob under key {key}: {source}")]
    Deserialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid blob under key {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_messages_name_the_action() {
        let err = LockedWalletError { id: 1, action: LockedAction::Delete };
        assert_eq!(err.to_string(), "This wallet is locked. Unlock it first to delete it.");

        let wrapped: WalletError = err.into();
        assert!(wrapped.to_string().contains("delete"));
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: WalletError = ValidationError::EmptyName.into();
        assert_eq!(err.to_string(), "Please fill in the wallet name.");
    }
}
