// ============================================================================
// Module : ledger
// ============================================================================
// Logique métier sans dépendance à l'UI ni au stockage :
// collection de portefeuilles, baselines de dérive, devise par défaut
// ============================================================================

pub mod baseline;     // Baselines et dérive par devise
pub mod selector;     // Devise affichée par défaut
pub mod wallet_store; // Collection ordonnée des portefeuilles

pub use baseline::{total_for, BaselineTracker};
pub use selector::select_default_currency;
pub use wallet_store::{
    group_by_currency, CurrencyGroup, SortConfig, SortDirection, SortKey, WalletStore, COPY_SUFFIX,
};
