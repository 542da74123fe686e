// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod color;    // Palette d'étiquettes (fichier color.rs)
pub mod currency; // Catalogue des devises et table de taux (fichier currency.rs)
pub mod wallet;   // Portefeuille et saisie validée (fichier wallet.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use moneymuffin::models::wallet::Wallet;
// On peut faire : use moneymuffin::models::Wallet;
pub use color::WalletColor;
pub use currency::{convert, format_amount, Currency, UnknownCurrency};
pub use wallet::{
    default_wallets, format_date, parse_amount, Wallet, WalletDraft, WalletId, MAX_WALLET_ID,
};
