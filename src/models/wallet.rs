// ============================================================================
// Structure : Wallet
// ============================================================================
// Représente un portefeuille : espèces, compte bancaire, carte de crédit...
//
// CONCEPTS RUST :
// 1. #[serde(rename_all = "camelCase")] : le JSON persisté utilise
//    lastUpdated / isLocked, le code Rust last_updated / is_locked
// 2. #[serde(with = "...")] : format de date personnalisé (JJ.MM.AAAA)
// 3. Construction validée : WalletDraft refuse les saisies invalides
//    avant qu'elles n'atteignent le store
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{format_amount, Currency, WalletColor};

/// Identifiant unique d'un portefeuille (millisecondes Unix à la création)
pub type WalletId = u64;

/// Plus grand identifiant accepté au chargement (entier exact en JSON/JavaScript)
pub const MAX_WALLET_ID: WalletId = (1 << 53) - 1;

/// Un portefeuille avec son solde signé
///
/// Un montant négatif représente une dette (ex: solde de carte de crédit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Identifiant immuable, attribué à la création
    pub id: WalletId,

    /// Nom affiché (ex: "Cash")
    pub name: String,

    /// Solde signé
    pub amount: f64,

    /// Devise du solde
    pub currency: Currency,

    /// Date de dernière modification (création ou édition)
    #[serde(with = "date_format")]
    pub last_updated: NaiveDate,

    /// Étiquette décorative
    pub color: WalletColor,

    /// Verrou : bloque édition, suppression et duplication
    pub is_locked: bool,
}

impl Wallet {
    /// Montant formaté avec le symbole de la devise (ex: "14 007 ₽")
    pub fn display_amount(&self) -> String {
        format!("{} {}", format_amount(self.amount), self.currency.symbol())
    }

    /// Date au format persisté (ex: "25.10.2025")
    pub fn display_date(&self) -> String {
        format_date(self.last_updated)
    }
}

// ============================================================================
// WalletDraft : saisie validée pour création / édition
// ============================================================================

/// Champs modifiables d'un portefeuille, déjà validés
#[derive(Debug, Clone, PartialEq)]
pub struct WalletDraft {
    pub name: String,
    pub amount: f64,
    pub currency: Currency,
    pub color: WalletColor,
}

impl WalletDraft {
    /// Construit un brouillon à partir de valeurs typées
    ///
    /// Le nom est obligatoire ; un montant non fini est ramené à 0.
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        currency: Currency,
        color: WalletColor,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            name,
            amount: if amount.is_finite() { amount } else { 0.0 },
            currency,
            color,
        })
    }

    /// Construit un brouillon à partir du texte brut du formulaire
    ///
    /// CONCEPT : Parsing permissif
    /// - Un montant vide est refusé (ValidationError::MissingAmount)
    /// - Un montant non numérique vaut 0 plutôt que d'échouer
    pub fn parse(
        name: &str,
        amount_text: &str,
        currency: Currency,
        color: WalletColor,
    ) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if amount_text.trim().is_empty() {
            return Err(ValidationError::MissingAmount);
        }

        Self::new(name, parse_amount(amount_text), currency, color)
    }
}

/// Lit le plus long préfixe numérique du texte, 0 sinon
///
/// "12abc" → 12, "-3.5" → -3.5, "1,5" → 1.5, "abc" → 0
pub fn parse_amount(text: &str) -> f64 {
    let normalized = text.trim().replace(',', ".");

    // CONCEPT RUST : char_indices pour couper sur des frontières UTF-8 valides
    let mut value = 0.0;
    let ends = normalized
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(normalized.len()));

    for end in ends {
        if let Ok(parsed) = normalized[..end].parse::<f64>() {
            if parsed.is_finite() {
                value = parsed;
            }
        }
    }

    value
}

/// Formate une date au format JJ.MM.AAAA
pub fn format_date(date: NaiveDate) -> String {
    date.format(date_format::FORMAT).to_string()
}

/// Adaptateur serde pour les dates "JJ.MM.AAAA"
mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d.%m.%Y";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Jeu de portefeuilles par défaut
// ============================================================================
// Utilisé au premier lancement et quand les données persistées sont illisibles
// ============================================================================

/// Portefeuilles intégrés, chargés quand aucune donnée valide n'existe
pub fn default_wallets() -> Vec<Wallet> {
    let date = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap_or(NaiveDate::MIN);

    let seed = [
        (1, "Cash", 14007.0, Currency::RUB, WalletColor::Primary, false),
        (2, "Sber (deposit)", 100000.0, Currency::RUB, WalletColor::Secondary, true),
        (3, "Alfa-Bank (credit card)", -50000.0, Currency::RUB, WalletColor::Danger, false),
        (4, "Dollar account", 1500.0, Currency::USD, WalletColor::Info, false),
        (5, "VTB (credit card)", -25000.0, Currency::RUB, WalletColor::Primary, false),
        (6, "Euro account", 800.0, Currency::EUR, WalletColor::Cyan, false),
        (7, "DomRF (deposit)", 1000000.0, Currency::RUB, WalletColor::Purple, false),
    ];

    seed.into_iter()
        .map(|(id, name, amount, currency, color, is_locked)| Wallet {
            id,
            name: name.to_string(),
            amount,
            currency,
            last_updated: date,
            color,
            is_locked,
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_json_layout() {
        let wallet = Wallet {
            id: 42,
            name: "Cash".to_string(),
            amount: -12.5,
            currency: Currency::USD,
            last_updated: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            color: WalletColor::Teal,
            is_locked: true,
        };

        let value = serde_json::to_value(&wallet).unwrap();
        assert_eq!(value["lastUpdated"], "07.03.2025");
        assert_eq!(value["isLocked"], true);
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["color"], "teal");

        let back: Wallet = serde_json::from_value(value).unwrap();
        assert_eq!(back, wallet);
    }

    #[test]
    fn test_wallet_rejects_bad_date() {
        let json = r#"{"id":1,"name":"x","amount":1,"currency":"RUB","lastUpdated":"2025-10-25","color":"primary","isLocked":false}"#;
        assert!(serde_json::from_str::<Wallet>(json).is_err());
    }

    #[test]
    fn test_parse_amount_is_permissive() {
        assert_eq!(parse_amount("100"), 100.0);
        assert_eq!(parse_amount("  -3.5 "), -3.5);
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount("1,5"), 1.5);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("₽"), 0.0);
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(
            WalletDraft::parse("  ", "10", Currency::RUB, WalletColor::Primary),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            WalletDraft::parse("Cash", "", Currency::RUB, WalletColor::Primary),
            Err(ValidationError::MissingAmount)
        );

        let draft = WalletDraft::parse(" Cash ", "oops", Currency::EUR, WalletColor::Rose).unwrap();
        assert_eq!(draft.name, "Cash");
        assert_eq!(draft.amount, 0.0);

        let draft = WalletDraft::new("Card", f64::NAN, Currency::RUB, WalletColor::Primary).unwrap();
        assert_eq!(draft.amount, 0.0);
    }

    #[test]
    fn test_default_wallets() {
        let wallets = default_wallets();
        assert_eq!(wallets.len(), 7);
        assert!(wallets.iter().any(|w| w.is_locked));
        assert_eq!(wallets[0].display_date(), "25.10.2025");
        assert_eq!(wallets[0].display_amount(), "14 007 ₽");
    }
}
