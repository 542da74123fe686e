// ============================================================================
// Enum : Currency
// ============================================================================
// Catalogue statique des devises supportées
//
// CONCEPTS RUST :
// 1. Enum Copy : une devise est une simple étiquette, copiée sans coût
// 2. #[serde(rename_all = "UPPERCASE")] : "RUB", "USD"... dans le JSON
// 3. FromStr : parsing validé à la frontière (codes inconnus refusés)
//
// L'ordre des variants EST l'ordre canonique du catalogue :
// il pilote le regroupement par devise et le départage du sélecteur.
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Devise d'un portefeuille
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    RUB,
    USD,
    EUR,
    CNY,
    JPY,
}

/// Erreur de parsing d'un code devise inconnu
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

impl Currency {
    /// Toutes les devises, dans l'ordre du catalogue
    pub const ALL: [Currency; 5] = [
        Currency::RUB,
        Currency::USD,
        Currency::EUR,
        Currency::CNY,
        Currency::JPY,
    ];

    /// Devise principale : affichée par défaut, cible des conversions
    pub const PRIMARY: Currency = Currency::RUB;

    /// Code ISO (ex: "RUB")
    pub fn code(&self) -> &'static str {
        match self {
            Currency::RUB => "RUB",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::CNY => "CNY",
            Currency::JPY => "JPY",
        }
    }

    /// Symbole d'affichage
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::RUB => "₽",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::CNY => "元",
            Currency::JPY => "¥",
        }
    }

    /// Nom complet d'affichage
    pub fn name(&self) -> &'static str {
        match self {
            Currency::RUB => "Russian ruble",
            Currency::USD => "US dollar",
            Currency::EUR => "Euro",
            Currency::CNY => "Chinese yuan",
            Currency::JPY => "Japanese yen",
        }
    }

    /// Taux fixe : combien d'unités de la devise principale vaut une unité
    ///
    /// Table statique, pour l'affichage uniquement : elle n'est jamais
    /// persistée et ne modifie jamais les montants stockés.
    pub fn rate_to_primary(&self) -> f64 {
        match self {
            Currency::RUB => 1.0,
            Currency::USD => 90.0,
            Currency::EUR => 100.0,
            Currency::CNY => 12.5,
            Currency::JPY => 0.58,
        }
    }

    /// Position dans le catalogue (0 pour RUB)
    pub fn catalog_index(&self) -> usize {
        Currency::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }

    /// Devise suivante dans le catalogue (cyclique)
    ///
    /// CONCEPT : Cycle d'états, utilisé par le formulaire avec ←→
    pub fn next(&self) -> Self {
        Currency::ALL[(self.catalog_index() + 1) % Currency::ALL.len()]
    }

    /// Devise précédente dans le catalogue (cyclique)
    pub fn previous(&self) -> Self {
        let len = Currency::ALL.len();
        Currency::ALL[(self.catalog_index() + len - 1) % len]
    }
}

/// Convertit un montant d'une devise vers une autre via la table fixe
///
/// Passe par la devise principale : amount * rate(from) / rate(to)
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    let in_primary = amount * from.rate_to_primary();
    in_primary / to.rate_to_primary()
}

/// Seuil au-delà duquel la partie décimale n'est plus affichée
const LARGE_AMOUNT: f64 = 1e15;

/// Formate un montant à la manière ru-RU : 0 à 2 décimales,
/// milliers séparés par des espaces, virgule décimale
///
/// Exemples : 1000000 → "1 000 000", -50000.5 → "-50 000,5"
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // Arrondi au centime, puis on retire les zéros inutiles
    let rounded = (value * 100.0).round() / 100.0;
    let negative = rounded < 0.0;

    // Au-delà, les centimes ne tiennent plus dans un u64 : on formate
    // directement la partie entière du f64, sans décimales
    let (digits, fraction) = if rounded.abs() < LARGE_AMOUNT {
        let cents = (rounded.abs() * 100.0).round() as u64;
        ((cents / 100).to_string(), cents % 100)
    } else {
        (format!("{:.0}", rounded.abs().trunc()), 0)
    };
    let is_zero = digits == "0" && fraction == 0;

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let fraction_str = match fraction {
        0 => String::new(),
        f if f % 10 == 0 => format!(",{}", f / 10),
        f => format!(",{:02}", f),
    };

    let sign = if negative && !is_zero { "-" } else { "" };
    format!("{}{}{}", sign, grouped, fraction_str)
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCurrency(s.to_string()))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        assert_eq!(Currency::ALL[0], Currency::PRIMARY);
        assert_eq!(Currency::JPY.catalog_index(), 4);
        assert!(Currency::RUB < Currency::USD);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("usd".parse::<Currency>(), Ok(Currency::USD));
        assert_eq!(" EUR ".parse::<Currency>(), Ok(Currency::EUR));
        assert!("GBP".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Currency::CNY).unwrap();
        assert_eq!(json, "\"CNY\"");
        assert!(serde_json::from_str::<Currency>("\"XYZ\"").is_err());
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert(10.0, Currency::USD, Currency::RUB), 900.0);
        assert_eq!(convert(100.0, Currency::RUB, Currency::EUR), 1.0);
    }

    #[test]
    fn test_next_previous_cycle() {
        assert_eq!(Currency::JPY.next(), Currency::RUB);
        assert_eq!(Currency::RUB.previous(), Currency::JPY);
        assert_eq!(Currency::USD.next(), Currency::EUR);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(14007.0), "14 007");
        assert_eq!(format_amount(1_000_000.0), "1 000 000");
        assert_eq!(format_amount(-50000.5), "-50 000,5");
        assert_eq!(format_amount(12.346), "12,35");
        assert_eq!(format_amount(-0.001), "0");
    }

    #[test]
    fn test_format_huge_amounts() {
        assert_eq!(format_amount(1e20), "100 000 000 000 000 000 000");
        assert_eq!(format_amount(-2e18), "-2 000 000 000 000 000 000");
        assert_eq!(format_amount(999_999_999_999.99), "999 999 999 999,99");
        assert_eq!(format_amount(f64::INFINITY), "inf");
    }
}
