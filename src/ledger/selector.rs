// ============================================================================
// Sélection de la devise affichée par défaut
// ============================================================================
// Heuristique relancée après chaque changement de la collection :
// 1. Collection vide → devise principale
// 2. Devise(s) la/les plus fréquente(s) = candidates
// 3. Égalité → plus grand total absolu converti en devise principale
// 4. Toujours égalité → première candidate dans l'ordre du catalogue
// ============================================================================

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{convert, Currency, Wallet};

/// Choisit la devise à afficher pour une collection donnée
pub fn select_default_currency(wallets: &[Wallet]) -> Currency {
    if wallets.is_empty() {
        return Currency::PRIMARY;
    }

    // CONCEPT RUST : BTreeMap<Currency, _>
    // - Les clés sortent dans l'ordre du catalogue (Ord dérivé)
    // - Les candidates sont donc examinées dans cet ordre
    let mut counts: BTreeMap<Currency, usize> = BTreeMap::new();
    for wallet in wallets {
        *counts.entry(wallet.currency).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let candidates: Vec<Currency> = counts
        .into_iter()
        .filter(|(_, count)| *count == max_count)
        .map(|(currency, _)| currency)
        .collect();

    if let [single] = candidates.as_slice() {
        return *single;
    }

    // Départage : seule une valeur strictement supérieure remplace la meilleure
    let mut best = Currency::PRIMARY;
    let mut best_total = f64::NEG_INFINITY;
    for currency in &candidates {
        let total = converted_abs_total(*currency, wallets);
        if total > best_total {
            best_total = total;
            best = *currency;
        }
    }

    debug!(?candidates, selected = %best, "Broke currency tie by converted balance");
    best
}

/// Somme des valeurs absolues, converties en devise principale
fn converted_abs_total(currency: Currency, wallets: &[Wallet]) -> f64 {
    wallets
        .iter()
        .filter(|w| w.currency == currency)
        .map(|w| convert(w.amount, w.currency, Currency::PRIMARY).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WalletColor;
    use chrono::NaiveDate;

    fn wallet(id: u64, amount: f64, currency: Currency) -> Wallet {
        Wallet {
            id,
            name: format!("w{}", id),
            amount,
            currency,
            last_updated: NaiveDate::from_ymd_opt(2025, 10, 25).unwrap(),
            color: WalletColor::Primary,
            is_locked: false,
        }
    }

    #[test]
    fn test_empty_selects_primary() {
        assert_eq!(select_default_currency(&[]), Currency::RUB);
    }

    #[test]
    fn test_most_frequent_wins() {
        let wallets = vec![
            wallet(1, 1.0, Currency::EUR),
            wallet(2, 1_000_000.0, Currency::RUB),
            wallet(3, 2.0, Currency::EUR),
        ];
        assert_eq!(select_default_currency(&wallets), Currency::EUR);
    }

    #[test]
    fn test_tie_broken_by_converted_abs_total() {
        // RUB : |100| + |-50| = 150 ; USD : (|4| + |-6|) * 90 = 900
        let wallets = vec![
            wallet(1, 100.0, Currency::RUB),
            wallet(2, -50.0, Currency::RUB),
            wallet(3, 4.0, Currency::USD),
            wallet(4, -6.0, Currency::USD),
        ];
        assert_eq!(select_default_currency(&wallets), Currency::USD);
    }

    #[test]
    fn test_full_tie_uses_catalog_order() {
        // 90 RUB == 1 USD une fois converti : égalité parfaite
        let wallets = vec![
            wallet(1, 1.0, Currency::USD),
            wallet(2, 90.0, Currency::RUB),
        ];
        assert_eq!(select_default_currency(&wallets), Currency::RUB);

        let wallets = vec![
            wallet(1, 0.0, Currency::JPY),
            wallet(2, 0.0, Currency::EUR),
        ];
        assert_eq!(select_default_currency(&wallets), Currency::EUR);
    }
}
