// ============================================================================
// Structure : BaselineTracker
// ============================================================================
// Point zéro par devise pour mesurer la dérive du solde total
//
// drift(c) = total(c) - baseline(c), une clé absente valant 0
// ============================================================================

use std::collections::BTreeMap;

use tracing::info;

use crate::models::{Currency, Wallet};

/// Somme des montants des portefeuilles d'une devise
pub fn total_for(currency: Currency, wallets: &[Wallet]) -> f64 {
    wallets
        .iter()
        .filter(|w| w.currency == currency)
        .map(|w| w.amount)
        .sum()
}

/// Instantanés de solde par devise
///
/// CONCEPT RUST : BTreeMap
/// - Itération triée selon Ord de Currency (ordre du catalogue)
/// - Sérialisation déterministe du blob persisté
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaselineTracker {
    baselines: BTreeMap<Currency, f64>,
}

impl BaselineTracker {
    /// Tracker vide : toutes les baselines valent 0
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(baselines: BTreeMap<Currency, f64>) -> Self {
        Self { baselines }
    }

    /// Baseline de chaque devise du catalogue = son total actuel
    pub fn seeded_from(wallets: &[Wallet]) -> Self {
        let baselines = Currency::ALL
            .into_iter()
            .map(|c| (c, total_for(c, wallets)))
            .collect();
        Self { baselines }
    }

    /// Applique des valeurs persistées par-dessus les valeurs actuelles
    pub fn overlay(&mut self, saved: BTreeMap<Currency, f64>) {
        self.baselines.extend(saved);
    }

    /// Baseline d'une devise (0 si absente)
    pub fn baseline(&self, currency: Currency) -> f64 {
        self.baselines.get(&currency).copied().unwrap_or(0.0)
    }

    pub fn drift_for(&self, currency: Currency, wallets: &[Wallet]) -> f64 {
        total_for(currency, wallets) - self.baseline(currency)
    }

    /// baseline[c] = total actuel ; retourne la nouvelle baseline
    pub fn reset_drift(&mut self, currency: Currency, wallets: &[Wallet]) -> f64 {
        let total = total_for(currency, wallets);
        self.baselines.insert(currency, total);
        info!(%currency, baseline = total, "Reset drift baseline");
        total
    }

    pub fn clear(&mut self) {
        self.baselines.clear();
    }

    pub fn as_map(&self) -> &BTreeMap<Currency, f64> {
        &self.baselines
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }
}
