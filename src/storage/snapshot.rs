// ============================================================================
// Snapshot : état persisté de l'application
// ============================================================================
// Chargement "best effort" et sauvegarde des deux blobs JSON
//
// Disposition persistée :
// - moneyMuffinWallets   : [{id, name, amount, currency, lastUpdated, color, isLocked}]
// - moneyMuffinBaselines : {"RUB": 1039007, "USD": 1500, ...}
//
// CONCEPT : Dégradation gracieuse
// - Clé absente → valeurs par défaut
// - Blob illisible → jeu par défaut intégré, jamais de panic au démarrage
// ============================================================================

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use crate::error::PersistenceError;
use crate::ledger::BaselineTracker;
use crate::models::{default_wallets, Currency, Wallet, MAX_WALLET_ID};
use crate::storage::KeyValueStore;

/// Clé du blob des portefeuilles
pub const WALLETS_KEY: &str = "moneyMuffinWallets";

/// Clé du blob des baselines
pub const BASELINES_KEY: &str = "moneyMuffinBaselines";

/// État réhydraté au démarrage
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub wallets: Vec<Wallet>,
    pub baselines: BaselineTracker,
}

impl Snapshot {
    /// Jeu intégré : portefeuilles par défaut et baselines dérivées
    pub fn defaults() -> Self {
        let wallets = default_wallets();
        let baselines = BaselineTracker::seeded_from(&wallets);
        Self { wallets, baselines }
    }
}

/// Charge l'état persisté, en retombant sur le jeu intégré en cas d'échec
pub fn load(store: &dyn KeyValueStore) -> Snapshot {
    match try_load(store) {
        Ok(snapshot) => {
            info!(
                wallets = snapshot.wallets.len(),
                baselines = snapshot.baselines.as_map().len(),
                "Loaded persisted state"
            );
            snapshot
        }
        Err(e) => {
            warn!(error = %e, "Failed to load persisted state, using built-in defaults");
            Snapshot::defaults()
        }
    }
}

/// Chargement strict : la première erreur remonte
///
/// CONCEPT RUST : Opérateur ?
/// - Chaque lecture ou parsing peut échouer
/// - load() décide quoi faire de l'échec, pas try_load()
pub fn try_load(store: &dyn KeyValueStore) -> Result<Snapshot, PersistenceError> {
    let wallets = match store.get(WALLETS_KEY)? {
        Some(raw) => parse_wallets(&raw)?,
        None => {
            debug!("No persisted wallets, starting from defaults");
            default_wallets()
        }
    };

    // Baselines : valeurs dérivées des portefeuilles, puis valeurs persistées par-dessus
    let mut baselines = BaselineTracker::seeded_from(&wallets);
    if let Some(raw) = store.get(BASELINES_KEY)? {
        baselines.overlay(parse_baselines(&raw)?);
    }

    Ok(Snapshot { wallets, baselines })
}

/// Parse le blob des portefeuilles et vérifie les identifiants
///
/// Un identifiant en double ou hors bornes rend tout le blob invalide :
/// le chargement retombe alors sur le jeu par défaut.
fn parse_wallets(raw: &str) -> Result<Vec<Wallet>, PersistenceError> {
    let wallets: Vec<Wallet> =
        serde_json::from_str(raw).map_err(|source| PersistenceError::Deserialize {
            key: WALLETS_KEY.to_string(),
            source,
        })?;

    let invalid = |reason: String| PersistenceError::Invalid {
        key: WALLETS_KEY.to_string(),
        reason,
    };

    let mut seen = HashSet::with_capacity(wallets.len());
    for wallet in &wallets {
        if wallet.id > MAX_WALLET_ID {
            return Err(invalid(format!("wallet id {} is out of range", wallet.id)));
        }
        if !seen.insert(wallet.id) {
            return Err(invalid(format!("wallet id {} appears more than once", wallet.id)));
        }
    }
    Ok(wallets)
}

/// Parse le blob des baselines ; les codes devise inconnus sont ignorés
fn parse_baselines(raw: &str) -> Result<BTreeMap<Currency, f64>, PersistenceError> {
    let entries: BTreeMap<String, f64> =
        serde_json::from_str(raw).map_err(|source| PersistenceError::Deserialize {
            key: BASELINES_KEY.to_string(),
            source,
        })?;

    let mut baselines = BTreeMap::new();
    for (code, value) in entries {
        match code.parse::<Currency>() {
            Ok(currency) => {
                baselines.insert(currency, value);
            }
            Err(e) => warn!(error = %e, "Dropping baseline for unknown currency"),
        }
    }
    Ok(baselines)
}

/// Sérialise et écrit la collection de portefeuilles
pub fn save_wallets(store: &mut dyn KeyValueStore, wallets: &[Wallet]) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(wallets)?;
    store.set(WALLETS_KEY, &json)
}

/// Sérialise et écrit la table des baselines (code devise → nombre)
pub fn save_baselines(
    store: &mut dyn KeyValueStore,
    baselines: &BaselineTracker,
) -> Result<(), PersistenceError> {
    let by_code: BTreeMap<&str, f64> = baselines
        .as_map()
        .iter()
        .map(|(currency, value)| (currency.code(), *value))
        .collect();
    let json = serde_json::to_string(&by_code)?;
    store.set(BASELINES_KEY, &json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_missing_keys_use_defaults() {
        let store = MemoryStore::new();
        let snapshot = load(&store);
        assert_eq!(snapshot, Snapshot::defaults());
        assert_eq!(snapshot.wallets.len(), 7);
    }

    #[test]
    fn test_malformed_wallets_fall_back_to_defaults() {
        let store = MemoryStore::new()
            .with_entry(WALLETS_KEY, "{not json")
            .with_entry(BASELINES_KEY, r#"{"RUB": 5}"#);

        assert!(try_load(&store).is_err());
        assert_eq!(load(&store), Snapshot::defaults());
    }

    #[test]
    fn test_malformed_baselines_fall_back_to_defaults() {
        let store = MemoryStore::new()
            .with_entry(WALLETS_KEY, "[]")
            .with_entry(BASELINES_KEY, "[1, 2");
        assert_eq!(load(&store), Snapshot::defaults());
    }

    #[test]
    fn test_unknown_currency_in_wallet_is_rejected() {
        let store = MemoryStore::new().with_entry(
            WALLETS_KEY,
            r#"[{"id":1,"name":"x","amount":1,"currency":"GBP","lastUpdated":"01.01.2025","color":"primary","isLocked":false}]"#,
        );
        assert!(try_load(&store).is_err());
    }

    fn wallet_json(id: &str) -> String {
        format!(
            r#"{{"id":{},"name":"x","amount":1,"currency":"RUB","lastUpdated":"01.01.2025","color":"primary","isLocked":false}}"#,
            id
        )
    }

    #[test]
    fn test_duplicate_ids_fall_back_to_defaults() {
        let blob = format!("[{},{}]", wallet_json("7"), wallet_json("7"));
        let store = MemoryStore::new().with_entry(WALLETS_KEY, &blob);

        let err = try_load(&store).unwrap_err();
        assert!(matches!(err, PersistenceError::Invalid { ref key, .. } if key == WALLETS_KEY));
        assert_eq!(load(&store), Snapshot::defaults());
    }

    #[test]
    fn test_out_of_range_id_falls_back_to_defaults() {
        let blob = format!("[{}]", wallet_json("18446744073709551615"));
        let store = MemoryStore::new().with_entry(WALLETS_KEY, &blob);
        assert!(matches!(try_load(&store), Err(PersistenceError::Invalid { .. })));
        assert_eq!(load(&store), Snapshot::defaults());

        // Borne incluse : encore valide
        let blob = format!("[{}]", wallet_json(&MAX_WALLET_ID.to_string()));
        let store = MemoryStore::new().with_entry(WALLETS_KEY, &blob);
        assert_eq!(try_load(&store).unwrap().wallets[0].id, MAX_WALLET_ID);
    }

    #[test]
    fn test_saved_baselines_overlay_seeded_values() {
        let store = MemoryStore::new()
            .with_entry(
                WALLETS_KEY,
                r#"[
                    {"id":1,"name":"a","amount":100,"currency":"RUB","lastUpdated":"01.01.2025","color":"primary","isLocked":false},
                    {"id":2,"name":"b","amount":10,"currency":"USD","lastUpdated":"01.01.2025","color":"info","isLocked":true}
                ]"#,
            )
            .with_entry(BASELINES_KEY, r#"{"RUB": 50, "XYZ": 3}"#);

        let snapshot = try_load(&store).unwrap();
        assert_eq!(snapshot.wallets.len(), 2);
        assert!(snapshot.wallets[1].is_locked);
        assert_eq!(snapshot.baselines.baseline(Currency::RUB), 50.0);
        // Pas de valeur persistée pour USD : baseline = total actuel
        assert_eq!(snapshot.baselines.baseline(Currency::USD), 10.0);
    }

    #[test]
    fn test_empty_saved_collection_is_kept() {
        let store = MemoryStore::new()
            .with_entry(WALLETS_KEY, "[]")
            .with_entry(BASELINES_KEY, "{}");
        let snapshot = try_load(&store).unwrap();
        assert!(snapshot.wallets.is_empty());
        assert_eq!(snapshot.baselines.baseline(Currency::RUB), 0.0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let defaults = Snapshot::defaults();
        let mut baselines = defaults.baselines.clone();
        baselines.reset_drift(Currency::EUR, &[]);

        save_wallets(&mut store, &defaults.wallets).unwrap();
        save_baselines(&mut store, &baselines).unwrap();

        let raw = store.get(BASELINES_KEY).unwrap().unwrap();
        assert!(raw.contains("\"EUR\":0"));

        let loaded = try_load(&store).unwrap();
        assert_eq!(loaded.wallets, defaults.wallets);
        assert_eq!(loaded.baselines.baseline(Currency::EUR), 0.0);
    }

    #[test]
    fn test_save_failure_is_returned() {
        let mut store = MemoryStore::failing();
        assert!(save_wallets(&mut store, &[]).is_err());
    }
}
