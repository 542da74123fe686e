// ============================================================================
// Module : storage
// ============================================================================
// Persistance de l'état : stockage clé-valeur et blobs JSON
// ============================================================================

pub mod kv;       // Trait KeyValueStore, FileStore, MemoryStore
pub mod snapshot; // Chargement / sauvegarde des blobs

// Re-exports
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use snapshot::{load, save_baselines, save_wallets, Snapshot, BASELINES_KEY, WALLETS_KEY};
