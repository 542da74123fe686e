// ============================================================================
// Stockage clé-valeur
// ============================================================================
// Deux blobs JSON indépendants sous des clés fixes, rien de plus
//
// CONCEPTS RUST :
// 1. Trait KeyValueStore : le contrôleur ne connaît que cette interface
// 2. FileStore : un fichier par clé, écriture atomique (tmp + rename)
// 3. MemoryStore : implémentation en mémoire pour les tests et le mode headless
// ============================================================================

use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PersistenceError;

/// Stockage durable de blobs texte indexés par clé
pub trait KeyValueStore {
    /// Lit la valeur d'une clé (None si absente)
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Écrit (ou remplace) la valeur d'une clé
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

fn io_error(key: &str, source: io::Error) -> PersistenceError {
    PersistenceError::Io {
        key: key.to_string(),
        source,
    }
}

// ============================================================================
// FileStore
// ============================================================================

/// Un fichier `<clé>.json` par clé dans un répertoire de données
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Le répertoire est créé paresseusement à la première écriture
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        // CONCEPT : Écriture atomique
        // - On écrit dans un fichier temporaire puis on renomme
        // - Un crash en cours d'écriture ne laisse jamais un blob tronqué
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))?;

        debug!(key, bytes = value.len(), path = ?path, "Wrote blob");
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Stockage en mémoire, avec option pour simuler des écritures en échec
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stockage dont toutes les écritures échouent
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Pré-remplit une clé (builder)
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable(format!("write to {} rejected", key)));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("wallets").unwrap(), None);

        store.set("wallets", "[1,2]").unwrap();
        assert_eq!(store.get("wallets").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested").join("wallets.json").exists());
        assert!(!dir.path().join("nested").join("wallets.json.tmp").exists());

        store.set("wallets", "[]").unwrap();
        assert_eq!(store.get("wallets").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.dir(), dir.path().join("nested").as_path());
    }

    #[test]
    fn test_file_store_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // Un fichier à la place du répertoire : create_dir_all échoue
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let mut store = FileStore::new(&blocker);
        let err = store.set("k", "v").unwrap_err();
        assert!(matches!(err, PersistenceError::Io { ref key, .. } if key == "k"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new().with_entry("a", "1");
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("b").unwrap(), None);

        let mut failing = MemoryStore::failing();
        assert!(failing.set("a", "1").is_err());
        assert_eq!(failing.get("a").unwrap(), None);
    }
}
