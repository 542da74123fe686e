// ============================================================================
// Structure : WalletStore
// ============================================================================
// Collection ordonnée des portefeuilles (plus récent en premier)
//
// CONCEPTS RUST :
// 1. Encapsulation : le Vec est privé, toute mutation passe par les méthodes
// 2. Result<T, WalletError> : un portefeuille verrouillé refuse la mutation
//    et la collection reste intacte
// 3. Vues empruntées : sorted_view() retourne Vec<&Wallet>, aucune copie
//    et l'ordre stocké n'est jamais modifié
// ============================================================================

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{info, trace, warn};

use crate::clock::Clock;
use crate::error::{LockedAction, LockedWalletError, WalletError};
use crate::models::{Currency, Wallet, WalletDraft, WalletId};

/// Suffixe ajouté au nom d'une copie
pub const COPY_SUFFIX: &str = " - copy";

// ============================================================================
// Tri
// ============================================================================

/// Champ de tri
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Amount,
}

/// Sens du tri
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Configuration de tri courante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortConfig {
    /// Nouvelle configuration après un clic sur `key`
    ///
    /// CONCEPT : Toggle
    /// - Même champ déjà en ascendant → descendant
    /// - Sinon → ce champ en ascendant
    pub fn toggled(self, key: SortKey) -> Self {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        Self { key, direction }
    }

    /// Indicateur d'affichage pour un champ ("▲", "▼" ou rien)
    pub fn indicator(&self, key: SortKey) -> &'static str {
        match (self.key == key, self.direction) {
            (false, _) => "",
            (true, SortDirection::Ascending) => "▲",
            (true, SortDirection::Descending) => "▼",
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            key: SortKey::Amount,
            direction: SortDirection::Descending,
        }
    }
}

/// Groupe de portefeuilles d'une même devise
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyGroup<'a> {
    pub currency: Currency,
    pub wallets: Vec<&'a Wallet>,
}

// ============================================================================
// WalletStore
// ============================================================================

/// Collection des portefeuilles, propriété exclusive du contrôleur
pub struct WalletStore {
    wallets: Vec<Wallet>,
    clock: Box<dyn Clock>,

    /// Plus grand identifiant jamais émis ou chargé
    last_id: WalletId,
}

impl WalletStore {
    /// Crée un store à partir d'une collection déjà chargée
    pub fn new(wallets: Vec<Wallet>, clock: Box<dyn Clock>) -> Self {
        let last_id = wallets.iter().map(|w| w.id).max().unwrap_or(0);
        Self {
            wallets,
            clock,
            last_id,
        }
    }

    /// Portefeuilles dans l'ordre stocké
    pub fn wallets(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn get(&self, id: WalletId) -> Option<&Wallet> {
        self.wallets.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Génère un identifiant strictement supérieur à tous les précédents
    ///
    /// CONCEPT : Horodatage + monotonie
    /// - On part de l'instant courant en millisecondes
    /// - Deux créations dans la même milliseconde → last_id + 1
    /// - Plus de successeur (last_id == u64::MAX) → plus petit id libre
    fn next_id(&mut self) -> WalletId {
        match self.last_id.checked_add(1) {
            Some(successor) => {
                let id = self.clock.now_millis().max(successor);
                self.last_id = id;
                id
            }
            None => {
                let id = self.lowest_free_id();
                warn!(wallet_id = id, "Id space exhausted, reusing lowest free id");
                id
            }
        }
    }

    fn lowest_free_id(&self) -> WalletId {
        let used: HashSet<WalletId> = self.wallets.iter().map(|w| w.id).collect();
        (1..=WalletId::MAX).find(|id| !used.contains(id)).unwrap_or(0)
    }

    fn position(&self, id: WalletId) -> Result<usize, WalletError> {
        self.wallets
            .iter()
            .position(|w| w.id == id)
            .ok_or(WalletError::NotFound(id))
    }

    /// Position d'un portefeuille déverrouillé, sinon LockedWalletError
    fn unlocked_position(&self, id: WalletId, action: LockedAction) -> Result<usize, WalletError> {
        let index = self.position(id)?;
        if self.wallets[index].is_locked {
            warn!(wallet_id = id, %action, "Refused change on locked wallet");
            return Err(LockedWalletError { id, action }.into());
        }
        Ok(index)
    }

    /// Ajoute un portefeuille en tête de liste
    pub fn create(&mut self, draft: WalletDraft) -> &Wallet {
        let wallet = Wallet {
            id: self.next_id(),
            name: draft.name,
            amount: draft.amount,
            currency: draft.currency,
            last_updated: self.clock.today(),
            color: draft.color,
            is_locked: false,
        };

        info!(wallet_id = wallet.id, currency = %wallet.currency, "Created wallet");
        self.wallets.insert(0, wallet);
        &self.wallets[0]
    }

    /// Remplace nom, montant, devise et couleur ; rafraîchit la date
    pub fn update(&mut self, id: WalletId, draft: WalletDraft) -> Result<&Wallet, WalletError> {
        let index = self.unlocked_position(id, LockedAction::Edit)?;
        let today = self.clock.today();

        let wallet = &mut self.wallets[index];
        wallet.name = draft.name;
        wallet.amount = draft.amount;
        wallet.currency = draft.currency;
        wallet.color = draft.color;
        wallet.last_updated = today;

        info!(wallet_id = id, "Updated wallet");
        Ok(&self.wallets[index])
    }

    /// Supprime un portefeuille (la confirmation est du ressort de l'appelant)
    pub fn delete(&mut self, id: WalletId) -> Result<Wallet, WalletError> {
        let index = self.unlocked_position(id, LockedAction::Delete)?;
        let removed = self.wallets.remove(index);
        info!(wallet_id = id, "Deleted wallet");
        Ok(removed)
    }

    /// Copie un portefeuille en tête de liste, déverrouillée, avec un nouvel id
    pub fn duplicate(&mut self, id: WalletId) -> Result<&Wallet, WalletError> {
        let index = self.unlocked_position(id, LockedAction::Duplicate)?;
        let source = self.wallets[index].clone();

        let copy = Wallet {
            id: self.next_id(),
            name: format!("{}{}", source.name, COPY_SUFFIX),
            is_locked: false,
            ..source
        };

        info!(source_id = id, wallet_id = copy.id, "Duplicated wallet");
        self.wallets.insert(0, copy);
        Ok(&self.wallets[0])
    }

    /// Inverse le verrou ; toujours permis, ne touche à rien d'autre
    ///
    /// Retourne le nouvel état du verrou.
    pub fn toggle_lock(&mut self, id: WalletId) -> Result<bool, WalletError> {
        let index = self.position(id)?;
        let wallet = &mut self.wallets[index];
        wallet.is_locked = !wallet.is_locked;
        info!(wallet_id = id, locked = wallet.is_locked, "Toggled wallet lock");
        Ok(wallet.is_locked)
    }

    /// Vide la collection sans condition
    pub fn clear_all(&mut self) {
        info!(count = self.wallets.len(), "Cleared all wallets");
        self.wallets.clear();
    }

    /// Vue triée, stable, sans modifier l'ordre stocké
    ///
    /// CONCEPT RUST : sort_by est stable
    /// - Les égalités gardent l'ordre d'origine
    /// - Le sens descendant inverse le comparateur, pas la liste,
    ///   pour préserver cette stabilité
    pub fn sorted_view(&self, key: SortKey, direction: SortDirection) -> Vec<&Wallet> {
        let mut view: Vec<&Wallet> = self.wallets.iter().collect();
        view.sort_by(|a, b| {
            let ordering = match key {
                SortKey::Name => a.name.cmp(&b.name),
                SortKey::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
            };
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        trace!(?key, ?direction, count = view.len(), "Computed sorted view");
        view
    }

    /// Devises utilisées, triées par code
    pub fn available_currencies(&self) -> Vec<Currency> {
        let mut currencies: Vec<Currency> = Vec::new();
        for wallet in &self.wallets {
            if !currencies.contains(&wallet.currency) {
                currencies.push(wallet.currency);
            }
        }
        currencies.sort_by_key(|c| c.code());
        currencies
    }
}

/// Regroupe une séquence par devise
///
/// Les groupes suivent l'ordre du catalogue (seulement les devises présentes),
/// chaque groupe garde l'ordre relatif de la séquence.
pub fn group_by_currency<'a>(sequence: &[&'a Wallet]) -> Vec<CurrencyGroup<'a>> {
    Currency::ALL
        .into_iter()
        .filter_map(|currency| {
            let wallets: Vec<&Wallet> = sequence
                .iter()
                .copied()
                .filter(|w| w.currency == currency)
                .collect();

            if wallets.is_empty() {
                None
            } else {
                Some(CurrencyGroup { currency, wallets })
            }
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
