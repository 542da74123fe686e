// ============================================================================
// Structure : App
// ============================================================================
// Contrôleur unique : possède le WalletStore, le BaselineTracker,
// le stockage et tout l'état de l'interface
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Injection : stockage et horloge passés au constructeur (Box<dyn Trait>)
//    au lieu de singletons globaux
// 3. Vues dérivées : totaux, dérive, tri et regroupement sont recalculés
//    à chaque lecture, jamais mis en cache
//
// PATTERN : "Application State"
// - L'UI lit depuis App et appelle ses méthodes, rien d'autre
// - Chaque mutation persiste immédiatement ; un échec d'écriture est
//   journalisé puis ignoré (la mémoire reste la source de vérité)
// ============================================================================

use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::error::{LockedAction, LockedWalletError, WalletError};
use crate::form::WalletForm;
use crate::ledger::{
    group_by_currency, select_default_currency, total_for, BaselineTracker, CurrencyGroup,
    SortConfig, SortKey, WalletStore,
};
use crate::models::{Currency, Wallet, WalletDraft, WalletId};
use crate::storage::{self, KeyValueStore, Snapshot};

// ============================================================================
// Enums d'état de l'interface
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : solde total et liste des portefeuilles
    Dashboard,

    /// Formulaire d'ajout / édition
    WalletForm,

    /// Choix de la devise affichée
    CurrencyPicker,
}

/// Action destructive en attente de confirmation explicite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirmation {
    DeleteWallet(WalletId),
    ClearAll,
    Quit,
}

/// Gravité d'un message affiché à l'utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
}

/// Message affiché à l'utilisateur jusqu'à la prochaine touche
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    wallets: WalletStore,
    baselines: BaselineTracker,
    storage: Box<dyn KeyValueStore>,

    /// Devise du solde affiché
    ///
    /// Recalculée automatiquement après chaque changement de la collection,
    /// ce qui écrase le choix manuel de l'utilisateur.
    pub display_currency: Currency,

    /// Tri courant de la liste
    pub sort: SortConfig,

    /// Index dans visible_wallets()
    pub selected_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Formulaire ouvert (Screen::WalletForm)
    pub form: Option<WalletForm>,

    /// Confirmation attendue
    pub pending: Option<PendingConfirmation>,

    /// Dernier message pour l'utilisateur
    pub notice: Option<Notice>,

    /// Index dans available_currencies() (Screen::CurrencyPicker)
    pub picker_index: usize,
}

impl App {
    /// Crée l'application à partir d'un état déjà chargé
    pub fn new(snapshot: Snapshot, storage: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let display_currency = select_default_currency(&snapshot.wallets);
        Self {
            running: true,
            wallets: WalletStore::new(snapshot.wallets, clock),
            baselines: snapshot.baselines,
            storage,
            display_currency,
            sort: SortConfig::default(),
            selected_index: 0,
            current_screen: Screen::Dashboard,
            form: None,
            pending: None,
            notice: None,
            picker_index: 0,
        }
    }

    /// Réhydrate l'état depuis le stockage puis le réécrit
    ///
    /// Au premier lancement, l'écriture matérialise le jeu par défaut.
    /// Un blob illisible est remplacé par ce même jeu.
    pub fn load(storage: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let snapshot = storage::load(storage.as_ref());
        let mut app = Self::new(snapshot, storage, clock);
        app.persist_wallets();
        app.persist_baselines();
        info!(
            wallets = app.wallets.len(),
            display_currency = %app.display_currency,
            "Application state ready"
        );
        app
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Lectures
    // ========================================================================

    /// Portefeuilles dans l'ordre stocké (plus récent en premier)
    pub fn wallets(&self) -> &[Wallet] {
        self.wallets.wallets()
    }

    pub fn baselines(&self) -> &BaselineTracker {
        &self.baselines
    }

    /// Accès en lecture au stockage (inspection, tests)
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// Total des portefeuilles de la devise affichée
    pub fn total_for_display(&self) -> f64 {
        total_for(self.display_currency, self.wallets())
    }

    /// Dérive du total affiché par rapport à sa baseline
    pub fn balance_difference(&self) -> f64 {
        self.baselines.drift_for(self.display_currency, self.wallets())
    }

    /// Devises utilisées, triées par code
    pub fn available_currencies(&self) -> Vec<Currency> {
        self.wallets.available_currencies()
    }

    /// Le sélecteur de devise n'est utile qu'avec plusieurs devises
    pub fn can_pick_currency(&self) -> bool {
        self.available_currencies().len() > 1
    }

    pub fn sorted_wallets(&self) -> Vec<&Wallet> {
        self.wallets.sorted_view(self.sort.key, self.sort.direction)
    }

    /// Liste triée puis regroupée par devise (ordre du catalogue)
    pub fn grouped_wallets(&self) -> Vec<CurrencyGroup<'_>> {
        group_by_currency(&self.sorted_wallets())
    }

    /// Ordre d'affichage à plat : groupes successifs
    pub fn visible_wallets(&self) -> Vec<&Wallet> {
        self.grouped_wallets()
            .into_iter()
            .flat_map(|group| group.wallets)
            .collect()
    }

    pub fn selected_wallet(&self) -> Option<&Wallet> {
        self.visible_wallets().get(self.selected_index).copied()
    }

    pub fn selected_id(&self) -> Option<WalletId> {
        self.selected_wallet().map(|w| w.id)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// CONCEPT RUST : saturating_sub, pas de panic sur usize
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.wallets.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    fn clamp_selection(&mut self) {
        let max_index = self.wallets.len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max_index);
    }

    /// Place la sélection sur un portefeuille donné (ex: après création)
    fn select_wallet(&mut self, id: WalletId) {
        if let Some(index) = self.visible_wallets().iter().position(|w| w.id == id) {
            self.selected_index = index;
        }
    }

    // ========================================================================
    // Opérations sur les portefeuilles
    // ========================================================================

    /// Crée un portefeuille et retourne son identifiant
    pub fn create_wallet(&mut self, draft: WalletDraft) -> WalletId {
        let id = self.wallets.create(draft).id;
        self.wallets_changed();
        self.select_wallet(id);
        id
    }

    pub fn update_wallet(&mut self, id: WalletId, draft: WalletDraft) -> Result<(), WalletError> {
        match self.wallets.update(id, draft) {
            Ok(_) => {
                self.wallets_changed();
                Ok(())
            }
            Err(e) => Err(self.refuse(e)),
        }
    }

    /// Suppression immédiate ; l'UI passe par request_delete()
    pub fn delete_wallet(&mut self, id: WalletId) -> Result<(), WalletError> {
        match self.wallets.delete(id) {
            Ok(_) => {
                self.wallets_changed();
                Ok(())
            }
            Err(e) => Err(self.refuse(e)),
        }
    }

    pub fn duplicate_wallet(&mut self, id: WalletId) -> Result<WalletId, WalletError> {
        match self.wallets.duplicate(id) {
            Ok(copy) => {
                let copy_id = copy.id;
                self.wallets_changed();
                self.select_wallet(copy_id);
                Ok(copy_id)
            }
            Err(e) => Err(self.refuse(e)),
        }
    }

    /// Retourne le nouvel état du verrou
    pub fn toggle_lock(&mut self, id: WalletId) -> Result<bool, WalletError> {
        match self.wallets.toggle_lock(id) {
            Ok(locked) => {
                self.wallets_changed();
                Ok(locked)
            }
            Err(e) => Err(self.refuse(e)),
        }
    }

    /// Vide portefeuilles et baselines (l'UI passe par request_clear_all())
    pub fn clear_all(&mut self) {
        self.wallets.clear_all();
        self.baselines.clear();
        self.persist_baselines();
        self.wallets_changed();
    }

    /// Remet à zéro la dérive de la devise affichée
    pub fn reset_drift(&mut self) {
        let currency = self.display_currency;
        self.baselines.reset_drift(currency, self.wallets.wallets());
        self.persist_baselines();
    }

    pub fn set_display_currency(&mut self, currency: Currency) {
        info!(%currency, "User selected display currency");
        self.display_currency = currency;
    }

    /// Change le tri (même champ en ascendant → descendant)
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
        debug!(sort = ?self.sort, "Sort changed");
    }

    // ========================================================================
    // Formulaire
    // ========================================================================

    pub fn open_create_form(&mut self) {
        self.form = Some(WalletForm::for_create());
        self.current_screen = Screen::WalletForm;
    }

    /// Ouvre l'édition ; refusé pour un portefeuille verrouillé
    pub fn open_edit_form(&mut self, id: WalletId) -> Result<(), WalletError> {
        let form = match self.wallets.get(id) {
            None => Err(WalletError::NotFound(id)),
            Some(wallet) if wallet.is_locked => Err(locked(id, LockedAction::Edit)),
            Some(wallet) => Ok(WalletForm::for_edit(wallet)),
        };

        match form {
            Ok(form) => {
                self.form = Some(form);
                self.current_screen = Screen::WalletForm;
                Ok(())
            }
            Err(e) => Err(self.refuse(e)),
        }
    }

    /// Valide et enregistre le formulaire
    ///
    /// Erreur de validation : le formulaire reste ouvert avec un message.
    pub fn submit_form(&mut self) -> Result<(), WalletError> {
        let Some((validated, editing)) = self.form.as_ref().map(|f| (f.validate(), f.editing)) else {
            return Ok(());
        };

        let draft = match validated {
            Ok(draft) => draft,
            Err(e) => return Err(self.refuse(e.into())),
        };

        self.close_form();
        match editing {
            Some(id) => self.update_wallet(id, draft),
            None => {
                self.create_wallet(draft);
                Ok(())
            }
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.current_screen = Screen::Dashboard;
    }

    pub fn is_in_form(&self) -> bool {
        self.current_screen == Screen::WalletForm
    }

    // ========================================================================
    // Confirmations
    // ========================================================================

    /// Demande la suppression ; refusé tout de suite si verrouillé
    pub fn request_delete(&mut self, id: WalletId) -> Result<(), WalletError> {
        let check = match self.wallets.get(id) {
            None => Err(WalletError::NotFound(id)),
            Some(wallet) if wallet.is_locked => Err(locked(id, LockedAction::Delete)),
            Some(_) => Ok(()),
        };

        match check {
            Ok(()) => {
                self.pending = Some(PendingConfirmation::DeleteWallet(id));
                Ok(())
            }
            Err(e) => Err(self.refuse(e)),
        }
    }

    /// Demande la remise à zéro complète ; sans effet si rien à effacer
    pub fn request_clear_all(&mut self) -> bool {
        if self.wallets.is_empty() {
            return false;
        }
        self.pending = Some(PendingConfirmation::ClearAll);
        true
    }

    pub fn request_quit(&mut self) {
        self.pending = Some(PendingConfirmation::Quit);
    }

    /// Exécute l'action en attente après réponse affirmative
    pub fn confirm_pending(&mut self) {
        match self.pending.take() {
            Some(PendingConfirmation::DeleteWallet(id)) => {
                info!(wallet_id = id, "User confirmed delete");
                // Un refus a déjà produit un message
                let _ = self.delete_wallet(id);
            }
            Some(PendingConfirmation::ClearAll) => {
                info!("User confirmed clear all");
                self.clear_all();
                self.show_notice(NoticeKind::Info, "All wallets and balance history were deleted.");
            }
            Some(PendingConfirmation::Quit) => {
                info!("User confirmed quit");
                self.quit();
            }
            None => {}
        }
    }

    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(?pending, "Confirmation cancelled");
        }
    }

    pub fn is_awaiting(&self, confirmation: PendingConfirmation) -> bool {
        self.pending == Some(confirmation)
    }

    // ========================================================================
    // Sélecteur de devise
    // ========================================================================

    pub fn open_currency_picker(&mut self) -> bool {
        let currencies = self.available_currencies();
        if currencies.len() <= 1 {
            return false;
        }
        self.picker_index = currencies
            .iter()
            .position(|c| *c == self.display_currency)
            .unwrap_or(0);
        self.current_screen = Screen::CurrencyPicker;
        true
    }

    pub fn picker_up(&mut self) {
        self.picker_index = self.picker_index.saturating_sub(1);
    }

    pub fn picker_down(&mut self) {
        let max_index = self.available_currencies().len().saturating_sub(1);
        self.picker_index = (self.picker_index + 1).min(max_index);
    }

    pub fn picker_select(&mut self) {
        if let Some(currency) = self.available_currencies().get(self.picker_index).copied() {
            self.set_display_currency(currency);
        }
        self.current_screen = Screen::Dashboard;
    }

    pub fn close_picker(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    // ========================================================================
    // Messages
    // ========================================================================

    pub fn show_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
        });
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Transforme une erreur en message bloquant et la retourne
    fn refuse(&mut self, err: WalletError) -> WalletError {
        warn!(error = %err, "Operation refused");
        self.show_notice(NoticeKind::Warning, err.to_string());
        err
    }

    // ========================================================================
    // Réactions aux mutations
    // ========================================================================

    /// Après tout changement de la collection : persistance, devise par défaut
    fn wallets_changed(&mut self) {
        self.persist_wallets();

        let selected = select_default_currency(self.wallets.wallets());
        if selected != self.display_currency {
            debug!(from = %self.display_currency, to = %selected, "Default display currency changed");
        }
        self.display_currency = selected;
        self.clamp_selection();
    }

    fn persist_wallets(&mut self) {
        if let Err(e) = storage::save_wallets(self.storage.as_mut(), self.wallets.wallets()) {
            error!(error = %e, "Could not save wallets");
        }
    }

    fn persist_baselines(&mut self) {
        if let Err(e) = storage::save_baselines(self.storage.as_mut(), &self.baselines) {
            error!(error = %e, "Could not save baseline balances");
        }
    }
}

fn locked(id: WalletId, action: LockedAction) -> WalletError {
    LockedWalletError { id, action }.into()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::ValidationError;
    use crate::models::WalletColor;
    use crate::storage::{MemoryStore, BASELINES_KEY, WALLETS_KEY};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn clock() -> Box<FixedClock> {
        Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(), 10_000))
    }

    fn wallet(id: WalletId, amount: f64, currency: Currency) -> Wallet {
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

    fn app_with(wallets: Vec<Wallet>, baselines: BTreeMap<Currency, f64>) -> App {
        let snapshot = Snapshot {
            wallets,
            baselines: BaselineTracker::from_map(baselines),
        };
        App::new(snapshot, Box::new(MemoryStore::new()), clock())
    }

    fn sample() -> Vec<Wallet> {
        vec![
            wallet(1, 100.0, Currency::RUB),
            wallet(2, -30.0, Currency::RUB),
            wallet(3, 10.0, Currency::USD),
        ]
    }

    fn draft(name: &str, amount: f64, currency: Currency) -> WalletDraft {
        WalletDraft::new(name, amount, currency, WalletColor::Sky).unwrap()
    }

    #[test]
    fn test_total_for_selected_currency() {
        let app = app_with(sample(), BTreeMap::new());
        assert_eq!(app.display_currency, Currency::RUB);
        assert_eq!(app.total_for_display(), 70.0);
    }

    #[test]
    fn test_balance_difference_and_reset() {
        let mut app = app_with(sample(), BTreeMap::from([(Currency::RUB, 50.0)]));
        assert_eq!(app.balance_difference(), 20.0);

        app.reset_drift();
        assert_eq!(app.balance_difference(), 0.0);
        assert_eq!(app.baselines().baseline(Currency::RUB), 70.0);

        let raw = app.storage().get(BASELINES_KEY).unwrap().unwrap();
        assert!(raw.contains("\"RUB\":70"));
    }

    #[test]
    fn test_default_currency_tie_break() {
        let wallets = vec![
            wallet(1, 100.0, Currency::RUB),
            wallet(2, -50.0, Currency::RUB),
            wallet(3, 4.0, Currency::USD),
            wallet(4, -6.0, Currency::USD),
        ];
        let app = app_with(wallets, BTreeMap::new());
        assert_eq!(app.display_currency, Currency::USD);
    }

    #[test]
    fn test_every_change_reselects_display_currency() {
        let mut app = app_with(sample(), BTreeMap::new());
        app.set_display_currency(Currency::USD);
        assert_eq!(app.total_for_display(), 10.0);

        // Même une mutation sans rapport avec les devises réinitialise le choix
        app.toggle_lock(3).unwrap();
        assert_eq!(app.display_currency, Currency::RUB);
    }

    #[test]
    fn test_clear_all_empties_everything() {
        let mut app = app_with(sample(), BTreeMap::from([(Currency::RUB, 50.0)]));
        assert!(app.request_clear_all());
        assert!(app.is_awaiting(PendingConfirmation::ClearAll));
        // Rien n'est effacé avant la confirmation
        assert_eq!(app.wallets().len(), 3);

        app.confirm_pending();
        assert!(app.wallets().is_empty());
        assert!(app.baselines().is_empty());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Info));
        for currency in Currency::ALL {
            assert_eq!(total_for(currency, app.wallets()), 0.0);
        }
        assert_eq!(app.display_currency, Currency::PRIMARY);
        assert_eq!(app.balance_difference(), 0.0);

        assert_eq!(app.storage().get(WALLETS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(app.storage().get(BASELINES_KEY).unwrap().as_deref(), Some("{}"));

        // Plus rien à effacer : pas de nouvelle confirmation
        assert!(!app.request_clear_all());
    }

    #[test]
    fn test_create_persists_and_selects() {
        let mut app = app_with(sample(), BTreeMap::new());
        let id = app.create_wallet(draft("Card", -5.0, Currency::RUB));

        assert_eq!(app.wallets()[0].id, id);
        assert_eq!(app.selected_id(), Some(id));

        let raw = app.storage().get(WALLETS_KEY).unwrap().unwrap();
        let saved: Vec<Wallet> = serde_json::from_str(&raw).unwrap();
        assert_eq!(saved, app.wallets());
    }

    #[test]
    fn test_locked_wallet_is_refused_with_notice() {
        let mut locked = wallet(1, 100.0, Currency::RUB);
        locked.is_locked = true;
        let mut app = app_with(vec![locked], BTreeMap::new());

        let err = app.open_edit_form(1).unwrap_err();
        assert_eq!(err, WalletError::Locked(LockedWalletError { id: 1, action: LockedAction::Edit }));
        assert!(app.form.is_none());
        assert_eq!(app.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Warning));

        app.dismiss_notice();
        assert!(app.request_delete(1).is_err());
        assert!(app.pending.is_none());
        assert!(app.notice.is_some());

        assert!(app.duplicate_wallet(1).is_err());
        assert_eq!(app.wallets().len(), 1);

        // Le verrou lui-même reste toujours modifiable
        assert_eq!(app.toggle_lock(1), Ok(false));
        assert!(app.request_delete(1).is_ok());
        app.confirm_pending();
        assert!(app.wallets().is_empty());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app_with(sample(), BTreeMap::new());
        app.request_delete(2).unwrap();
        app.cancel_pending();
        assert_eq!(app.wallets().len(), 3);

        app.request_delete(2).unwrap();
        app.confirm_pending();
        assert_eq!(app.wallets().len(), 2);
        assert!(app.wallets().iter().all(|w| w.id != 2));
    }

    #[test]
    fn test_form_submit_create_and_edit() {
        let mut app = app_with(sample(), BTreeMap::new());

        app.open_create_form();
        assert!(app.is_in_form());
        assert_eq!(app.submit_form(), Err(WalletError::Validation(ValidationError::EmptyName)));
        assert!(app.is_in_form());

        if let Some(form) = app.form.as_mut() {
            form.name = "Broker".to_string();
            form.amount = "not a number".to_string();
        }
        app.submit_form().unwrap();
        assert!(!app.is_in_form());
        assert_eq!(app.wallets()[0].name, "Broker");
        assert_eq!(app.wallets()[0].amount, 0.0);

        app.open_edit_form(1).unwrap();
        if let Some(form) = app.form.as_mut() {
            form.amount = "250".to_string();
        }
        app.submit_form().unwrap();
        let edited = app.wallets().iter().find(|w| w.id == 1).unwrap();
        assert_eq!(edited.amount, 250.0);
        assert_eq!(edited.last_updated, NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
    }

    #[test]
    fn test_visible_order_groups_then_sorts() {
        let app = app_with(sample(), BTreeMap::new());
        // Tri par défaut : montant décroissant, groupes RUB puis USD
        let ids: Vec<WalletId> = app.visible_wallets().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let mut app = app;
        app.toggle_sort(SortKey::Amount);
        let ids: Vec<WalletId> = app.visible_wallets().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_currency_picker() {
        let mut app = app_with(sample(), BTreeMap::new());
        assert!(app.open_currency_picker());
        assert_eq!(app.current_screen, Screen::CurrencyPicker);

        // Devises triées par code : RUB, USD
        app.picker_down();
        app.picker_select();
        assert_eq!(app.display_currency, Currency::USD);
        assert_eq!(app.current_screen, Screen::Dashboard);

        let mut single = app_with(vec![wallet(1, 1.0, Currency::EUR)], BTreeMap::new());
        assert!(!single.open_currency_picker());
    }

    #[test]
    fn test_persistence_failure_does_not_break_mutations() {
        let snapshot = Snapshot {
            wallets: sample(),
            baselines: BaselineTracker::new(),
        };
        let mut app = App::new(snapshot, Box::new(MemoryStore::failing()), clock());

        let id = app.create_wallet(draft("Cash", 1.0, Currency::RUB));
        app.reset_drift();
        assert_eq!(app.wallets()[0].id, id);
        assert_eq!(app.balance_difference(), 0.0);
        assert_eq!(app.storage().get(WALLETS_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_from_malformed_storage() {
        let store = MemoryStore::new().with_entry(WALLETS_KEY, "{{{");
        let app = App::load(Box::new(store), clock());

        assert_eq!(app.wallets(), Snapshot::defaults().wallets.as_slice());
        assert_eq!(app.balance_difference(), 0.0);
        // Le blob illisible a été remplacé par le jeu par défaut
        let raw = app.storage().get(WALLETS_KEY).unwrap().unwrap();
        assert!(serde_json::from_str::<Vec<Wallet>>(&raw).is_ok());
    }

    #[test]
    fn test_quit_two_step() {
        let mut app = app_with(Vec::new(), BTreeMap::new());
        app.request_quit();
        assert!(app.is_running());
        app.confirm_pending();
        assert!(!app.is_running());
    }
}
