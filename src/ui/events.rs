// ============================================================================
// Gestion des événements
// ============================================================================
// Lit les événements clavier et les traduit en prédicats simples
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Polling avec timeout : la boucle principale reste réactive
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Aucun événement pendant le délai de polling
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    timeout: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Filter sur KeyEventKind
    /// - Sur certains OS, on reçoit Press ET Release
    /// - On ne garde que Press pour éviter les doublons
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.timeout)? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                // Resize, souris, Release : on redessine simplement
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================
// CONCEPT RUST : Pattern matching
// - matches! compare le KeyCode à un ou plusieurs motifs
// - Les touches minuscules sont des commandes, 'X' exige Shift
// ============================================================================

fn key_code(event: &Event) -> Option<KeyCode> {
    match event {
        Event::Key(key) => Some(key.code),
        Event::Tick => None,
    }
}

fn is_char(event: &Event, chars: &[char]) -> bool {
    matches!(key_code(event), Some(KeyCode::Char(c)) if chars.contains(&c))
}

/// 'q' : quitter (deux fois)
pub fn is_quit_event(event: &Event) -> bool {
    is_char(event, &['q', 'Q'])
}

/// Ctrl+C : quitter sans confirmation
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    } else {
        false
    }
}

pub fn is_escape_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Enter))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Up)) || is_char(event, &['k'])
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Down)) || is_char(event, &['j'])
}

pub fn is_left_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Left))
}

pub fn is_right_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Right))
}

/// Tab : champ suivant du formulaire
pub fn is_tab_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Tab))
}

/// Shift+Tab : champ précédent
pub fn is_backtab_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::BackTab))
}

pub fn is_backspace_event(event: &Event) -> bool {
    matches!(key_code(event), Some(KeyCode::Backspace))
}

/// 'a' : nouveau portefeuille
pub fn is_add_event(event: &Event) -> bool {
    is_char(event, &['a', 'A'])
}

/// 'e' : éditer (Entrée aussi, voir main.rs)
pub fn is_edit_event(event: &Event) -> bool {
    is_char(event, &['e', 'E'])
}

/// 'd' : supprimer, avec confirmation
pub fn is_delete_event(event: &Event) -> bool {
    is_char(event, &['d', 'D'])
}

/// 'c' : dupliquer
pub fn is_duplicate_event(event: &Event) -> bool {
    is_char(event, &['c', 'C'])
}

/// 'l' : verrouiller / déverrouiller
pub fn is_lock_event(event: &Event) -> bool {
    is_char(event, &['l', 'L'])
}

/// 'n' : trier par nom
pub fn is_sort_name_event(event: &Event) -> bool {
    is_char(event, &['n', 'N'])
}

/// 's' : trier par montant
pub fn is_sort_amount_event(event: &Event) -> bool {
    is_char(event, &['s', 'S'])
}

/// '$' : choisir la devise affichée
pub fn is_currency_picker_event(event: &Event) -> bool {
    is_char(event, &['$'])
}

/// 'r' : remettre la dérive à zéro
pub fn is_reset_drift_event(event: &Event) -> bool {
    is_char(event, &['r', 'R'])
}

/// 'X' : tout effacer (majuscule seulement)
pub fn is_clear_all_event(event: &Event) -> bool {
    is_char(event, &['X'])
}

/// 'y' : confirmer l'action en attente
pub fn is_confirm_event(event: &Event) -> bool {
    is_char(event, &['y', 'Y'])
}

/// Extrait le caractère d'un événement clavier (saisie dans le formulaire)
pub fn get_char_from_event(event: &Event) -> Option<char> {
    match key_code(event) {
        Some(KeyCode::Char(c)) => Some(c),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
