// ============================================================================
// Horloge injectable
// ============================================================================
// Fournit la date du jour (lastUpdated) et l'instant courant (identifiants)
//
// CONCEPT RUST : Trait object
// - Box<dyn Clock> permet d'injecter SystemClock en production
//   et FixedClock dans les tests, sans générique partout
// ============================================================================

use std::cell::Cell;

use chrono::{Local, NaiveDate, Utc};

/// Source de temps pour le store
pub trait Clock {
    /// Date calendaire locale du jour
    fn today(&self) -> NaiveDate;

    /// Instant courant en millisecondes Unix
    fn now_millis(&self) -> u64;
}

/// Horloge système
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now_millis(&self) -> u64 {
        // Avant 1970 : on retombe sur 0, le store garantit l'unicité des identifiants
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Horloge figée pour les tests
///
/// L'instant avance d'une milliseconde à chaque lecture, sauf si `frozen`.
#[derive(Debug)]
pub struct FixedClock {
    date: NaiveDate,
    millis: Cell<u64>,
    frozen: bool,
}

impl FixedClock {
    pub fn new(date: NaiveDate, millis: u64) -> Self {
        Self {
            date,
            millis: Cell::new(millis),
            frozen: false,
        }
    }

    /// Horloge dont l'instant ne bouge jamais (collisions d'identifiants)
    pub fn frozen(date: NaiveDate, millis: u64) -> Self {
        Self {
            frozen: true,
            ..Self::new(date, millis)
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now_millis(&self) -> u64 {
        let now = self.millis.get();
        if !self.frozen {
            self.millis.set(now + 1);
        }
        now
    }
}
