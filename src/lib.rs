// ============================================================================
// MoneyMuffin - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod app;     // Contrôleur : état de l'application
pub mod clock;   // Horloge injectable (date du jour, identifiants)
pub mod config;  // Configuration depuis l'environnement
pub mod error;   // Taxonomie des erreurs
pub mod form;    // Formulaire d'ajout / édition
pub mod ledger;  // Portefeuilles, baselines, devise par défaut
pub mod models;  // Structures de données
pub mod storage; // Persistance clé-valeur
pub mod ui;      // Interface utilisateur
