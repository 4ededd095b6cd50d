// ============================================================================
// quoteterm - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;           // Fournisseurs de cotations (Yahoo Finance)
pub mod app;           // État de l'interface
pub mod config;        // Paramètres (fichier watchlist, période, logs)
pub mod error;         // Erreurs typées du coeur
pub mod models;        // Structures de données
pub mod quote_display; // Vue Quote : ticker courant et couleurs
pub mod scheduler;     // Rafraîchissement périodique
pub mod sink;          // Sortie vers l'affichage
pub mod storage;       // Fichier watchlist.json
pub mod ui;            // Interface utilisateur
pub mod watchlist;     // Watchlist persistée
pub mod worker;        // Thread propriétaire de l'état métier
