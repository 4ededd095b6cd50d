// ============================================================================
// Module : error
// ============================================================================
// Taxonomie des erreurs du coeur de l'application
//
// Trois familles, jamais fatales pour le processus :
// - ValidationError  : ticker vide ou déjà présent dans la watchlist
// - FetchError       : le fournisseur a échoué ou n'a pas tous les prix
// - PersistenceError : lecture/écriture du fichier watchlist.json
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error + Display
// - #[from] génère les conversions pour l'opérateur ?
// ============================================================================

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::Ticker;

/// Ticker refusé avant tout appel réseau
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("ticker vide")]
    Empty,

    #[error("{0} est déjà dans la watchlist")]
    Duplicate(Ticker),
}

/// Échec de récupération d'une cotation
#[derive(Debug, Error)]
pub enum FetchError {
    /// Erreur réseau ou de décodage côté client HTTP
    #[error("requête HTTP échouée : {0}")]
    Http(#[from] reqwest::Error),

    /// Le serveur a répondu avec un statut non-2xx
    #[error("Yahoo Finance a retourné HTTP {0}")]
    Status(u16),

    /// La réponse ne contient aucun résultat pour ce symbole
    #[error("aucune donnée pour {0}")]
    NoData(String),

    /// Le prix actuel ou la clôture précédente est absent
    #[error("prix incomplet pour {0}")]
    MissingPrice(Ticker),

    /// Erreur renvoyée par un fournisseur autre que HTTP
    #[error("{0}")]
    Provider(String),
}

/// Échec de lecture ou d'écriture du fichier de watchlist
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("accès à {path:?} impossible : {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("contenu JSON invalide dans {path:?} : {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Raison pour laquelle un ajout à la watchlist n'a pas eu lieu
#[derive(Debug, Error)]
pub enum AddError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AddError {
    /// Vrai si l'ajout a été refusé sans appel au fournisseur
    pub fn is_validation(&self) -> bool {
        matches!(self, AddError::Validation(_))
    }
}
