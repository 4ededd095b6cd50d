// ============================================================================
// Structure : WatchlistStore
// ============================================================================
// Possède la watchlist en mémoire (ordonnée, sans doublon) et la persiste
//
// Règles :
// - un ticker n'entre dans la watchlist qu'après un premier fetch complet
// - le fichier ne contient que les symboles, réécrit en entier à chaque ajout
// - un échec de fetch au refresh laisse les anciens prix affichés
// - aucune suppression de ticker
//
// CONCEPT RUST : Arc<dyn Trait>
// - Le fournisseur est partagé (Arc) et interchangeable (dyn QuoteProvider)
// - Les tests injectent un fournisseur scripté, main injecte Yahoo
// ============================================================================

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::QuoteProvider;
use crate::error::{AddError, FetchError, PersistenceError, ValidationError};
use crate::models::{PriceFields, QuoteSnapshot, Ticker, WatchlistEntry, WatchlistRow};
use crate::storage::WatchlistFile;

/// Résultat d'un ajout réussi
#[derive(Debug)]
pub struct Added {
    /// Ligne à afficher pour le nouveau ticker
    pub row: WatchlistRow,

    /// Erreur d'écriture du fichier (l'entrée reste en mémoire)
    pub persist_error: Option<PersistenceError>,
}

/// Bilan du chargement au démarrage
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Tickers chargés, dans l'ordre du fichier
    pub loaded: Vec<Ticker>,

    /// Tickers dont le fetch a échoué : absents de la watchlist
    pub dropped: Vec<(Ticker, FetchError)>,

    /// Symboles vides ou en double dans le fichier
    pub skipped: usize,

    /// Fichier illisible : la watchlist démarre vide
    pub storage_error: Option<PersistenceError>,
}

/// Bilan d'un cycle de rafraîchissement
#[derive(Debug, Default)]
pub struct RefreshReport {
    /// Lignes mises à jour, dans l'ordre de la watchlist
    pub updated: Vec<WatchlistRow>,

    /// Tickers dont les prix n'ont pas changé faute de données
    pub failed: Vec<(Ticker, FetchError)>,
}

/// Watchlist ordonnée et dédupliquée, persistée par symboles
pub struct WatchlistStore {
    entries: Vec<WatchlistEntry>,
    storage: WatchlistFile,
    provider: Arc<dyn QuoteProvider>,
}

impl WatchlistStore {
    /// Crée une watchlist vide ; appeler load() pour lire le fichier
    pub fn new(storage: WatchlistFile, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            entries: Vec::new(),
            storage,
            provider,
        }
    }

    // ========================================================================
    // Opérations
    // ========================================================================

    /// Ajoute un ticker saisi par l'utilisateur
    ///
    /// Vide ou déjà présent : refusé sans appel réseau.
    /// Fetch en échec ou incomplet : rien n'est ajouté ni écrit.
    /// Succès : ajout en fin de liste puis réécriture complète du fichier.
    pub async fn add(&mut self, symbol: &str) -> Result<Added, AddError> {
        let ticker = self.validate(symbol)?;
        let row = self.insert(ticker).await?;

        let persist_error = self.persist().err();
        if let Some(e) = &persist_error {
            warn!(ticker = %row.ticker, error = %e, "Ticker added but watchlist not saved");
        }

        info!(ticker = %row.ticker, price = row.price, "Ticker added to watchlist");
        Ok(Added { row, persist_error })
    }

    /// Charge la watchlist persistée, en récupérant un prix pour chaque symbole
    ///
    /// Même logique que add() mais sans réécrire le fichier. Un symbole dont
    /// le fetch échoue disparaît de la mémoire, et du fichier au prochain
    /// ajout.
    pub async fn load(&mut self) -> LoadReport {
        self.entries.clear();
        let mut report = LoadReport::default();

        let symbols = match self.storage.read() {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!(error = %e, "Could not read watchlist, starting empty");
                report.storage_error = Some(e);
                return report;
            }
        };

        info!(count = symbols.len(), path = ?self.storage.path(), "Loading watchlist");

        for symbol in symbols {
            let ticker = match self.validate(&symbol) {
                Ok(ticker) => ticker,
                Err(e) => {
                    debug!(symbol = %symbol, reason = %e, "Skipping stored symbol");
                    report.skipped += 1;
                    continue;
                }
            };

            match self.insert(ticker.clone()).await {
                Ok(_) => report.loaded.push(ticker),
                Err(e) => {
                    warn!(ticker = %ticker, error = %e, "Stored ticker could not be fetched, dropping it");
                    report.dropped.push((ticker, e));
                }
            }
        }

        report
    }

    /// Récupère de nouveaux prix pour chaque entrée
    ///
    /// Un échec n'interrompt pas la boucle : l'entrée garde ses derniers
    /// prix et on passe à la suivante.
    pub async fn refresh_all(&mut self) -> RefreshReport {
        let mut report = RefreshReport::default();

        for entry in self.entries.iter_mut() {
            let result = self.provider.fetch_quote(entry.ticker()).await;

            match fields_or_missing(entry.ticker(), result) {
                Ok(fields) => {
                    entry.apply(fields);
                    report.updated.push(entry.row());
                }
                Err(e) => {
                    debug!(ticker = %entry.ticker(), error = %e, "Keeping last known prices");
                    report.failed.push((entry.ticker().clone(), e));
                }
            }
        }

        report
    }

    /// Écrase le fichier avec les symboles courants, dans l'ordre
    pub fn persist(&self) -> Result<(), PersistenceError> {
        self.storage.write(&self.tickers())
    }

    // ========================================================================
    // Lecture
    // ========================================================================

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn tickers(&self) -> Vec<Ticker> {
        self.entries.iter().map(|e| e.ticker().clone()).collect()
    }

    pub fn rows(&self) -> Vec<WatchlistRow> {
        self.entries.iter().map(WatchlistEntry::row).collect()
    }

    pub fn contains(&self, ticker: &Ticker) -> bool {
        self.entries.iter().any(|e| e.ticker() == ticker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Helpers privés
    // ========================================================================

    fn validate(&self, symbol: &str) -> Result<Ticker, ValidationError> {
        let ticker = Ticker::parse(symbol)?;
        if self.contains(&ticker) {
            return Err(ValidationError::Duplicate(ticker));
        }
        Ok(ticker)
    }

    /// Fetch initial puis ajout en fin de liste (sans persistance)
    async fn insert(&mut self, ticker: Ticker) -> Result<WatchlistRow, FetchError> {
        let result = self.provider.fetch_quote(&ticker).await;
        let fields = fields_or_missing(&ticker, result)?;

        let entry = WatchlistEntry::new(ticker, fields);
        let row = entry.row();
        self.entries.push(entry);
        Ok(row)
    }
}

/// Un snapshot incomplet compte comme un échec de fetch
fn fields_or_missing(
    ticker: &Ticker,
    result: Result<QuoteSnapshot, FetchError>,
) -> Result<PriceFields, FetchError> {
    result?
        .fields()
        .ok_or_else(|| FetchError::MissingPrice(ticker.clone()))
}

// ============================================================================
// Tests
// ============================================================================
