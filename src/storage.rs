// ============================================================================
// Module : storage
// ============================================================================
// Persistance de la watchlist dans un fichier JSON
//
// Format : un simple tableau de symboles, jamais de prix
//   ["AAPL", "MSFT", "BTC-USD"]
//
// Chaque écriture remplace tout le contenu du fichier (pas d'ajout).
// L'écriture passe par un fichier temporaire voisin puis un rename : un
// crash en cours d'écriture laisse l'ancien fichier intact.
// ============================================================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PersistenceError;
use crate::models::Ticker;

/// Fichier de watchlist sur disque
#[derive(Debug, Clone)]
pub struct WatchlistFile {
    path: PathBuf,
}

impl WatchlistFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// watchlist.json -> watchlist.json.tmp, dans le même répertoire
    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Lit la liste de symboles persistée
    ///
    /// Un fichier absent n'est pas une erreur : c'est une watchlist vide.
    /// Les symboles sont renvoyés bruts, la validation est faite par l'appelant.
    pub fn read(&self) -> Result<Vec<String>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "No watchlist file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| PersistenceError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Écrase le fichier avec la liste complète des tickers, dans l'ordre
    pub fn write(&self, tickers: &[Ticker]) -> Result<(), PersistenceError> {
        let symbols: Vec<&str> = tickers.iter().map(Ticker::as_str).collect();

        let json = serde_json::to_string(&symbols).map_err(|source| PersistenceError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|source| PersistenceError::Io {
            path: tmp_path.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistenceError::Io {
                path: self.path.clone(),
                source,
            });
        }

        debug!(path = ?self.path, count = symbols.len(), "Watchlist written");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tickers(symbols: &[&str]) -> Vec<Ticker> {
        symbols.iter().map(|s| Ticker::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = WatchlistFile::new(dir.path().join("watchlist.json"));
        assert!(file.read().unwrap().is_empty());
    }

    #[test]
    fn test_write_overwrites_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = WatchlistFile::new(dir.path().join("watchlist.json"));

        file.write(&tickers(&["AAPL", "MSFT", "TSLA"])).unwrap();
        file.write(&tickers(&["AAPL", "GOOG"])).unwrap();

        assert_eq!(file.read().unwrap(), vec!["AAPL", "GOOG"]);
        let raw = fs::read_to_string(file.path()).unwrap();
        assert_eq!(raw, r#"["AAPL","GOOG"]"#);
    }

    #[test]
    fn test_write_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        let file = WatchlistFile::new(&path);

        // Reste d'une écriture interrompue
        fs::write(dir.path().join("watchlist.json.tmp"), "[\"AA").unwrap();
        file.write(&tickers(&["AAPL"])).unwrap();

        assert_eq!(file.read().unwrap(), vec!["AAPL"]);
        assert!(!dir.path().join("watchlist.json.tmp").exists());
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["watchlist.json"]);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        let file = WatchlistFile::new(&path);
        file.write(&tickers(&["AAPL", "MSFT"])).unwrap();

        // Un répertoire occupe le nom du fichier temporaire : l'écriture échoue
        fs::create_dir(dir.path().join("watchlist.json.tmp")).unwrap();
        assert!(file.write(&tickers(&["TSLA"])).is_err());

        assert_eq!(file.read().unwrap(), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_corrupt_file_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.json");
        fs::write(&path, "{not json").unwrap();

        let err = WatchlistFile::new(path).read().unwrap_err();
        assert!(matches!(err, PersistenceError::Json { .. }));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = WatchlistFile::new(dir.path().join("nope").join("watchlist.json"));

        let err = file.write(&tickers(&["AAPL"])).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
