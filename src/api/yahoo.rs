// ============================================================================
// API Client : Yahoo Finance
// ============================================================================
// Récupère le prix actuel et la clôture précédente d'un ticker
//
// CONCEPTS RUST :
// 1. async/await : l'appel HTTP ne bloque pas le runtime tokio
// 2. Result<T, FetchError> : erreurs typées, propagées avec ?
// 3. Serde : désérialisation JSON automatique
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::api::QuoteProvider;
use crate::error::FetchError;
use crate::models::{QuoteSnapshot, Ticker};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

// Yahoo bloque les clients sans User-Agent de navigateur
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// On ne garde que la partie "meta" du endpoint chart : elle contient
// le prix courant et les clôtures précédentes.
// ============================================================================

/// Réponse complète de l'API Yahoo Finance
#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    /// null quand le symbole est inconnu
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
}

/// Métadonnées du ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")] // "regularMarketPrice" -> regular_market_price
struct Meta {
    regular_market_price: Option<f64>,
    previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
}

impl Meta {
    /// previousClose n'est pas toujours fourni, chartPreviousClose sert de repli
    fn into_snapshot(self) -> QuoteSnapshot {
        QuoteSnapshot::new(
            self.regular_market_price,
            self.previous_close.or(self.chart_previous_close),
        )
    }
}

// ============================================================================
// YahooProvider
// ============================================================================

/// Fournisseur de cotations basé sur Yahoo Finance
///
/// Le client HTTP est créé une seule fois et réutilisé pour chaque fetch
/// (pool de connexions partagé).
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    /// Crée le client avec un timeout par requête
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Construit l'URL du endpoint chart pour un symbole
    fn quote_url(&self, ticker: &Ticker) -> String {
        format!("{}/{}?interval=1d&range=1d", self.base_url, ticker)
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    /// CONCEPT RUST : #[instrument]
    /// - Ajoute un span avec le ticker à tous les logs de la fonction
    #[instrument(skip(self, ticker), fields(ticker = %ticker))]
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<QuoteSnapshot, FetchError> {
        let url = self.quote_url(ticker);
        debug!(url = %url, "Sending HTTP request to Yahoo Finance");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Yahoo Finance returned error status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: YahooResponse = response.json().await?;
        let snapshot = parse_yahoo_response(body, ticker)?;

        debug!(
            price = ?snapshot.current_price,
            previous_close = ?snapshot.previous_close,
            "Fetched quote"
        );
        Ok(snapshot)
    }
}

/// Extrait le snapshot du premier résultat de la réponse
fn parse_yahoo_response(
    yahoo_response: YahooResponse,
    ticker: &Ticker,
) -> Result<QuoteSnapshot, FetchError> {
    yahoo_response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.meta.into_snapshot())
        .ok_or_else(|| FetchError::NoData(ticker.to_string()))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<QuoteSnapshot, FetchError> {
        let body: YahooResponse = serde_json::from_str(json).unwrap();
        parse_yahoo_response(body, &Ticker::parse("AAPL").unwrap())
    }

    #[test]
    fn test_quote_url() {
        let provider = YahooProvider::new(Duration::from_secs(5)).unwrap();
        let url = provider.quote_url(&Ticker::parse("aapl").unwrap());
        assert!(url.contains("yahoo.com"));
        assert!(url.contains("/AAPL?"));
        assert!(url.contains("range=1d"));
    }

    #[test]
    fn test_parse_meta_prices() {
        let snapshot = parse(
            r#"{"chart":{"result":[{"meta":{
                "symbol":"AAPL",
                "regularMarketPrice":271.49,
                "previousClose":268.0,
                "chartPreviousClose":250.0
            }}],"error":null}}"#,
        )
        .unwrap();

        assert_eq!(snapshot.current_price, Some(271.49));
        assert_eq!(snapshot.previous_close, Some(268.0));
    }

    #[test]
    fn test_parse_falls_back_to_chart_previous_close() {
        let snapshot = parse(
            r#"{"chart":{"result":[{"meta":{
                "regularMarketPrice":10.0,
                "chartPreviousClose":9.5
            }}]}}"#,
        )
        .unwrap();

        assert_eq!(snapshot.previous_close, Some(9.5));
    }

    #[test]
    fn test_parse_missing_price_is_kept_as_none() {
        let snapshot = parse(r#"{"chart":{"result":[{"meta":{"previousClose":9.5}}]}}"#).unwrap();
        assert_eq!(snapshot.current_price, None);
        assert!(snapshot.fields().is_none());
    }

    #[test]
    fn test_parse_null_result_is_no_data() {
        let err = parse(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#).unwrap_err();
        assert!(matches!(err, FetchError::NoData(symbol) if symbol == "AAPL"));
    }
}
