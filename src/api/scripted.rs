//! Fournisseur scripté utilisé par les tests unitaires.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::QuoteProvider;
use crate::error::FetchError;
use crate::models::{QuoteSnapshot, Ticker};

/// Réponse préparée pour un symbole
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Quote(QuoteSnapshot),
    Fail(String),
}

#[derive(Default)]
struct Script {
    pending: VecDeque<Scripted>,
    last: Option<Scripted>,
}

/// Renvoie les réponses dans l'ordre ; la dernière consommée est rejouée
/// quand la file est vide. Un symbole sans script échoue.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    responses: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Ajoute un prix complet à la file du symbole
    pub(crate) fn price(self, symbol: &str, price: f64, previous_close: f64) -> Self {
        self.push(symbol, Scripted::Quote(QuoteSnapshot::priced(price, previous_close)));
        self
    }

    /// Ajoute un snapshot arbitraire (champs manquants possibles)
    pub(crate) fn snapshot(self, symbol: &str, snapshot: QuoteSnapshot) -> Self {
        self.push(symbol, Scripted::Quote(snapshot));
        self
    }

    /// Ajoute une erreur à la file du symbole
    pub(crate) fn fail(self, symbol: &str) -> Self {
        self.push(symbol, Scripted::Fail(format!("no quote for {}", symbol)));
        self
    }

    /// Variante &self, pour changer le script d'un provider déjà partagé
    pub(crate) fn push(&self, symbol: &str, response: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_default()
            .pending
            .push_back(response);
    }

    /// Symboles demandés, dans l'ordre des appels
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for ScriptedProvider {
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<QuoteSnapshot, FetchError> {
        self.calls.lock().unwrap().push(ticker.to_string());

        let mut responses = self.responses.lock().unwrap();
        let script = responses
            .get_mut(ticker.as_str())
            .ok_or_else(|| FetchError::Provider(format!("unknown symbol {}", ticker)))?;

        if let Some(next) = script.pending.pop_front() {
            script.last = Some(next);
        }
        let response = script.last.clone();

        match response {
            Some(Scripted::Quote(snapshot)) => Ok(snapshot),
            Some(Scripted::Fail(message)) => Err(FetchError::Provider(message)),
            None => Err(FetchError::NoData(ticker.to_string())),
        }
    }
}
