// ============================================================================
// Structure : WatchlistEntry
// ============================================================================
// Un ticker suivi dans la watchlist avec ses derniers prix connus
//
// CONCEPTS RUST :
// 1. Encapsulation : les champs de prix sont privés
//    - On ne peut les modifier qu'en bloc via apply()
//    - Impossible d'avoir un prix sans la variation correspondante
// 2. Copy : WatchlistRow est petit, on le passe par valeur
// ============================================================================

use crate::models::{PriceFields, Ticker};

/// Entrée de watchlist : ticker + derniers prix récupérés avec succès
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistEntry {
    ticker: Ticker,
    price: f64,
    change: f64,
    change_pct: f64,
}

impl WatchlistEntry {
    /// Crée une entrée à partir du premier fetch réussi
    pub fn new(ticker: Ticker, fields: PriceFields) -> Self {
        Self {
            ticker,
            price: fields.price,
            change: fields.change,
            change_pct: fields.change_pct,
        }
    }

    /// Remplace atomiquement prix, variation et pourcentage
    pub fn apply(&mut self, fields: PriceFields) {
        self.price = fields.price;
        self.change = fields.change;
        self.change_pct = fields.change_pct;
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn change(&self) -> f64 {
        self.change
    }

    pub fn change_pct(&self) -> f64 {
        self.change_pct
    }

    /// Mise à jour de ligne envoyée à la vue watchlist
    pub fn row(&self) -> WatchlistRow {
        WatchlistRow {
            ticker: self.ticker.clone(),
            price: self.price,
            change: self.change,
            change_pct: self.change_pct,
        }
    }
}

/// Ligne de la vue watchlist : {ticker, price, change, change_pct}
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistRow {
    pub ticker: Ticker,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl WatchlistRow {
    /// Prix formaté : "$271.49"
    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }

    /// Variation formatée avec flèche : "▲ +2.11"
    pub fn change_label(&self) -> String {
        let arrow = if self.is_positive() { "▲" } else { "▼" };
        format!("{} {:+.2}", arrow, self.change)
    }

    /// Pourcentage formaté : "+0.78%"
    pub fn change_pct_label(&self) -> String {
        format!("{:+.2}%", self.change_pct)
    }

    /// Retourne true si le ticker est en hausse sur la journée
    pub fn is_positive(&self) -> bool {
        self.change_pct >= 0.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteSnapshot;

    fn entry(price: f64, prev: f64) -> WatchlistEntry {
        let fields = QuoteSnapshot::priced(price, prev).fields().unwrap();
        WatchlistEntry::new(Ticker::parse("AAPL").unwrap(), fields)
    }

    #[test]
    fn test_apply_replaces_all_price_fields() {
        let mut item = entry(100.0, 100.0);
        assert_eq!(item.change(), 0.0);

        item.apply(QuoteSnapshot::priced(110.0, 100.0).fields().unwrap());

        assert_eq!(item.price(), 110.0);
        assert!((item.change() - 10.0).abs() < 1e-9);
        assert!((item.change_pct() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_row_labels() {
        let row = entry(98.5, 100.0).row();
        assert_eq!(row.ticker.as_str(), "AAPL");
        assert_eq!(row.price_label(), "$98.50");
        assert_eq!(row.change_label(), "▼ -1.50");
        assert_eq!(row.change_pct_label(), "-1.50%");
        assert!(!row.is_positive());
    }
}
