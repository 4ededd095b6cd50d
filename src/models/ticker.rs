// ============================================================================
// Structure : Ticker
// ============================================================================
// Représente un symbole boursier normalisé (ex: "AAPL", "BTC-USD")
//
// CONCEPTS RUST :
// 1. Newtype pattern : struct Ticker(String)
//    - Un Ticker ne peut être construit que via parse()
//    - Garantit à la compilation qu'il est non vide et en majuscules
//
// 2. Traits standards :
//    - FromStr : permet "aapl".parse::<Ticker>()
//    - Display : permet format!("{}", ticker)
//    - PartialEq/Eq/Hash : comparaison après normalisation
// ============================================================================

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Symbole boursier normalisé (trimé, en majuscules, non vide)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(String);

impl Ticker {
    /// Normalise une saisie utilisateur en Ticker
    ///
    /// " aapl " -> "AAPL"
    /// ""       -> Err(ValidationError::Empty)
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ValidationError::Empty);
        }
        Ok(Self(symbol))
    }

    /// Le symbole sous forme de &str
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
