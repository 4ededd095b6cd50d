// ============================================================================
// Structure : QuoteSnapshot
// ============================================================================
// Résultat transitoire d'un appel au fournisseur de cotations
//
// - current_price et previous_close peuvent manquer (Option)
// - change et change_pct sont dérivés, jamais stockés ni persistés
//
// CONCEPT RUST : Option combinators
// - zip() combine deux Option en Option<(A, B)>
// - filter() rejette la valeur si la condition est fausse
// ============================================================================

/// Prix bruts renvoyés par un fetch
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuoteSnapshot {
    /// Dernier prix connu
    pub current_price: Option<f64>,

    /// Clôture de la séance précédente (base de la variation)
    pub previous_close: Option<f64>,
}

/// Groupe de prix complet, calculé à partir d'un seul snapshot
///
/// Les quatre valeurs viennent toujours du même fetch : on ne met jamais
/// à jour un prix sans sa variation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceFields {
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_pct: f64,
}

impl QuoteSnapshot {
    pub fn new(current_price: Option<f64>, previous_close: Option<f64>) -> Self {
        Self {
            current_price,
            previous_close,
        }
    }

    /// Snapshot complet (utile pour les fournisseurs de test)
    pub fn priced(current_price: f64, previous_close: f64) -> Self {
        Self::new(Some(current_price), Some(previous_close))
    }

    /// Calcule le groupe de prix si les deux champs sont présents
    ///
    /// Une clôture précédente nulle rendrait le pourcentage infini :
    /// elle est traitée comme une donnée manquante.
    pub fn fields(&self) -> Option<PriceFields> {
        let (price, previous_close) = self
            .current_price
            .zip(self.previous_close)
            .filter(|&(_, prev)| prev != 0.0)?;

        let change = price - previous_close;
        let change_pct = change / previous_close * 100.0;

        Some(PriceFields {
            price,
            previous_close,
            change,
            change_pct,
        })
    }
}

// ============================================================================
// Enum : Trend
// ============================================================================
// Signal de couleur transmis à l'affichage
// - Up      : vert
// - Down    : rouge
// - Neutral : blanc (pas de comparaison possible ou prix inchangé)
// ============================================================================

/// Sens d'un mouvement de prix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    /// Compare un nouveau prix au dernier prix affiché pour le même ticker
    pub fn movement(current: f64, last_displayed: Option<f64>) -> Self {
        match last_displayed {
            Some(last) if current > last => Trend::Up,
            Some(last) if current < last => Trend::Down,
            _ => Trend::Neutral,
        }
    }

    /// Signe de la variation journalière (zéro compte comme hausse)
    pub fn of_change(change_pct: f64) -> Self {
        if change_pct >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
