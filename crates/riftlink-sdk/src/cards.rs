//! Card lookup for choosing a battlefield image.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Type tag carried by battlefield cards.
pub const BATTLEFIELD_TYPE: &str = "Battlefield";

/// One search result from a card service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSummary {
    pub name: String,
    #[serde(alias = "type")]
    pub type_tag: String,
    #[serde(alias = "image")]
    pub image_ref: String,
}

impl CardSummary {
    pub fn new(
        name: impl Into<String>,
        type_tag: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            image_ref: image_ref.into(),
        }
    }

    pub fn is_battlefield(&self) -> bool {
        self.type_tag.eq_ignore_ascii_case(BATTLEFIELD_TYPE)
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LookupError {
    #[error("Card service unavailable: {0}")]
    Unavailable(String),
    #[error("Unreadable card service response: {0}")]
    BadResponse(String),
}

/// Something that can search cards by name.
#[async_trait]
pub trait CardLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Vec<CardSummary>, LookupError>;
}

/// Run a lookup, treating any failure as "no results".
pub async fn lookup_best_effort<L: CardLookup + ?Sized>(
    lookup: &L,
    query: &str,
) -> Vec<CardSummary> {
    match lookup.lookup(query).await {
        Ok(cards) => cards,
        Err(e) => {
            warn!(%query, error = %e, "Card lookup failed");
            Vec::new()
        }
    }
}

/// Parse a card service response body (a JSON array of cards).
pub fn parse_lookup_response(body: &str) -> Result<Vec<CardSummary>, LookupError> {
    serde_json::from_str(body).map_err(|e| LookupError::BadResponse(e.to_string()))
}

/// In-memory card list.
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: Vec<CardSummary>,
}

impl CardCatalog {
    pub fn new(cards: Vec<CardSummary>) -> Self {
        Self { cards }
    }

    /// A handful of battlefields, enough for demos and tests.
    pub fn sample() -> Self {
        Self::new(vec![
            CardSummary::new(
                "Grove of the God-Willow",
                BATTLEFIELD_TYPE,
                "https://cards.riftlink.dev/battlefields/grove-of-the-god-willow.png",
            ),
            CardSummary::new(
                "Monastery of Hirana",
                BATTLEFIELD_TYPE,
                "https://cards.riftlink.dev/battlefields/monastery-of-hirana.png",
            ),
            CardSummary::new(
                "The Grand Plaza",
                BATTLEFIELD_TYPE,
                "https://cards.riftlink.dev/battlefields/the-grand-plaza.png",
            ),
            CardSummary::new(
                "Void Gate",
                BATTLEFIELD_TYPE,
                "https://cards.riftlink.dev/battlefields/void-gate.png",
            ),
            CardSummary::new(
                "Jinx, Rebel",
                "Champion",
                "https://cards.riftlink.dev/champions/jinx-rebel.png",
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Case-insensitive substring match on the name.
    pub fn search(&self, query: &str, type_tag: Option<&str>) -> Vec<CardSummary> {
        let needle = query.trim().to_lowercase();
        self.cards
            .iter()
            .filter(|card| card.name.to_lowercase().contains(&needle))
            .filter(|card| type_tag.map_or(true, |tag| card.type_tag.eq_ignore_ascii_case(tag)))
            .cloned()
            .collect()
    }

    pub fn battlefields(&self, query: &str) -> Vec<CardSummary> {
        self.search(query, Some(BATTLEFIELD_TYPE))
    }
}

#[async_trait]
impl CardLookup for CardCatalog {
    async fn lookup(&self, query: &str) -> Result<Vec<CardSummary>, LookupError> {
        Ok(self.search(query, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    #[async_trait]
    impl CardLookup for Offline {
        async fn lookup(&self, _query: &str) -> Result<Vec<CardSummary>, LookupError> {
            Err(LookupError::Unavailable("connection refused".into()))
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = CardCatalog::sample();
        let found = catalog.search("GROVE", None);
        assert_eq!(found.len(), 1);
        assert!(found[0].is_battlefield());
    }

    #[test]
    fn test_battlefield_filter() {
        let catalog = CardCatalog::sample();
        assert!(catalog.battlefields("jinx").is_empty());
        assert_eq!(catalog.battlefields("").len(), 4);
    }

    #[test]
    fn test_parse_response_aliases() {
        let cards =
            parse_lookup_response(r#"[{"name":"Void Gate","type":"Battlefield","image":"v.png"}]"#)
                .unwrap();
        assert_eq!(cards[0], CardSummary::new("Void Gate", "Battlefield", "v.png"));

        assert!(matches!(
            parse_lookup_response("<html>"),
            Err(LookupError::BadResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        assert!(lookup_best_effort(&Offline, "void").await.is_empty());
        assert_eq!(
            lookup_best_effort(&CardCatalog::sample(), "plaza").await.len(),
            1
        );
    }
}
