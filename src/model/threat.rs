use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One step of a mob bonus table: at least `min_living` living members grant
/// `bonus` extra dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusBracket {
    pub min_living: usize,
    pub bonus: u32,
}

/// Living-member count to bonus dice, saturating at `max`.
///
/// Bracket order in the data does not matter: the best bracket reached wins,
/// so the function is monotonic for any table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusTable {
    #[serde(default)]
    pub brackets: Vec<BonusBracket>,
    #[serde(default)]
    pub max: u32,
}

impl BonusTable {
    pub fn new(brackets: Vec<BonusBracket>, max: u32) -> Self {
        Self { brackets, max }
    }

    /// Returns `(bonus, max)` for the given number of living members.
    pub fn lookup(&self, living: usize) -> (u32, u32) {
        let bonus = self
            .brackets
            .iter()
            .filter(|b| b.min_living <= living)
            .map(|b| b.bonus)
            .max()
            .unwrap_or(0);

        (bonus.min(self.max), self.max)
    }
}

/// Static stat block for a threat, as far as the encounter engine cares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatDefinition {
    pub id: String,
    pub name: String,
    #[serde(alias = "wounds")]
    pub max_wounds: u32,
    #[serde(alias = "shock")]
    pub max_shock: u32,
    #[serde(default)]
    pub resilience: Option<u32>,
    #[serde(default)]
    pub mob_bonus: Option<BonusTable>,
}

/// Read-only lookup of threat definitions. Injected into the operations that
/// need it; the engine never caches catalog data beyond value snapshots.
pub trait Catalog {
    fn get_threat(&self, id: &str) -> Option<&ThreatDefinition>;

    fn threat_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.get_threat(id).map(|t| t.name.as_str()).unwrap_or(id)
    }
}

/// In-memory catalog keyed by threat id.
#[derive(Debug, Clone, Default)]
pub struct ThreatCatalog {
    threats: HashMap<String, ThreatDefinition>,
}

impl ThreatCatalog {
    pub fn new(threats: impl IntoIterator<Item = ThreatDefinition>) -> Self {
        Self {
            threats: threats.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    /// Parse a JSON array of threat definitions.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let threats: Vec<ThreatDefinition> =
            serde_json::from_str(json).context("threat catalog is not a valid array of threats")?;
        Ok(Self::new(threats))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read threat catalog {}", path.display()))?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(path = %path.display(), threats = catalog.len(), "Loaded threat catalog");
        Ok(catalog)
    }

    pub fn insert(&mut self, threat: ThreatDefinition) {
        self.threats.insert(threat.id.clone(), threat);
    }

    pub fn len(&self) -> usize {
        self.threats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threats.is_empty()
    }
}

impl Catalog for ThreatCatalog {
    fn get_threat(&self, id: &str) -> Option<&ThreatDefinition> {
        self.threats.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> BonusTable {
        BonusTable::new(
            vec![
                BonusBracket { min_living: 10, bonus: 2 },
                BonusBracket { min_living: 2, bonus: 1 },
                BonusBracket { min_living: 20, bonus: 5 },
            ],
            3,
        )
    }

    #[test]
    fn lookup_picks_highest_reached_bracket() {
        let t = table();
        assert_eq!(t.lookup(0), (0, 3));
        assert_eq!(t.lookup(1), (0, 3));
        assert_eq!(t.lookup(2), (1, 3));
        assert_eq!(t.lookup(9), (1, 3));
        assert_eq!(t.lookup(10), (2, 3));
    }

    #[test]
    fn lookup_saturates_at_cap() {
        assert_eq!(table().lookup(25), (3, 3));
    }

    #[test]
    fn lookup_is_monotonic() {
        let t = table();
        let mut last = 0;
        for living in 0..30 {
            let (bonus, _) = t.lookup(living);
            assert!(bonus >= last);
            last = bonus;
        }
    }

    #[test]
    fn empty_table_grants_nothing() {
        assert_eq!(BonusTable::default().lookup(50), (0, 0));
    }

    #[test]
    fn catalog_parses_original_field_names() {
        let json = r#"[
            {"id": "cultist", "name": "Cultist", "wounds": 4, "shock": 3, "resilience": 7},
            {"id": "ork", "name": "Ork Boy", "maxWounds": 6, "maxShock": 4,
             "mobBonus": {"brackets": [{"minLiving": 5, "bonus": 1}], "max": 2}}
        ]"#;
        let catalog = ThreatCatalog::from_json_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        let cultist = catalog.get_threat("cultist").unwrap();
        assert_eq!(cultist.max_wounds, 4);
        assert_eq!(cultist.resilience, Some(7));
        assert!(cultist.mob_bonus.is_none());

        let ork = catalog.get_threat("ork").unwrap();
        assert_eq!(ork.mob_bonus.as_ref().unwrap().lookup(5), (1, 2));
    }

    #[test]
    fn threat_name_falls_back_to_id() {
        let catalog = ThreatCatalog::default();
        assert_eq!(catalog.threat_name("mystery"), "mystery");
        assert!(catalog.get_threat("mystery").is_none());
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(ThreatCatalog::from_json_str("{\"not\": \"an array\"}").is_err());
    }
}
