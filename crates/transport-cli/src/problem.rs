//! Wire format for a problem file accepted by `transport-cli solve`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemFile {
    pub suppliers: Vec<f64>,
    pub consumers: Vec<f64>,
    pub prices: Vec<Vec<f64>>,
    pub capacities: Option<Vec<Vec<f64>>>,
    /// Restriction keyed `"row,col"` with value `">k"` or `"<k"`, matching
    /// `transport_core::Restriction`'s wire codec.
    #[serde(default)]
    pub restrictions: HashMap<String, String>,
}

impl ProblemFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("reading problem file {}: {err}", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|err| anyhow::anyhow!("parsing problem file {}: {err}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_problem() {
        let json = r#"{
            "suppliers": [5.0],
            "consumers": [5.0],
            "prices": [[2.0]]
        }"#;
        let problem: ProblemFile = serde_json::from_str(json).unwrap();
        assert_eq!(problem.suppliers, vec![5.0]);
        assert!(problem.restrictions.is_empty());
    }
}
