mod document;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::cost::PricingMap;
use crate::error::LoadError;
use crate::types::Rate;

use document::RateTable;

/// Read-only provider -> model -> [`Rate`] table, in source document order.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    map: RateTable,
}

impl PricingMap for PriceCatalog {
    fn rate(&self, provider: &str, model: &str) -> Option<&Rate> {
        self.map.get(provider)?.get(model)
    }

    fn providers(&self) -> Vec<&str> {
        self.map.keys().map(String::as_str).collect()
    }

    fn models(&self, provider: &str) -> Vec<&str> {
        self.map
            .get(provider)
            .map(|models| models.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn has_provider(&self, provider: &str) -> bool {
        self.map.contains_key(provider)
    }
}

impl PriceCatalog {
    pub fn from_json_str(data: &str) -> Result<Self, LoadError> {
        Ok(Self {
            map: document::parse_json(data)?,
        })
    }

    pub fn from_toml_str(data: &str) -> Result<Self, LoadError> {
        Ok(Self {
            map: document::parse_toml(data)?,
        })
    }

    pub fn provider_count(&self) -> usize {
        self.map.len()
    }

    pub fn model_count(&self) -> usize {
        self.map.values().map(|models| models.len()).sum()
    }
}

/// Load the whole catalog from `path`. `.toml` files are read as TOML,
/// everything else as JSON.
pub fn load_pricing(path: &Path) -> Result<PriceCatalog, LoadError> {
    let data = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let catalog = if is_toml {
        PriceCatalog::from_toml_str(&data)?
    } else {
        PriceCatalog::from_json_str(&data)?
    };

    info!(
        path = %path.display(),
        providers = catalog.provider_count(),
        models = catalog.model_count(),
        "loaded price catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::Error;

    const SAMPLE: &str = r#"{
        "OpenAI": {"gpt-4": [30.0, 60.0], "gpt-4o": [2.5, 10.0]},
        "Anthropic": {"claude-3-haiku": [0.25, 1.25]}
    }"#;

    #[test]
    fn lookup_found_and_missing() {
        let catalog = PriceCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(
            catalog.lookup("OpenAI", "gpt-4").unwrap(),
            Rate::new(30.0, 60.0)
        );
        assert!(matches!(
            catalog.lookup("Acme", "gpt-4"),
            Err(Error::UnknownProvider(_))
        ));
        assert!(matches!(
            catalog.lookup("Anthropic", "gpt-4"),
            Err(Error::UnknownModel { .. })
        ));
    }

    #[test]
    fn listing() {
        let catalog = PriceCatalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.providers(), ["OpenAI", "Anthropic"]);
        assert_eq!(catalog.models("OpenAI"), ["gpt-4", "gpt-4o"]);
        assert!(catalog.models("Acme").is_empty());
        assert_eq!(catalog.provider_count(), 2);
        assert_eq!(catalog.model_count(), 3);
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("pricing_data.json");
        fs::write(&json_path, SAMPLE).unwrap();
        let catalog = load_pricing(&json_path).unwrap();
        assert_eq!(catalog.model_count(), 3);

        let toml_path = dir.path().join("pricing.TOML");
        let mut f = fs::File::create(&toml_path).unwrap();
        writeln!(f, "[Google]\n\"gemini-1.5-flash\" = [0.075, 0.3]").unwrap();
        let catalog = load_pricing(&toml_path).unwrap();
        assert_eq!(
            catalog.rate("Google", "gemini-1.5-flash"),
            Some(&Rate::new(0.075, 0.3))
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pricing(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }
}
