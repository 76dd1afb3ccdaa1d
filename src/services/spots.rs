use crate::core::Coordinates;
use crate::models::StudySpot;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the spot catalog
#[derive(Debug, Error)]
pub enum SpotError {
    #[error("Failed to read spot catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse spot catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Spot catalog {0} is empty")]
    Empty(PathBuf),
}

/// Fixed list of campus study spots
#[derive(Debug, Clone)]
pub struct SpotCatalog {
    spots: Vec<StudySpot>,
}

impl SpotCatalog {
    pub fn new(spots: Vec<StudySpot>) -> Self {
        Self { spots }
    }

    /// Load the catalog from a JSON array file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SpotError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| SpotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let spots: Vec<StudySpot> =
            serde_json::from_slice(&bytes).map_err(|source| SpotError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if spots.is_empty() {
            return Err(SpotError::Empty(path.to_path_buf()));
        }

        tracing::info!("Loaded {} study spots from {}", spots.len(), path.display());
        Ok(Self::new(spots))
    }

    pub fn spots(&self) -> &[StudySpot] {
        &self.spots
    }

    /// Look a spot up by name, exact match first, then ignoring case
    pub fn find(&self, name: &str) -> Option<&StudySpot> {
        let name = name.trim();
        self.spots
            .iter()
            .find(|spot| spot.name == name)
            .or_else(|| self.spots.iter().find(|spot| spot.name.eq_ignore_ascii_case(name)))
    }

    /// One `Name: tag, tag` line per spot, for prompting
    pub fn knowledge_base(&self) -> String {
        self.spots
            .iter()
            .map(|spot| format!("{}: {}", spot.name, spot.tags.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Google Maps walking directions between two points
pub fn directions_url(origin: Coordinates, destination: Coordinates) -> String {
    let origin = format!("{},{}", origin.latitude, origin.longitude);
    let destination = format!("{},{}", destination.latitude, destination.longitude);

    format!(
        "https://www.google.com/maps/dir/?api=1&travelmode=walking&origin={}&destination={}",
        urlencoding::encode(&origin),
        urlencoding::encode(&destination)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_catalog() -> SpotCatalog {
        SpotCatalog::new(vec![
            StudySpot {
                name: "Hicks Undergraduate Library".to_string(),
                tags: vec!["quiet".to_string(), "outlets".to_string()],
                lat: 40.4246,
                lng: -86.9125,
            },
            StudySpot {
                name: "Purdue Memorial Union".to_string(),
                tags: vec!["loud".to_string()],
                lat: 40.4244,
                lng: -86.9110,
            },
        ])
    }

    #[test]
    fn test_find_spot() {
        let catalog = create_catalog();
        assert!(catalog.find("Hicks Undergraduate Library").is_some());
        assert!(catalog.find(" hicks undergraduate library ").is_some());
        assert!(catalog.find("Nowhere Hall").is_none());
    }

    #[test]
    fn test_knowledge_base_format() {
        let catalog = create_catalog();
        assert_eq!(
            catalog.knowledge_base(),
            "Hicks Undergraduate Library: quiet, outlets\nPurdue Memorial Union: loud"
        );
    }

    #[test]
    fn test_directions_url() {
        let origin = Coordinates::new(40.4237, -86.9212).unwrap();
        let destination = Coordinates::new(40.4246, -86.9125).unwrap();
        let url = directions_url(origin, destination);

        assert!(url.starts_with("https://www.google.com/maps/dir/?api=1"));
        assert!(url.contains("origin=40.4237%2C-86.9212"));
        assert!(url.contains("destination=40.4246%2C-86.9125"));
    }

    #[tokio::test]
    async fn test_load_shipped_catalog() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/study_spots.json");
        let catalog = SpotCatalog::load(path).await.unwrap();
        assert!(catalog.find("Hicks Undergraduate Library").is_some());
    }

    #[tokio::test]
    async fn test_load_missing_catalog() {
        let result = SpotCatalog::load("/definitely/not/here.json").await;
        assert!(matches!(result, Err(SpotError::Io { .. })));
    }
}
