//! Home-location port, used once at startup to pick the initial district.
//!
//! The dashboard treats location as an opaque external input behind
//! [`LocationProvider`].  The shipped implementation reads optional
//! coordinates from `settings.toml`; no network geolocation service is
//! consulted.  Resolution of coordinates to a district name goes through
//! the AI gateway and is validated against the district list.

use crate::config::LocationConfig;

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of the user's home coordinates, if any.
pub trait LocationProvider {
    fn coordinates(&self) -> Option<Coordinates>;
}

// ---------------------------------------------------------------------------
// ConfigLocationProvider
// ---------------------------------------------------------------------------

/// Provider backed by the optional `location` section of `settings.toml`.
/// Both latitude and longitude must be present.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLocationProvider {
    coords: Option<Coordinates>,
}

impl ConfigLocationProvider {
    pub fn from_config(config: &LocationConfig) -> Self {
        let coords = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Self { coords }
    }
}

impl LocationProvider for ConfigLocationProvider {
    fn coordinates(&self) -> Option<Coordinates> {
        self.coords
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_fields_required() {
        let half = LocationConfig {
            latitude: Some(26.85),
            longitude: None,
        };
        assert!(ConfigLocationProvider::from_config(&half)
            .coordinates()
            .is_none());

        let full = LocationConfig {
            latitude: Some(26.85),
            longitude: Some(80.95),
        };
        let coords = ConfigLocationProvider::from_config(&full)
            .coordinates()
            .unwrap();
        assert_eq!(coords.latitude, 26.85);
        assert_eq!(coords.longitude, 80.95);
    }

    #[test]
    fn empty_config_yields_none() {
        let provider = ConfigLocationProvider::from_config(&LocationConfig::default());
        assert!(provider.coordinates().is_none());
    }
}
