//! Static lookup table mapping (country, subdivision) to a geographic
//! bounding box accepted by the FIRMS area API.

/// West/south/east/north bounding box in degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// The `west,south,east,north` form used in FIRMS area URLs.
    pub fn as_area(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

const REGIONS: &[(&str, &str, BoundingBox)] = &[
    (
        "india",
        "up",
        BoundingBox {
            west: 77.1,
            south: 23.5,
            east: 84.5,
            north: 31.5,
        },
    ),
    (
        "india",
        "mp",
        BoundingBox {
            west: 74.0,
            south: 21.0,
            east: 82.0,
            north: 26.0,
        },
    ),
    (
        "india",
        "maharashtra",
        BoundingBox {
            west: 72.5,
            south: 17.0,
            east: 80.0,
            north: 22.0,
        },
    ),
];

/// Look up a region's bounding box. Case-insensitive on both keys.
pub fn lookup_region(country: &str, state: &str) -> Option<BoundingBox> {
    let country = country.trim().to_lowercase();
    let state = state.trim().to_lowercase();
    REGIONS
        .iter()
        .find(|(c, s, _)| *c == country && *s == state)
        .map(|(_, _, bbox)| *bbox)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let a = lookup_region("india", "up").unwrap();
        let b = lookup_region("India", " UP ").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_area(), "77.1,23.5,84.5,31.5");
    }

    #[test]
    fn unknown_region_is_none() {
        assert!(lookup_region("india", "unknown").is_none());
        assert!(lookup_region("norway", "up").is_none());
    }
}
