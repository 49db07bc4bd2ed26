//! Typed fire-detection records and feed CSV parsing.

use chrono::NaiveDate;
use tracing::warn;

use crate::FirmsError;

/// The feed's three-level detection confidence scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Confidence {
    #[serde(rename = "l")]
    Low,
    #[serde(rename = "n")]
    Nominal,
    #[serde(rename = "h")]
    High,
}

impl Confidence {
    /// Parse a feed confidence value. VIIRS products use `l`/`n`/`h`;
    /// MODIS products report 0-100, mapped at the 80/30 boundaries.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "l" | "low" => Some(Confidence::Low),
            "n" | "nominal" => Some(Confidence::Nominal),
            "h" | "high" => Some(Confidence::High),
            other => {
                let numeric: f64 = other.parse().ok()?;
                if numeric >= 80.0 {
                    Some(Confidence::High)
                } else if numeric >= 30.0 {
                    Some(Confidence::Nominal)
                } else {
                    Some(Confidence::Low)
                }
            }
        }
    }
}

/// One fire detection from the feed, reduced to the columns the assistant
/// and map care about.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FireDetection {
    pub latitude: f64,
    pub longitude: f64,
    pub acq_date: NaiveDate,
    pub acq_time: String,
    pub confidence: Confidence,
}

/// The high-confidence subset of a detection list.
pub fn high_confidence(detections: &[FireDetection]) -> Vec<FireDetection> {
    detections
        .iter()
        .filter(|d| d.confidence == Confidence::High)
        .cloned()
        .collect()
}

/// Parse a FIRMS area-CSV body. Header-driven, so column order is not
/// assumed. Malformed rows are skipped with a warning rather than failing
/// the whole feed.
pub fn parse_area_csv(body: &str) -> Result<Vec<FireDetection>, FirmsError> {
    let mut lines = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    let Some(header) = lines.next() else {
        return Err(FirmsError::Parse("empty feed response".to_string()));
    };

    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let column = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .ok_or_else(|| FirmsError::Parse(format!("missing column '{name}'")))
    };

    let lat_col = column("latitude")?;
    let lon_col = column("longitude")?;
    let date_col = column("acq_date")?;
    let time_col = column("acq_time")?;
    let conf_col = column("confidence")?;

    let mut detections = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match parse_row(&fields, lat_col, lon_col, date_col, time_col, conf_col) {
            Some(detection) => detections.push(detection),
            None => warn!(row = line, "skipping malformed feed row"),
        }
    }

    Ok(detections)
}

fn parse_row(
    fields: &[&str],
    lat_col: usize,
    lon_col: usize,
    date_col: usize,
    time_col: usize,
    conf_col: usize,
) -> Option<FireDetection> {
    Some(FireDetection {
        latitude: fields.get(lat_col)?.parse().ok()?,
        longitude: fields.get(lon_col)?.parse().ok()?,
        acq_date: NaiveDate::parse_from_str(fields.get(date_col)?, "%Y-%m-%d").ok()?,
        acq_time: (*fields.get(time_col)?).to_string(),
        confidence: Confidence::parse(fields.get(conf_col)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = "\
latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight
28.10871,80.20979,331.8,0.39,0.36,2025-11-20,731,N,VIIRS,n,2.0NRT,290.9,1.9,N
26.92527,81.02249,342.1,0.41,0.37,2025-11-20,731,N,VIIRS,h,2.0NRT,295.3,4.6,N
25.14668,83.00632,327.5,0.44,0.38,2025-11-21,848,N,VIIRS,l,2.0NRT,288.2,1.1,N
";

    #[test]
    fn parses_header_driven_rows() {
        let detections = parse_area_csv(FEED).unwrap();
        assert_eq!(detections.len(), 3);
        assert_eq!(detections[0].latitude, 28.10871);
        assert_eq!(detections[0].acq_time, "731");
        assert_eq!(
            detections[0].acq_date,
            NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()
        );
        assert_eq!(detections[1].confidence, Confidence::High);
    }

    #[test]
    fn skips_malformed_rows() {
        let feed = "latitude,longitude,acq_date,acq_time,confidence\n\
                    not-a-number,80.2,2025-11-20,731,h\n\
                    26.9,81.0,2025-11-20,731,h\n";
        let detections = parse_area_csv(feed).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].latitude, 26.9);
    }

    #[test]
    fn missing_column_is_an_error() {
        let feed = "latitude,longitude,acq_date,acq_time\n26.9,81.0,2025-11-20,731\n";
        let err = parse_area_csv(feed).unwrap_err();
        assert!(err.to_string().contains("confidence"));
    }

    #[test]
    fn empty_body_is_an_error() {
        assert!(parse_area_csv("").is_err());
    }

    #[test]
    fn confidence_parses_letters_words_and_numbers() {
        assert_eq!(Confidence::parse("h"), Some(Confidence::High));
        assert_eq!(Confidence::parse("High"), Some(Confidence::High));
        assert_eq!(Confidence::parse("n"), Some(Confidence::Nominal));
        assert_eq!(Confidence::parse("l"), Some(Confidence::Low));
        assert_eq!(Confidence::parse("95"), Some(Confidence::High));
        assert_eq!(Confidence::parse("55"), Some(Confidence::Nominal));
        assert_eq!(Confidence::parse("10"), Some(Confidence::Low));
        assert_eq!(Confidence::parse("fuzzy"), None);
    }

    #[test]
    fn high_confidence_filters() {
        let detections = parse_area_csv(FEED).unwrap();
        let high = high_confidence(&detections);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].confidence, Confidence::High);
    }

    #[test]
    fn detection_serializes_with_feed_confidence_letters() {
        let detections = parse_area_csv(FEED).unwrap();
        let json = serde_json::to_value(&detections[1]).unwrap();
        assert_eq!(json["confidence"], "h");
        assert_eq!(json["acq_date"], "2025-11-20");
    }
}
