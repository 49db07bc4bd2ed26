//! Leaflet map rendering for fire detections.

use crate::records::{Confidence, FireDetection};

/// Marker color for a confidence level.
fn confidence_color(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "red",
        Confidence::Nominal => "orange",
        Confidence::Low => "yellow",
    }
}

/// Render detections as a standalone Leaflet HTML document, one circle
/// marker per detection colored by confidence. Falls back to an India-wide
/// view when there are no points.
pub fn render_map(detections: &[FireDetection]) -> String {
    let (center_lat, center_lon, zoom) = if detections.is_empty() {
        (22.5, 79.0, 5)
    } else {
        let n = detections.len() as f64;
        let lat = detections.iter().map(|d| d.latitude).sum::<f64>() / n;
        let lon = detections.iter().map(|d| d.longitude).sum::<f64>() / n;
        (lat, lon, 6)
    };

    let mut markers = String::new();
    for d in detections {
        markers.push_str(&format!(
            "L.circleMarker([{lat}, {lon}], {{radius: 4, color: '{color}', fill: true, fillOpacity: 0.7}})\
             .addTo(map).bindPopup('{date} {time}');\n",
            lat = d.latitude,
            lon = d.longitude,
            color = confidence_color(d.confidence),
            date = d.acq_date,
            time = d.acq_time,
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>FireWatch map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
var map = L.map('map').setView([{center_lat}, {center_lon}], {zoom});
L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
    attribution: '&copy; OpenStreetMap contributors'
}}).addTo(map);
{markers}</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn detection(lat: f64, lon: f64, confidence: Confidence) -> FireDetection {
        FireDetection {
            latitude: lat,
            longitude: lon,
            acq_date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            acq_time: "731".to_string(),
            confidence,
        }
    }

    #[test]
    fn one_marker_per_detection_with_confidence_colors() {
        let html = render_map(&[
            detection(28.1, 80.2, Confidence::High),
            detection(26.9, 81.0, Confidence::Nominal),
            detection(25.1, 83.0, Confidence::Low),
        ]);
        assert_eq!(html.matches("L.circleMarker").count(), 3);
        assert!(html.contains("color: 'red'"));
        assert!(html.contains("color: 'orange'"));
        assert!(html.contains("color: 'yellow'"));
        assert!(html.contains("2025-11-20 731"));
    }

    #[test]
    fn centers_on_mean_coordinate() {
        let html = render_map(&[
            detection(20.0, 80.0, Confidence::High),
            detection(30.0, 90.0, Confidence::High),
        ]);
        assert!(html.contains("setView([25, 85], 6)"));
    }

    #[test]
    fn empty_detections_render_a_fallback_view() {
        let html = render_map(&[]);
        assert!(html.contains("setView([22.5, 79], 5)"));
        assert!(!html.contains("circleMarker"));
    }
}
