use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Strict "lat, lng" pair as typed into the submission form
    /// - Valid: "27.717200, 85.324000", "27.7,85.3", " -12 , 130.5 "
    /// - Invalid: "27.7", "27.7;85.3", "north, east", "27.7, 85.3, 10"
    pub static ref COORDINATES_REGEX: Regex =
        Regex::new(r"^\s*([+-]?\d{1,3}(?:\.\d+)?)\s*,\s*([+-]?\d{1,3}(?:\.\d+)?)\s*$").unwrap();
}

/// Geographic point parsed from a "lat, lng" string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Canonical six-decimal form used when storing coordinates
    pub fn to_coordinate_string(self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// Lenient parse used when reading stored reports for the map.
///
/// Splits on commas and parses the first two parts; anything unparseable yields
/// `None` so the report is simply left off the map.
pub fn parse_coordinates(raw: &str) -> Option<LatLng> {
    if !raw.contains(',') {
        return None;
    }

    let mut parts = raw.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lng = parts.next()?.trim().parse::<f64>().ok()?;

    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }

    Some(LatLng { lat, lng })
}

/// Strict parse used on submission: empty input means "no coordinates",
/// anything else must be an in-range "lat, lng" pair.
pub fn normalize_coordinates(raw: &str) -> Result<Option<String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let caps = COORDINATES_REGEX
        .captures(trimmed)
        .ok_or_else(|| "Coordinates must look like \"27.717200, 85.324000\"".to_string())?;

    let point = LatLng {
        lat: caps[1]
            .parse()
            .map_err(|_| "Latitude is not a number".to_string())?,
        lng: caps[2]
            .parse()
            .map_err(|_| "Longitude is not a number".to_string())?,
    };

    if !point.is_in_range() {
        return Err("Coordinates are out of range".to_string());
    }

    Ok(Some(point.to_coordinate_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_regex_valid() {
        assert!(COORDINATES_REGEX.is_match("27.717200, 85.324000"));
        assert!(COORDINATES_REGEX.is_match("27.7,85.3"));
        assert!(COORDINATES_REGEX.is_match(" -12 , 130.5 "));
        assert!(COORDINATES_REGEX.is_match("+26.45, +87.27"));
    }

    #[test]
    fn test_coordinates_regex_invalid() {
        assert!(!COORDINATES_REGEX.is_match("27.7")); // no comma
        assert!(!COORDINATES_REGEX.is_match("27.7;85.3")); // wrong separator
        assert!(!COORDINATES_REGEX.is_match("north, east"));
        assert!(!COORDINATES_REGEX.is_match("27.7, 85.3, 10")); // three parts
        assert!(!COORDINATES_REGEX.is_match(""));
    }

    #[test]
    fn test_normalize_coordinates() {
        assert_eq!(normalize_coordinates("").unwrap(), None);
        assert_eq!(normalize_coordinates("   ").unwrap(), None);
        assert_eq!(
            normalize_coordinates("27.7172,85.324").unwrap(),
            Some("27.717200, 85.324000".to_string())
        );
        assert!(normalize_coordinates("91, 85").is_err());
        assert!(normalize_coordinates("27, 181").is_err());
        assert!(normalize_coordinates("Itahari-4").is_err());
    }

    #[test]
    fn test_parse_coordinates_is_lenient() {
        assert_eq!(
            parse_coordinates("26.663, 87.274, extra"),
            Some(LatLng {
                lat: 26.663,
                lng: 87.274
            })
        );
        assert_eq!(parse_coordinates(""), None);
        assert_eq!(parse_coordinates("26.663 87.274"), None);
        assert_eq!(parse_coordinates("abc, 87.274"), None);
        assert_eq!(parse_coordinates("NaN, 87.274"), None);
        assert_eq!(parse_coordinates("26.663,"), None);
    }
}
