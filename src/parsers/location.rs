use crate::error::{ParseError, ParseResult};
use crate::models::Address;
use regex::Regex;
use std::sync::LazyLock;

/// Street name with an optional trailing house number or "s/n" (sin número)
static RE_STREET_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)(?:[\s,-]+(\d+|s/n))?$").unwrap());

/// A location segment that is itself a house number
static RE_NUMBER_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-?\d+|s/n$)").unwrap());

const NEIGHBORHOOD_MARKER: &str = "Barrio";
const DISTRICT_MARKER: &str = "Distrito";
const REGION_MARKER: &str = "Comarca";

impl Address {
    /// Parse an Idealista-style location such as
    /// `"Calle de Alcalá 120, Barrio Goya, Distrito Salamanca, Madrid, Madrid, Comunidad de Madrid"`.
    ///
    /// The last three segments always win for city, region and autonomous
    /// community, even over a "Comarca" segment found earlier.
    pub fn from_location(location: &str) -> ParseResult<Self> {
        let parts: Vec<&str> = location.split(',').map(str::trim).collect();

        if parts.len() < 3 {
            return Err(ParseError::MalformedLocation {
                location: location.to_string(),
                segments: parts.len(),
            });
        }

        let mut address = Address::default();

        if let Some(caps) = RE_STREET_NUMBER.captures(parts[0]) {
            let street = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if !street.is_empty() && !street.starts_with(NEIGHBORHOOD_MARKER) {
                address.street = Some(street.to_string());
            }
            address.number = caps.get(2).map(|m| m.as_str().to_string());
        }

        // Number sometimes lands in its own segment: "Calle Mayor, 5, ..."
        if address.number.is_none() && RE_NUMBER_SEGMENT.is_match(parts[1]) {
            address.number = Some(parts[1].to_string());
        }

        for part in &parts {
            if part.starts_with(DISTRICT_MARKER) {
                address.district = Some(part.to_string());
            } else if part.starts_with(REGION_MARKER) {
                address.region = Some(part.to_string());
            } else if part.starts_with(NEIGHBORHOOD_MARKER) {
                address.neighborhood = Some(part.to_string());
            }
        }

        let n = parts.len();
        address.city = Some(parts[n - 3].to_string());
        address.region = Some(parts[n - 2].to_string());
        address.autonomous_community = Some(parts[n - 1].to_string());

        Ok(address)
    }
}
