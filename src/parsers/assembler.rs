use crate::error::{ParseError, ParseResult};
use crate::models::{Address, Listing, RawRow};
use crate::parsers::numeric::parse_grouped_price;
use crate::parsers::traits::classify;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Raw column names as stored by the scraper
pub mod keys {
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const PROPERTY_PRICE: &str = "propertyPrice";
    pub const PRICE_PER_SQM: &str = "pricePerSqm";
    pub const COMMUNITY_FEES: &str = "communityFees";
    pub const LOCATION: &str = "location";
    pub const BASIC_FEATURES: &str = "basicFeatures";
    pub const BUILDING: &str = "building";
    pub const ENERGY_CERTIFICATE: &str = "energyCertificate";
    pub const APARTMENT_STATUS: &str = "apartmentStatus";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";

    /// Keys every row must carry (values may still be empty)
    pub const REQUIRED: &[&str] = &[
        ID,
        TITLE,
        DESCRIPTION,
        PROPERTY_PRICE,
        PRICE_PER_SQM,
        COMMUNITY_FEES,
        LOCATION,
        BASIC_FEATURES,
        BUILDING,
        ENERGY_CERTIFICATE,
        APARTMENT_STATUS,
    ];
}

fn required<'a>(row: &'a RawRow, key: &str) -> ParseResult<&'a str> {
    row.get(key)
        .map(String::as_str)
        .ok_or_else(|| ParseError::MissingField {
            key: key.to_string(),
        })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn timestamp(row: &RawRow, key: &str) -> Option<DateTime<Utc>> {
    let value = row.get(key)?.trim();
    if value.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring unparsable {} '{}': {}", key, value, e);
            None
        }
    }
}

impl Listing {
    /// Assemble a listing from one raw row.
    ///
    /// Fails only when a required key is missing or the location cannot be
    /// split into city/region/community. Unparsable numbers become `None`.
    pub fn from_raw_row(row: &RawRow) -> ParseResult<Self> {
        if let Some(missing) = keys::REQUIRED.iter().find(|key| !row.contains_key(**key)) {
            return Err(ParseError::MissingField {
                key: missing.to_string(),
            });
        }

        let location = required(row, keys::LOCATION)?;
        let address = Address::from_location(location)?;

        Ok(Listing {
            id: required(row, keys::ID)?.trim().to_string(),
            title: non_empty(required(row, keys::TITLE)?),
            property_price_euros: parse_grouped_price(required(row, keys::PROPERTY_PRICE)?),
            price_per_sqm: parse_grouped_price(required(row, keys::PRICE_PER_SQM)?),
            monthly_community_fees_euros: parse_grouped_price(required(row, keys::COMMUNITY_FEES)?),
            location: Some(location.to_string()),
            description: non_empty(required(row, keys::DESCRIPTION)?),
            created_at: timestamp(row, keys::CREATED_AT),
            updated_at: timestamp(row, keys::UPDATED_AT),
            address,
            basic_features: classify(keys::BASIC_FEATURES, required(row, keys::BASIC_FEATURES)?),
            building: classify(keys::BUILDING, required(row, keys::BUILDING)?),
            energy_certificate: classify(
                keys::ENERGY_CERTIFICATE,
                required(row, keys::ENERGY_CERTIFICATE)?,
            ),
            status: classify(keys::APARTMENT_STATUS, required(row, keys::APARTMENT_STATUS)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_row() -> RawRow {
        [
            ("id", "104372519"),
            ("title", "Piso en venta en Calle de Alcalá"),
            ("description", "Luminoso piso reformado."),
            ("propertyPrice", "1.234.567 €"),
            ("pricePerSqm", "13.717 €/m²"),
            ("communityFees", "120 €/mes"),
            (
                "location",
                "Calle de Alcalá 120, Barrio Goya, Distrito Salamanca, Madrid, Madrid, Comunidad de Madrid",
            ),
            ("basicFeatures", "90 m² construidos, 70 m² útiles; 3 habitaciones; 2 baños"),
            ("building", "Planta 4ª exterior; Con ascensor"),
            ("energyCertificate", "En trámite"),
            ("apartmentStatus", ""),
            ("createdAt", "2024-11-02T10:15:00Z"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_assemble_listing() {
        let listing = Listing::from_raw_row(&raw_row()).unwrap();

        assert_eq!(listing.id, "104372519");
        assert_eq!(listing.title.as_deref(), Some("Piso en venta en Calle de Alcalá"));
        assert_eq!(listing.property_price_euros, Some(1_234_567.0));
        assert_eq!(listing.price_per_sqm, Some(13_717.0));
        assert_eq!(listing.monthly_community_fees_euros, Some(120.0));
        assert_eq!(listing.address.district.as_deref(), Some("Distrito Salamanca"));
        assert_eq!(listing.basic_features.n_rooms, Some(3));
        assert_eq!(listing.basic_features.sqm_usable, Some(70.0));
        assert_eq!(listing.building.floor, Some(4));
        assert_eq!(listing.building.elevator, Some(true));
        assert_eq!(listing.energy_certificate.certificate.as_deref(), Some("En trámite"));
        assert_eq!(listing.status.tenant, None);
        assert_eq!(
            listing.created_at.map(|ts| ts.to_rfc3339()),
            Some("2024-11-02T10:15:00+00:00".to_string())
        );
        assert_eq!(listing.updated_at, None);
    }

    #[test]
    fn test_empty_prices_stay_absent() {
        let mut row = raw_row();
        row.insert("communityFees".to_string(), String::new());
        row.insert("pricePerSqm".to_string(), "A consultar".to_string());

        let listing = Listing::from_raw_row(&row).unwrap();
        assert_eq!(listing.monthly_community_fees_euros, None);
        assert_eq!(listing.price_per_sqm, None);
    }

    #[test]
    fn test_location_is_stored_verbatim() {
        let mut row = raw_row();
        let location = "  Calle Mayor 1, Madrid, Madrid, Comunidad de Madrid ";
        row.insert("location".to_string(), location.to_string());

        let listing = Listing::from_raw_row(&row).unwrap();
        assert_eq!(listing.location.as_deref(), Some(location));
        assert_eq!(listing.address.street.as_deref(), Some("Calle Mayor"));
    }

    #[test]
    fn test_missing_field() {
        let mut row = raw_row();
        row.remove("building");

        assert_eq!(
            Listing::from_raw_row(&row).unwrap_err(),
            ParseError::MissingField {
                key: "building".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_location_fails_the_row() {
        let mut row = raw_row();
        row.insert("location".to_string(), "Madrid".to_string());

        assert!(matches!(
            Listing::from_raw_row(&row),
            Err(ParseError::MalformedLocation { segments: 1, .. })
        ));
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let row = raw_row();
        assert_eq!(
            Listing::from_raw_row(&row).unwrap(),
            Listing::from_raw_row(&row).unwrap()
        );
    }
}
