use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw listing row as supplied by a row source: column name -> text
pub type RawRow = HashMap<String, String>;

/// Structured address parsed from the comma-delimited location string
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub autonomous_community: Option<String>,
}

/// "Características básicas" section of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicFeatures {
    pub n_rooms: Option<i64>,
    pub sqm_constructed: Option<f64>,
    pub sqm_usable: Option<f64>,
    pub bathrooms: Option<i64>,
    /// Construction year
    pub built_in: Option<i64>,

    pub terrace: bool,
    pub balcony: bool,
    pub storage_room: bool,
    pub built_in_wardrobes: bool,
    pub air_conditioning: bool,
    pub green_areas: bool,
    pub pool: bool,
    pub new_building_development: bool,

    pub state: Option<String>,
    pub orientation: Option<String>,
    pub heating: Option<String>,
    pub reduced_mobility: Option<String>,
    pub garage: Option<String>,
    pub semi_detached_house: Option<String>,

    /// Last segment no rule recognized
    pub extra: Option<String>,
}

/// "Edificio" section of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub elevator: Option<bool>,
    /// `Some(true)` for interior, `Some(false)` for exterior
    pub inside: Option<bool>,
    /// Ground level is 0
    pub floor: Option<i64>,
    pub extra: Option<String>,
}

/// "Certificado energético" section of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyCertificate {
    pub certificate: Option<String>,
    pub kwh_sqm_year_emissions: Option<f64>,
    pub kg_co2_sqm_year_consumption: Option<f64>,
    pub extra: Option<String>,
}

/// "Situación de la vivienda" section of a listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub tenant: Option<String>,
}

/// Core listing aggregate. Owns every sub-record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub title: Option<String>,
    pub property_price_euros: Option<f64>,
    pub price_per_sqm: Option<f64>,
    pub monthly_community_fees_euros: Option<f64>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    pub address: Address,
    pub basic_features: BasicFeatures,
    pub building: Building,
    pub energy_certificate: EnergyCertificate,
    pub status: Status,
}
