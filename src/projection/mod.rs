//! Flattening of a [`Listing`] into one namespaced row for tabular storage.
//!
//! Every record kind declares a static schema: an ordered table of
//! `(field name, accessor)` pairs. The flattened key set therefore depends
//! only on the schema, never on which fields a given listing populated.

use crate::models::{Address, BasicFeatures, Building, EnergyCertificate, Listing, Status};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One flattened row
pub type FlatRow = BTreeMap<String, Scalar>;

/// A single cell of a flattened row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&Option<bool>> for Scalar {
    fn from(value: &Option<bool>) -> Self {
        value.map_or(Scalar::Null, Scalar::Bool)
    }
}

impl From<&Option<i64>> for Scalar {
    fn from(value: &Option<i64>) -> Self {
        value.map_or(Scalar::Null, Scalar::Int)
    }
}

impl From<&Option<f64>> for Scalar {
    fn from(value: &Option<f64>) -> Self {
        value.map_or(Scalar::Null, Scalar::Float)
    }
}

impl From<&Option<String>> for Scalar {
    fn from(value: &Option<String>) -> Self {
        value.clone().map_or(Scalar::Null, Scalar::Text)
    }
}

impl From<&Option<DateTime<Utc>>> for Scalar {
    fn from(value: &Option<DateTime<Utc>>) -> Self {
        value.map_or(Scalar::Null, |ts| {
            Scalar::Text(ts.to_rfc3339_opts(SecondsFormat::Secs, true))
        })
    }
}

/// Accessor reading one field of a record as a scalar
pub type Accessor<T> = fn(&T) -> Scalar;

/// A record that can be flattened under a fixed key prefix
pub trait FlatSchema: Sized + 'static {
    /// Namespace prepended to every field name, without the separator
    const PREFIX: &'static str;

    /// Ordered field table
    const SCHEMA: &'static [(&'static str, Accessor<Self>)];

    fn flatten_with_prefix(&self, out: &mut FlatRow) {
        for (name, accessor) in Self::SCHEMA {
            out.insert(format!("{}_{}", Self::PREFIX, name), accessor(self));
        }
    }

    /// Flattened keys, in schema order
    fn flat_keys() -> Vec<String> {
        Self::SCHEMA
            .iter()
            .map(|(name, _)| format!("{}_{}", Self::PREFIX, name))
            .collect()
    }
}

impl FlatSchema for Address {
    const PREFIX: &'static str = "address";
    const SCHEMA: &'static [(&'static str, Accessor<Self>)] = &[
        ("street", |a| (&a.street).into()),
        ("number", |a| (&a.number).into()),
        ("neighborhood", |a| (&a.neighborhood).into()),
        ("district", |a| (&a.district).into()),
        ("city", |a| (&a.city).into()),
        ("region", |a| (&a.region).into()),
        ("autonomous_community", |a| (&a.autonomous_community).into()),
    ];
}

impl FlatSchema for BasicFeatures {
    const PREFIX: &'static str = "basic_features";
    const SCHEMA: &'static [(&'static str, Accessor<Self>)] = &[
        ("n_rooms", |f| (&f.n_rooms).into()),
        ("sqm_constructed", |f| (&f.sqm_constructed).into()),
        ("sqm_usable", |f| (&f.sqm_usable).into()),
        ("bathrooms", |f| (&f.bathrooms).into()),
        ("built_in", |f| (&f.built_in).into()),
        ("terrace", |f| f.terrace.into()),
        ("balcony", |f| f.balcony.into()),
        ("storage_room", |f| f.storage_room.into()),
        ("built_in_wardrobes", |f| f.built_in_wardrobes.into()),
        ("air_conditioning", |f| f.air_conditioning.into()),
        ("green_areas", |f| f.green_areas.into()),
        ("pool", |f| f.pool.into()),
        ("new_building_development", |f| f.new_building_development.into()),
        ("state", |f| (&f.state).into()),
        ("orientation", |f| (&f.orientation).into()),
        ("heating", |f| (&f.heating).into()),
        ("reduced_mobility", |f| (&f.reduced_mobility).into()),
        ("garage", |f| (&f.garage).into()),
        ("semi_detached_house", |f| (&f.semi_detached_house).into()),
        ("extra", |f| (&f.extra).into()),
    ];
}

impl FlatSchema for Building {
    const PREFIX: &'static str = "building";
    const SCHEMA: &'static [(&'static str, Accessor<Self>)] = &[
        ("elevator", |b| (&b.elevator).into()),
        ("inside", |b| (&b.inside).into()),
        ("floor", |b| (&b.floor).into()),
        ("extra", |b| (&b.extra).into()),
    ];
}

impl FlatSchema for EnergyCertificate {
    const PREFIX: &'static str = "energy_certificate";
    const SCHEMA: &'static [(&'static str, Accessor<Self>)] = &[
        ("certificate", |e| (&e.certificate).into()),
        ("kwh_sqm_year_emissions", |e| (&e.kwh_sqm_year_emissions).into()),
        ("kg_co2_sqm_year_consumption", |e| (&e.kg_co2_sqm_year_consumption).into()),
        ("extra", |e| (&e.extra).into()),
    ];
}

impl FlatSchema for Status {
    const PREFIX: &'static str = "status";
    const SCHEMA: &'static [(&'static str, Accessor<Self>)] = &[("tenant", |s| (&s.tenant).into())];
}

/// Scalar fields owned directly by the listing
impl FlatSchema for Listing {
    const PREFIX: &'static str = "apartment";
    const SCHEMA: &'static [(&'static str, Accessor<Self>)] = &[
        ("id", |l| Scalar::Text(l.id.clone())),
        ("title", |l| (&l.title).into()),
        ("property_price_euros", |l| (&l.property_price_euros).into()),
        ("price_per_sqm", |l| (&l.price_per_sqm).into()),
        ("monthly_community_fees_euros", |l| (&l.monthly_community_fees_euros).into()),
        ("location", |l| (&l.location).into()),
        ("description", |l| (&l.description).into()),
        ("created_at", |l| (&l.created_at).into()),
        ("updated_at", |l| (&l.updated_at).into()),
    ];
}

impl Listing {
    /// Flatten the listing and all of its sub-records into one row
    pub fn flatten(&self) -> FlatRow {
        let mut row = FlatRow::new();
        self.flatten_with_prefix(&mut row);
        self.address.flatten_with_prefix(&mut row);
        self.basic_features.flatten_with_prefix(&mut row);
        self.building.flatten_with_prefix(&mut row);
        self.energy_certificate.flatten_with_prefix(&mut row);
        self.status.flatten_with_prefix(&mut row);
        row
    }

    /// Every key [`Listing::flatten`] produces
    pub fn flat_columns() -> Vec<String> {
        [
            <Listing as FlatSchema>::flat_keys(),
            Address::flat_keys(),
            BasicFeatures::flat_keys(),
            Building::flat_keys(),
            EnergyCertificate::flat_keys(),
            Status::flat_keys(),
        ]
        .concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Listing {
        Listing {
            id: "1".to_string(),
            title: Some("Piso en venta".to_string()),
            property_price_euros: Some(250_000.0),
            price_per_sqm: None,
            monthly_community_fees_euros: None,
            location: None,
            description: None,
            created_at: None,
            updated_at: None,
            address: Address {
                city: Some("Madrid".to_string()),
                ..Default::default()
            },
            basic_features: BasicFeatures {
                n_rooms: Some(2),
                terrace: true,
                ..Default::default()
            },
            building: Building {
                elevator: Some(false),
                ..Default::default()
            },
            energy_certificate: EnergyCertificate::default(),
            status: Status::default(),
        }
    }

    #[test]
    fn test_flatten_namespaces_fields() {
        let row = listing().flatten();

        assert_eq!(row["apartment_id"], Scalar::Text("1".to_string()));
        assert_eq!(row["apartment_property_price_euros"], Scalar::Float(250_000.0));
        assert_eq!(row["address_city"], Scalar::Text("Madrid".to_string()));
        assert_eq!(row["basic_features_n_rooms"], Scalar::Int(2));
        assert_eq!(row["basic_features_terrace"], Scalar::Bool(true));
        assert_eq!(row["basic_features_balcony"], Scalar::Bool(false));
        assert_eq!(row["building_elevator"], Scalar::Bool(false));
        assert_eq!(row["building_floor"], Scalar::Null);
        assert_eq!(row["status_tenant"], Scalar::Null);
    }

    #[test]
    fn test_key_set_matches_schema() {
        let row = listing().flatten();
        let mut columns = Listing::flat_columns();
        columns.sort();

        assert_eq!(row.keys().cloned().collect::<Vec<_>>(), columns);
        // No two record kinds share a key
        assert_eq!(row.len(), Listing::flat_columns().len());
    }

    #[test]
    fn test_null_serializes_as_json_null() {
        let row = listing().flatten();
        let json = serde_json::to_value(&row).unwrap();

        assert!(json["address_street"].is_null());
        assert_eq!(json["basic_features_n_rooms"], 2);
        assert_eq!(json["building_elevator"], false);
    }
}
