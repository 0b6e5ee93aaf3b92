use crate::models::{Address, Listing};
use crate::projection::{FlatSchema, FlatRow};
use std::collections::BTreeMap;

/// How often each value appears, per address field
pub type AddressCounter = BTreeMap<String, BTreeMap<String, usize>>;

/// Count address values across listings; absent values count as `"null"`
pub fn address_counter(listings: &[Listing]) -> AddressCounter {
    let mut count = AddressCounter::new();

    for listing in listings {
        for (field, accessor) in Address::SCHEMA {
            *count
                .entry(field.to_string())
                .or_default()
                .entry(accessor(&listing.address).to_string())
                .or_default() += 1;
        }
    }

    count
}

/// Flatten every listing, in order
pub fn flatten_all(listings: &[Listing]) -> Vec<FlatRow> {
    listings.iter().map(Listing::flatten).collect()
}
