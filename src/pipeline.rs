//! Batch normalization of raw rows.
//!
//! Rows share no state, so each one is assembled on its own blocking task.
//! Outcomes come back in input order regardless of completion order.

use crate::error::ParseError;
use crate::models::{Listing, RawRow};
use tokio::task::JoinSet;
use tracing::{debug, error};

/// Result of assembling one raw row
#[derive(Debug)]
pub struct RowOutcome {
    /// Position of the row in the input batch
    pub index: usize,
    /// Raw `id` column, when the row had one
    pub id: Option<String>,
    pub result: Result<Listing, ParseError>,
}

/// Assemble every row in parallel. A failing row never affects the others.
pub async fn normalize_rows(rows: Vec<RawRow>) -> Vec<RowOutcome> {
    let mut tasks = JoinSet::new();

    for (index, row) in rows.into_iter().enumerate() {
        tasks.spawn_blocking(move || RowOutcome {
            index,
            id: row.get("id").cloned(),
            result: Listing::from_raw_row(&row),
        });
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => error!("Row worker failed: {}", e),
        }
    }

    outcomes.sort_by_key(|outcome| outcome.index);
    debug!("Normalized {} rows", outcomes.len());
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, location: &str) -> RawRow {
        [
            ("id", id),
            ("title", ""),
            ("description", ""),
            ("propertyPrice", "100.000 €"),
            ("pricePerSqm", ""),
            ("communityFees", ""),
            ("location", location),
            ("basicFeatures", "2 habitaciones"),
            ("building", ""),
            ("energyCertificate", ""),
            ("apartmentStatus", ""),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn test_order_preserved_and_failures_isolated() {
        let rows = (0..20)
            .map(|i| {
                let location = if i == 7 { "Madrid" } else { "Calle Mayor 1, Madrid, Madrid, Comunidad de Madrid" };
                row(&i.to_string(), location)
            })
            .collect();

        let outcomes = normalize_rows(rows).await;

        assert_eq!(outcomes.len(), 20);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.index, i);
            assert_eq!(outcome.id.as_deref(), Some(i.to_string().as_str()));
            assert_eq!(outcome.result.is_err(), i == 7);
        }
    }
}
