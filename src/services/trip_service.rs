//! Servicio de viajes
//!
//! Resúmenes diarios del conductor y detalle por estudiante de un día.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::cache::SessionStore;
use crate::clients::TripGateway;
use crate::models::trip::{TripDetail, TripSummary};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct TripService {
    trips: Arc<dyn TripGateway>,
    session: SessionStore,
}

impl TripService {
    pub fn new(trips: Arc<dyn TripGateway>, session: SessionStore) -> Self {
        Self { trips, session }
    }

    pub async fn summaries(&self) -> AppResult<Vec<TripSummary>> {
        let driver_id = self.session.driver_id().await?;
        let summaries = self.trips.trip_summaries(driver_id).await?;
        info!("🚌 {} días de viaje para el conductor {}", summaries.len(), driver_id);
        Ok(summaries)
    }

    pub async fn details(&self, date: NaiveDate) -> AppResult<Vec<TripDetail>> {
        let driver_id = self.session.driver_id().await?;
        self.trips.trip_details(driver_id, date).await
    }
}

/// Filtra por la fecha tal como se muestra (`Jan 5, 2025`); vacío devuelve todo
pub fn search_summaries<'a>(summaries: &'a [TripSummary], query: &str) -> Vec<&'a TripSummary> {
    let needle = query.trim().to_lowercase();
    summaries
        .iter()
        .filter(|s| needle.is_empty() || s.formatted_date().to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(date: &str) -> TripSummary {
        TripSummary {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            morning_count: 2,
            afternoon_count: 1,
        }
    }

    #[test]
    fn test_search_by_formatted_date() {
        let summaries = vec![summary("2025-01-05"), summary("2025-01-15"), summary("2025-02-05")];

        assert_eq!(search_summaries(&summaries, "").len(), 3);
        assert_eq!(search_summaries(&summaries, "jan").len(), 2);
        let hits = search_summaries(&summaries, "Feb 5");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date, NaiveDate::from_ymd_opt(2025, 2, 5).unwrap());
    }
}
