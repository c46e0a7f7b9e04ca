use crate::errors::AppError;
use crate::models::Catalog;

/// The in-progress service selection. Ids keep insertion order and stay
/// unique; totals are re-derived from the catalog on every change, so a
/// service that vanished in a catalog refresh silently falls out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionCart {
    service_ids: Vec<String>,
    total_duration_minutes: u32,
    total_cost_cents: i64,
}

impl SelectionCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service_ids(&self) -> &[String] {
        &self.service_ids
    }

    pub fn len(&self) -> usize {
        self.service_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.service_ids.is_empty()
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.service_ids.iter().any(|id| id == service_id)
    }

    pub fn total_duration_minutes(&self) -> u32 {
        self.total_duration_minutes
    }

    pub fn total_cost_cents(&self) -> i64 {
        self.total_cost_cents
    }

    /// Adds a service. Adding an id already present is a no-op.
    pub fn add(&mut self, service_id: &str, catalog: &Catalog) {
        if !self.contains(service_id) {
            self.service_ids.push(service_id.to_string());
        }
        self.recompute(catalog);
    }

    /// Removes a service. The booking path always keeps at least one service,
    /// so removing the last remaining id is rejected and the cart is left
    /// unchanged. Removing an absent id is a no-op.
    pub fn remove(&mut self, service_id: &str, catalog: &Catalog) -> Result<(), AppError> {
        if !self.contains(service_id) {
            return Ok(());
        }
        if self.service_ids.len() == 1 {
            return Err(AppError::MinimumSelection);
        }
        self.service_ids.retain(|id| id != service_id);
        self.recompute(catalog);
        Ok(())
    }

    /// Re-derives the totals from the current catalog, dropping ids the
    /// catalog no longer knows.
    pub fn recompute(&mut self, catalog: &Catalog) {
        self.service_ids.retain(|id| catalog.service(id).is_some());
        self.total_duration_minutes = self
            .service_ids
            .iter()
            .filter_map(|id| catalog.service(id))
            .map(|s| s.duration_minutes)
            .sum();
        self.total_cost_cents = self
            .service_ids
            .iter()
            .filter_map(|id| catalog.service(id))
            .map(|s| s.price_cents)
            .sum();
    }

    pub fn clear(&mut self) {
        self.service_ids.clear();
        self.total_duration_minutes = 0;
        self.total_cost_cents = 0;
    }

    /// "1hr 15min" style label for the running total.
    pub fn display_duration(&self) -> String {
        let hours = self.total_duration_minutes / 60;
        let minutes = self.total_duration_minutes % 60;
        format!("{hours}hr {minutes}min")
    }
}
