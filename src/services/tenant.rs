use chrono::Duration;
use rusqlite::Connection;

use crate::api::{BookingApi, BusinessInfo, RawCategory, RawService};
use crate::db::queries;
use crate::errors::AppError;
use crate::models::service::{parse_duration_minutes, parse_price_cents};
use crate::models::{Catalog, Category, Service, WeekSchedule};

/// Converts raw server categories/services into the typed catalog. The
/// textual duration/price conversion is total, so this never fails.
pub fn build_catalog(categories: &[RawCategory], services: &[RawService]) -> Catalog {
    Catalog {
        categories: categories
            .iter()
            .map(|c| Category {
                id: c.id.clone(),
                name: c.name.clone(),
            })
            .collect(),
        services: services
            .iter()
            .map(|s| Service {
                id: s.id.clone(),
                name: s.name.clone(),
                duration_minutes: parse_duration_minutes(&s.duration),
                price_cents: parse_price_cents(&s.price),
                category_id: s.category_id.clone(),
            })
            .collect(),
    }
}

/// The active tenant and everything scoped to it. Fetch results carry the
/// tenant id they were requested for; a late response for a previously
/// selected tenant is ignored rather than overwriting the current one.
#[derive(Debug, Clone, Default)]
pub struct TenantContext {
    tenant_id: String,
    tenant_name: String,
    catalog: Catalog,
    schedule: WeekSchedule,
}

impl TenantContext {
    pub fn new(tenant_id: impl Into<String>, tenant_name: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            tenant_name: tenant_name.into(),
            catalog: Catalog::default(),
            schedule: WeekSchedule::default(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn tenant_name(&self) -> &str {
        &self.tenant_name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn schedule(&self) -> &WeekSchedule {
        &self.schedule
    }

    /// Applies a catalog fetched for `fetched_for`. Returns false (and leaves
    /// state untouched) when the tenant has changed since the fetch started.
    pub fn apply_catalog(&mut self, fetched_for: &str, catalog: Catalog) -> bool {
        if fetched_for != self.tenant_id {
            tracing::warn!(
                "ignoring catalog fetched for stale tenant {fetched_for} (current: {})",
                self.tenant_id
            );
            return false;
        }
        self.catalog = catalog;
        true
    }

    pub fn apply_schedule(&mut self, fetched_for: &str, schedule: WeekSchedule) -> bool {
        if fetched_for != self.tenant_id {
            tracing::warn!(
                "ignoring working hours fetched for stale tenant {fetched_for} (current: {})",
                self.tenant_id
            );
            return false;
        }
        self.schedule = schedule;
        true
    }
}

/// Read-through load of the per-tenant business info blob: cache hit within
/// `max_age` wins, otherwise fetch and re-cache.
pub async fn load_business_info(
    conn: &Connection,
    api: &dyn BookingApi,
    tenant_id: &str,
    max_age: Duration,
) -> Result<BusinessInfo, AppError> {
    if let Some(cached) = queries::get_cached_business_info(conn, tenant_id, max_age)? {
        tracing::debug!("business info cache hit for tenant {tenant_id}");
        return Ok(cached);
    }

    let info = api.fetch_business_info(tenant_id).await?;
    queries::cache_business_info(conn, tenant_id, &info)?;
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_service(id: &str, duration: &str, price: &str) -> RawService {
        RawService {
            id: id.to_string(),
            name: format!("service {id}"),
            duration: duration.to_string(),
            price: price.to_string(),
            category_id: "c1".to_string(),
        }
    }

    #[test]
    fn test_build_catalog_parses_duration_and_price() {
        let catalog = build_catalog(
            &[RawCategory {
                id: "c1".to_string(),
                name: "Hair".to_string(),
            }],
            &[
                raw_service("s1", "30 minutes", "$20.00"),
                raw_service("s2", "oops", "n/a"),
            ],
        );
        assert_eq!(catalog.service("s1").unwrap().duration_minutes, 30);
        assert_eq!(catalog.service("s1").unwrap().price_cents, 2000);
        // Malformed input parses to zero rather than failing.
        assert_eq!(catalog.service("s2").unwrap().duration_minutes, 0);
        assert_eq!(catalog.service("s2").unwrap().price_cents, 0);
    }

    #[test]
    fn test_stale_tenant_fetch_is_ignored() {
        let mut ctx = TenantContext::new("t2", "New Salon");
        let catalog = build_catalog(&[], &[raw_service("s1", "30 minutes", "$20.00")]);

        assert!(!ctx.apply_catalog("t1", catalog.clone()));
        assert!(ctx.catalog().services.is_empty());

        assert!(ctx.apply_catalog("t2", catalog));
        assert_eq!(ctx.catalog().services.len(), 1);
    }
}
