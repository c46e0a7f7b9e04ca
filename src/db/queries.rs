use chrono::{Duration, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::api::BusinessInfo;
use crate::models::GuestIdentity;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now_string() -> String {
    Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

// ── Session ──

pub fn set_session_token(conn: &Connection, token: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO session (id, access_token, created_at) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET access_token = excluded.access_token,
                                       created_at = excluded.created_at",
        params![token, now_string()],
    )?;
    Ok(())
}

pub fn get_session_token(conn: &Connection) -> anyhow::Result<Option<String>> {
    let token = conn
        .query_row("SELECT access_token FROM session WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(token)
}

pub fn clear_session(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("DELETE FROM session", [])?;
    Ok(())
}

// ── Guest identity ──

pub fn save_guest_identity(conn: &Connection, guest: &GuestIdentity) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO guest_identity (id, name, phone, email, created_at) VALUES (1, ?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET name = excluded.name,
                                       phone = excluded.phone,
                                       email = excluded.email,
                                       created_at = excluded.created_at",
        params![guest.name, guest.phone, guest.email, now_string()],
    )?;
    Ok(())
}

pub fn get_guest_identity(conn: &Connection) -> anyhow::Result<Option<GuestIdentity>> {
    let guest = conn
        .query_row(
            "SELECT name, phone, email FROM guest_identity WHERE id = 1",
            [],
            |row| {
                Ok(GuestIdentity {
                    name: row.get(0)?,
                    phone: row.get(1)?,
                    email: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(guest)
}

pub fn clear_guest_identity(conn: &Connection) -> anyhow::Result<()> {
    conn.execute("DELETE FROM guest_identity", [])?;
    Ok(())
}

// ── Per-tenant business info cache ──

pub fn cache_business_info(
    conn: &Connection,
    tenant_id: &str,
    info: &BusinessInfo,
) -> anyhow::Result<()> {
    let payload = serde_json::to_string(info)?;
    conn.execute(
        "INSERT INTO hours_cache (tenant_id, payload, fetched_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(tenant_id) DO UPDATE SET payload = excluded.payload,
                                              fetched_at = excluded.fetched_at",
        params![tenant_id, payload, now_string()],
    )?;
    Ok(())
}

/// Returns the cached blob for a tenant unless it is older than `max_age`.
/// Stale or unreadable entries count as a miss.
pub fn get_cached_business_info(
    conn: &Connection,
    tenant_id: &str,
    max_age: Duration,
) -> anyhow::Result<Option<BusinessInfo>> {
    let row: Option<(String, String)> = conn
        .query_row(
            "SELECT payload, fetched_at FROM hours_cache WHERE tenant_id = ?1",
            params![tenant_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let (payload, fetched_at_str) = match row {
        Some(row) => row,
        None => return Ok(None),
    };

    let fetched_at = NaiveDateTime::parse_from_str(&fetched_at_str, TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| Utc::now().naive_utc() - max_age - Duration::seconds(1));
    if Utc::now().naive_utc() - fetched_at > max_age {
        return Ok(None);
    }

    match serde_json::from_str(&payload) {
        Ok(info) => Ok(Some(info)),
        Err(e) => {
            tracing::warn!("discarding unreadable cached business info for {tenant_id}: {e}");
            Ok(None)
        }
    }
}

pub fn invalidate_business_info(conn: &Connection, tenant_id: &str) -> anyhow::Result<()> {
    conn.execute(
        "DELETE FROM hours_cache WHERE tenant_id = ?1",
        params![tenant_id],
    )?;
    Ok(())
}
