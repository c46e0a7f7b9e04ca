use chrono::{Datelike, Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookline::api::rest::RestBookingApi;
use bookline::api::BookingApi;
use bookline::config::AppConfig;
use bookline::db::{self, queries};
use bookline::errors::AppError;
use bookline::models::service::format_cents;
use bookline::models::WeekSchedule;
use bookline::services::{ledger, slots, tenant};

#[derive(Parser, Debug)]
#[command(name = "bookline", version, about = "Appointment booking client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tenants and bookable services
    Catalog,
    /// Show a tenant's service categories
    Categories { tenant_id: String },
    /// Show a tenant's weekly working hours
    Hours { tenant_id: String },
    /// List bookable time slots for a date
    Slots { tenant_id: String, date: NaiveDate },
    /// List your appointments grouped by status
    Appointments,
    /// Cancel an appointment by id
    Cancel { appointment_id: String },
    /// Show your profile, optionally updating fields first
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Show the terms and conditions
    Terms,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let conn = db::init_db(&config.database_url)?;
    let api = RestBookingApi::new(config.api_base_url.clone(), config.site_domain.clone());

    let result = match cli.command {
        Command::Catalog => show_catalog(&api).await,
        Command::Categories { tenant_id } => show_categories(&api, &tenant_id).await,
        Command::Hours { tenant_id } => show_hours(&conn, &api, &config, &tenant_id).await,
        Command::Slots { tenant_id, date } => {
            show_slots(&conn, &api, &config, &tenant_id, date).await
        }
        Command::Appointments => show_appointments(&conn, &api).await,
        Command::Cancel { appointment_id } => cancel(&conn, &api, &appointment_id).await,
        Command::Profile { name, email } => show_profile(&conn, &api, name, email).await,
        Command::Terms => show_terms(&api).await,
    };

    if let Err(err) = result {
        for message in err.field_messages() {
            eprintln!("error: {message}");
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn show_catalog(api: &dyn BookingApi) -> Result<(), AppError> {
    let home = api.fetch_home().await?;
    if let Some(business) = &home.business {
        println!("{}", business.name);
    }
    for t in &home.tenants {
        println!("tenant {}  {}", t.id, t.name);
    }
    let catalog = tenant::build_catalog(&home.categories, &home.services);
    for service in catalog.visible_services(bookline::models::ALL_CATEGORIES) {
        println!(
            "  {}  {} ({} minutes, {})",
            service.id,
            service.name,
            service.duration_minutes,
            format_cents(service.price_cents)
        );
    }
    Ok(())
}

async fn show_categories(api: &dyn BookingApi, tenant_id: &str) -> Result<(), AppError> {
    let categories = api.fetch_tenant_categories(tenant_id).await?;
    if categories.is_empty() {
        println!("no categories on file");
    }
    for category in categories {
        println!("{}  {}", category.id, category.name);
    }
    Ok(())
}

async fn load_schedule(
    conn: &rusqlite::Connection,
    api: &dyn BookingApi,
    config: &AppConfig,
    tenant_id: &str,
) -> Result<WeekSchedule, AppError> {
    let info = tenant::load_business_info(
        conn,
        api,
        tenant_id,
        Duration::minutes(config.hours_cache_max_age_minutes),
    )
    .await?;
    Ok(WeekSchedule::from_raw(&info.working_hours))
}

async fn show_hours(
    conn: &rusqlite::Connection,
    api: &dyn BookingApi,
    config: &AppConfig,
    tenant_id: &str,
) -> Result<(), AppError> {
    let schedule = load_schedule(conn, api, config, tenant_id).await?;
    if schedule.entries().is_empty() {
        println!("no working hours on file");
    }
    for hours in schedule.entries() {
        println!(
            "{:9} {} - {}",
            hours.day.to_string(),
            hours.start.format("%H:%M"),
            hours.end.format("%H:%M")
        );
    }
    Ok(())
}

async fn show_slots(
    conn: &rusqlite::Connection,
    api: &dyn BookingApi,
    config: &AppConfig,
    tenant_id: &str,
    date: NaiveDate,
) -> Result<(), AppError> {
    let schedule = load_schedule(conn, api, config, tenant_id).await?;
    let labels: Vec<String> = slots::slots_for_day(&schedule, date.weekday()).collect();
    if labels.is_empty() {
        println!("{date}: closed");
        return Ok(());
    }
    println!("{date}:");
    for label in labels {
        println!("  {label}");
    }
    Ok(())
}

async fn show_appointments(
    conn: &rusqlite::Connection,
    api: &dyn BookingApi,
) -> Result<(), AppError> {
    let token = queries::get_session_token(conn)?.ok_or(AppError::AuthRequired)?;
    let appointments = ledger::fetch(api, &token).await?;
    let buckets = ledger::categorize(appointments, Utc::now().naive_utc().date());

    for (label, bucket) in [
        ("today", &buckets.today),
        ("upcoming", &buckets.future),
        ("past", &buckets.past),
        ("canceled", &buckets.canceled),
    ] {
        if bucket.is_empty() {
            continue;
        }
        println!("{label}:");
        for appt in bucket {
            let services: Vec<&str> = appt.services.iter().map(|s| s.name.as_str()).collect();
            println!(
                "  {}  {}  {}  {}",
                appt.id,
                appt.datetime.format("%Y-%m-%d %H:%M"),
                services.join(", "),
                appt.display_total()
            );
        }
    }
    Ok(())
}

async fn cancel(
    conn: &rusqlite::Connection,
    api: &dyn BookingApi,
    appointment_id: &str,
) -> Result<(), AppError> {
    let token = queries::get_session_token(conn)?.ok_or(AppError::AuthRequired)?;
    let remaining = ledger::cancel_and_refresh(api, &token, appointment_id).await?;
    println!(
        "canceled {appointment_id}; {} appointments on file",
        remaining.len()
    );
    Ok(())
}

async fn show_profile(
    conn: &rusqlite::Connection,
    api: &dyn BookingApi,
    name: Option<String>,
    email: Option<String>,
) -> Result<(), AppError> {
    let token = queries::get_session_token(conn)?.ok_or(AppError::AuthRequired)?;
    let mut profile = api.fetch_profile(&token).await?;

    if name.is_some() || email.is_some() {
        if let Some(name) = name {
            profile.name = name;
        }
        if email.is_some() {
            profile.email = email;
        }
        profile = api.update_profile(&token, &profile).await?;
        println!("profile updated");
    }

    println!("name:  {}", profile.name);
    println!("phone: {}", profile.phone);
    if let Some(email) = &profile.email {
        println!("email: {email}");
    }
    Ok(())
}

async fn show_terms(api: &dyn BookingApi) -> Result<(), AppError> {
    let terms = api.fetch_terms().await?;
    if let Some(title) = &terms.title {
        println!("{title}");
        println!();
    }
    println!("{}", terms.content);
    Ok(())
}
