//! Subcommand handlers.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use serde::Serialize;

use brixbar_client::{Client, NewReading, PlantReference, ReadingUpdate, ReadingsQuery};
use brixbar_gauge::{Gauge, GaugeConfig, Phase};

use crate::config::Config;
use crate::render::TerminalGauge;
use crate::{GaugeArgs, PlantsCommand, ReadingsCommand};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn client(cfg: &Config) -> anyhow::Result<Client> {
    Client::with_timeout(&cfg.api_base_url, cfg.request_timeout())
        .context("failed to build API client")
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Resolves gauge settings (flags, plant reference, latest reading, config)
/// and animates the gauge until it converges or Ctrl-C.
pub async fn gauge(cfg: &Config, args: GaugeArgs) -> anyhow::Result<()> {
    let (value, plant) = match (args.value, args.plant.as_deref()) {
        (Some(value), None) => (value, None),
        (value, plant_name) => {
            let api = client(cfg)?;
            let plant = match plant_name {
                Some(name) => Some(
                    api.get_plant(name)
                        .await
                        .with_context(|| format!("failed to load plant {name:?}"))?,
                ),
                None => None,
            };
            let value = match value {
                Some(value) => value,
                None => latest_value(&api, plant_name).await?,
            };
            (value, plant)
        }
    };

    let threshold = args
        .threshold
        .or(plant.as_ref().map(|p| p.healthy_brix_min))
        .unwrap_or(cfg.gauge.threshold);
    let label = args
        .label
        .or_else(|| args.plant.clone())
        .unwrap_or_else(|| "Brix".into());
    let config = GaugeConfig::new(
        value,
        threshold,
        args.max.unwrap_or(cfg.gauge.max_brix),
        label,
        args.bar_height.unwrap_or(cfg.gauge.bar_height),
    )
    .context("invalid gauge settings")?;

    animate(config, args.json).await?;

    if let Some(plant) = plant {
        print_plant_range(&plant, value);
    }
    Ok(())
}

/// Value of the newest reading, optionally for one plant.
///
/// Relies on the API listing readings newest first, so `limit=1` returns
/// the latest one.
async fn latest_value(api: &Client, plant: Option<&str>) -> anyhow::Result<f64> {
    let page = api
        .list_readings(&ReadingsQuery {
            plant_name: plant.map(str::to_owned),
            limit: Some(1),
            offset: None,
        })
        .await
        .context("failed to load latest reading")?;

    match page.readings.first() {
        Some(reading) => {
            tracing::debug!(id = %reading.id, value = reading.brix_value, "using latest reading");
            Ok(reading.brix_value)
        }
        None => bail!("no readings found; pass a value explicitly"),
    }
}

async fn animate(config: GaugeConfig, json: bool) -> anyhow::Result<()> {
    let gauge = Gauge::mount(config);
    let mut states = gauge.subscribe();
    let mut renderer = TerminalGauge::fit_terminal();
    let mut stdout = io::stdout();

    loop {
        let state = *states.borrow_and_update();
        let frame = gauge.frame_for(&state);
        if json {
            writeln!(stdout, "{}", serde_json::to_string(&frame)?)?;
        } else {
            renderer.draw(&mut stdout, &frame)?;
        }

        if state.phase == Phase::Converged {
            break;
        }

        tokio::select! {
            changed = states.changed() => changed.context("animator stopped unexpectedly")?,
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn print_plant_range(plant: &PlantReference, value: f64) {
    let verdict = if plant.is_healthy(value) {
        "within"
    } else {
        "outside"
    };
    println!(
        "{value:.1} is {verdict} the healthy range for {} ({}–{})",
        plant.plant_name, plant.healthy_brix_min, plant.healthy_brix_max
    );
}

pub async fn readings(cfg: &Config, command: ReadingsCommand) -> anyhow::Result<()> {
    let api = client(cfg)?;

    match command {
        ReadingsCommand::List {
            plant,
            limit,
            offset,
        } => {
            let page = api
                .list_readings(&ReadingsQuery {
                    plant_name: plant,
                    limit,
                    offset,
                })
                .await?;
            for r in &page.readings {
                println!(
                    "{:<38} {:<12} {:<20} {:>6.1}  {}",
                    r.id,
                    r.reading_date,
                    r.plant_name,
                    r.brix_value,
                    r.notes.as_deref().unwrap_or("")
                );
            }
            println!("{} of {} readings", page.readings.len(), page.count);
        }
        ReadingsCommand::Get { id } => print_json(&api.get_reading(&id).await?)?,
        ReadingsCommand::Create {
            plant,
            brix,
            date,
            notes,
        } => {
            let reading_date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive().format(DATE_FORMAT).to_string(),
            };
            let created = api
                .create_reading(&NewReading {
                    plant_name: plant,
                    brix_value: brix,
                    reading_date,
                    notes,
                })
                .await?;
            print_json(&created)?;
        }
        ReadingsCommand::Update {
            id,
            plant,
            brix,
            date,
            notes,
        } => {
            let update = ReadingUpdate {
                plant_name: plant,
                brix_value: brix,
                reading_date: date.as_deref().map(parse_date).transpose()?,
                notes,
            };
            if update.is_empty() {
                bail!("nothing to update; pass at least one of --plant, --brix, --date, --notes");
            }
            print_json(&api.update_reading(&id, &update).await?)?;
        }
        ReadingsCommand::Delete { id } => println!("{}", api.delete_reading(&id).await?),
    }
    Ok(())
}

/// Validates a `YYYY-MM-DD` date and returns it normalized.
fn parse_date(input: &str) -> anyhow::Result<String> {
    let date = NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date {input:?}, expected YYYY-MM-DD"))?;
    Ok(date.format(DATE_FORMAT).to_string())
}

pub async fn plants(cfg: &Config, command: PlantsCommand) -> anyhow::Result<()> {
    let api = client(cfg)?;

    match command {
        PlantsCommand::List => {
            for p in api.list_plants().await? {
                println!(
                    "{:<20} {:<12} {:>5.1}–{:<5.1} {}",
                    p.plant_name, p.category, p.healthy_brix_min, p.healthy_brix_max, p.description
                );
            }
        }
        PlantsCommand::Get { name } => print_json(&api.get_plant(&name).await?)?,
    }
    Ok(())
}

pub async fn stats(cfg: &Config, plant: Option<&str>) -> anyhow::Result<()> {
    let stats = client(cfg)?.stats(plant).await?;
    println!("readings: {}", stats.total_readings);
    println!("plants:   {}", stats.unique_plants);
    println!("average:  {:.2}", stats.average_brix);
    println!("min:      {:.2}", stats.min_brix);
    println!("max:      {:.2}", stats.max_brix);
    Ok(())
}

pub async fn health(cfg: &Config) -> anyhow::Result<()> {
    let health = client(cfg)?.health().await?;
    println!(
        "{} ({}) at {}",
        health.status, health.environment, health.timestamp
    );
    Ok(())
}

pub fn show_config(cfg: &Config, path: &Path, save: bool) -> anyhow::Result<()> {
    if save {
        cfg.save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("saved {}", path.display());
    }
    print_json(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_normalizes() {
        assert_eq!(parse_date("2024-06-01").unwrap(), "2024-06-01");
        assert_eq!(parse_date(" 2024-6-1 ").unwrap(), "2024-06-01");
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("01/06/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
