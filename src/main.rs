use afluencia::{load_monthly_ridership, load_station_shares, Estimator};
use anyhow::{Context, Result};
use std::env;
use std::io::{self, BufRead, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_MONTHLY_CSV: &str = "afluencia_mensual_predicha.csv";
const DEFAULT_SHARES_CSV: &str = "proporcion_estacion.csv";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) load the reference tables (fatal on failure) ─────────────
    let monthly_path =
        env::var("AFLUENCIA_MONTHLY_CSV").unwrap_or_else(|_| DEFAULT_MONTHLY_CSV.to_string());
    let shares_path =
        env::var("AFLUENCIA_SHARES_CSV").unwrap_or_else(|_| DEFAULT_SHARES_CSV.to_string());

    let months = load_monthly_ridership(&monthly_path)
        .with_context(|| format!("loading monthly ridership table from {monthly_path}"))?;
    let shares = load_station_shares(&shares_path)
        .with_context(|| format!("loading station shares table from {shares_path}"))?;
    info!(
        "loaded {} months and {} stations",
        months.len(),
        shares.len()
    );

    let estimator = Estimator::new(months, shares);

    // ─── 3) query loop ───────────────────────────────────────────────
    println!("Enter a month and a station, or `series <station>` for a projection.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("month (YYYY-MM): ");
        io::stdout().flush()?;
        let Some(month) = lines.next() else { break };
        let month = month?;

        if let Some(station) = month.trim().strip_prefix("series ") {
            let series = estimator.project_series(station);
            if series.is_empty() {
                println!("No station named {:?} in the data.", station.trim());
                continue;
            }
            for point in &series {
                println!("{}  {:.0}", point.month, point.estimated);
            }
            continue;
        }

        print!("station: ");
        io::stdout().flush()?;
        let Some(station) = lines.next() else { break };
        let station = station?;

        println!("{}", estimator.estimate(&month, &station));
    }

    info!("shutdown");
    Ok(())
}
