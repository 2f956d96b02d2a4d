//! `opennow search`: run one proximity search and print the result.

use chrono::Utc;
use opennow_core::{Amenity, AppConfig, Coordinate};
use opennow_overpass::MirrorClient;
use opennow_search::{
    NormalizedPoi, ProximitySearch, SearchOutcome, SearchRequest, SearchSettings, TzfResolver,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchArgs {
    pub lat: f64,
    pub lon: f64,
    pub radius: Option<u32>,
    pub amenity: Amenity,
    pub open_only: bool,
    pub json: bool,
}

/// Runs a search from the command line.
///
/// # Errors
///
/// Returns an error if the Overpass client cannot be built or the search
/// fails. Individual malformed elements are skipped, not reported.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs) -> anyhow::Result<()> {
    let client = MirrorClient::from_app_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build Overpass client: {e}"))?;
    let mirrors = client.endpoints().len();
    let settings = SearchSettings::from_app_config(config, args.amenity);
    let search = ProximitySearch::new(client, TzfResolver::new(), settings);

    let request = SearchRequest {
        center: Coordinate::new(args.lat, args.lon),
        radius_m: args.radius.unwrap_or(config.search_default_radius_m),
        open_only: args.open_only,
    };

    tracing::debug!(
        center = %request.center,
        radius_m = request.radius_m,
        amenity = %args.amenity,
        mirrors,
        "starting search"
    );
    let outcome = search.search(&request, Utc::now()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_table(args.amenity, &request, &outcome);
    }
    Ok(())
}

fn print_table(amenity: Amenity, request: &SearchRequest, outcome: &SearchOutcome) {
    if outcome.widened {
        println!(
            "nothing within {} m; widened to {} m",
            request.radius_m, outcome.radius_m
        );
    }

    if outcome.pois.is_empty() {
        println!(
            "no {amenity} found within {} m of {}",
            outcome.radius_m, request.center
        );
        return;
    }

    let header = format!("{:<9}{:>8}  {:<32}{:<16}HOURS", "STATUS", "DIST", "NAME", "PHONE");
    println!("{header}");
    for poi in &outcome.pois {
        println!("{}", format_row(poi));
    }
    println!(
        "{} shown, {} hidden by --open-only, {} skipped as malformed",
        outcome.pois.len(),
        outcome.filtered_out,
        outcome.dropped
    );
}

fn format_row(poi: &NormalizedPoi) -> String {
    let name = truncate(&poi.name, 30);
    format!(
        "{:<9}{:>6} m  {:<32}{:<16}{}",
        poi.status.to_string(),
        format!("{:.0}", poi.distance_m),
        name,
        poi.phone.as_deref().unwrap_or("-"),
        poi.opening_hours_raw.as_deref().unwrap_or("-"),
    )
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        format!("{}...", s.chars().take(max_chars - 3).collect::<String>())
    } else {
        s.to_string()
    }
}
