//! citypair — smallest end-to-end demo of the d2d routing engine.
//!
//! Seeds an in-memory store with a two-city fixture (Boston ↔ New York:
//! one flight, one bus, plus a metro hop to a downtown hotel), then plans
//! a door-to-door itinerary from downtown Boston to a hotel near New York
//! and prints the winning legs.
//!
//! Run with `RUST_LOG=debug` to watch the search counters.

use std::io::Cursor;

use anyhow::Result;

use d2d_core::time::parse_stamp;
use d2d_places::FixtureGeocoder;
use d2d_search::{Planner, SearchParams};
use d2d_store::Store;
use d2d_store::seed::{seed_areas, seed_edges, seed_nodes, seed_offers};

// ── Fixture CSVs ──────────────────────────────────────────────────────────────

const AREAS_CSV: &str = "\
id,name,kind,country,center_lat,center_lon,radius_km,parent_id
1,Boston,city,US,42.3601,-71.0589,15.0,
2,New York,city,US,40.7128,-74.0060,25.0,
";

const NODES_CSV: &str = "\
id,external_ref,name,kind,area_id,lat,lon,is_hub,mct_air_ground_min,mct_ground_air_min,mct_any_min,country,timezone
1,IATA:BOS,Logan Airport,airport,1,42.3656,-71.0096,1,45,90,15,US,America/New_York
2,,South Station,bus_terminal,1,42.3519,-71.0552,0,0,0,10,US,America/New_York
3,IATA:JFK,JFK Airport,airport,2,40.6413,-73.7781,1,45,90,15,US,America/New_York
4,,Port Authority,bus_terminal,2,40.7570,-73.9910,0,0,0,10,US,America/New_York
5,,Midtown Hotel,hotel,2,40.7589,-73.9851,0,0,0,0,US,America/New_York
";

const EDGES_CSV: &str = "\
id,from_node,to_node,mode,is_transfer,carrier_code,service_code,distance_km,duration_min,mct_override_min,co_located,structure
10,1,3,flight,0,B6,B6-917,300.0,75,,0,static
11,2,4,bus,0,FLIX,N2025,346.0,260,,0,static
12,4,5,metro,1,MTA,A,1.2,9,,0,static
";

const OFFERS_CSV: &str = "\
id,edge_id,departure_time_utc,arrival_time_utc,price_total,currency,source_type,provider,is_static,retrieved_at_utc,validity_window_hrs,ttl_hrs,is_active
100,10,2025-11-15T13:00:00Z,2025-11-15T14:15:00Z,118.00,USD,api_live,tequila,0,2025-11-14T09:00:00Z,24,6,1
101,11,2025-11-15T12:30:00Z,2025-11-15T16:50:00Z,25.00,USD,api_live,flixbus,0,2025-11-14T09:00:00Z,24,6,1
102,12,2025-11-15T17:00:00Z,2025-11-15T17:09:00Z,2.90,USD,manual_static,seed,1,2025-11-01T00:00:00Z,8760,720,1
";

fn main() -> Result<()> {
    env_logger::init();

    let store = Store::open_in_memory()?;
    seed_areas(&store, Cursor::new(AREAS_CSV))?;
    seed_nodes(&store, Cursor::new(NODES_CSV))?;
    seed_edges(&store, Cursor::new(EDGES_CSV))?;
    seed_offers(&store, Cursor::new(OFFERS_CSV))?;

    let geocoder = FixtureGeocoder::new();
    let planner = Planner::new(&store, &geocoder);

    let departure = parse_stamp("2025-11-15T10:00:00Z")?;
    let bundle = planner.plan_at(
        "Boston",
        "hotel near New York",
        &SearchParams::default(),
        departure,
    )?;

    println!(
        "{} → {}  [{}]",
        bundle.origin_spec_raw, bundle.dest_spec_raw, bundle.status
    );
    for (i, leg) in bundle.legs.iter().enumerate() {
        println!(
            "  {}. {:<9} {:>6} → {:>6}  {:>4} min  ${:>7.2}{}",
            i + 1,
            leg.mode.to_string(),
            leg.from_node_id,
            leg.to_node_id,
            leg.duration_min,
            leg.price,
            if leg.is_transfer { "  (transfer)" } else { "" },
        );
    }
    println!(
        "total: ${:.2}, {} min, {} transfer(s), generalized cost {:.2}",
        bundle.price_total,
        bundle.duration_min,
        bundle.num_transfers,
        bundle.generalized_cost.unwrap_or(f64::NAN),
    );

    Ok(())
}
