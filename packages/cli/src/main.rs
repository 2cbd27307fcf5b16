#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the nabe map geometry core.
//!
//! Loads a neighborhood boundary file and runs one of the core
//! operations against it: listing regions with their centroids and
//! colors, resolving a coordinate, clustering labels for a viewport, or
//! assigning and persisting colors.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nabe_map_cli_utils::{BoundaryArgs, PointArgs};
use nabe_map_cluster::{ClusterConfig, Viewport};
use nabe_map_color::ColorAssigner;
use nabe_map_neighborhood::{load_places, load_regions};
use nabe_map_neighborhood_models::Region;
use nabe_map_spatial::RegionIndex;

#[derive(Parser)]
#[command(name = "nabe_map", about = "Neighborhood map geometry tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every neighborhood with its centroid and color
    Regions {
        #[command(flatten)]
        boundaries: BoundaryArgs,
    },
    /// Find the neighborhood containing a coordinate
    Locate {
        #[command(flatten)]
        boundaries: BoundaryArgs,
        #[command(flatten)]
        point: PointArgs,
    },
    /// Print the labels to draw for a viewport, clustering when zoomed out
    Cluster {
        #[command(flatten)]
        boundaries: BoundaryArgs,
        #[command(flatten)]
        center: PointArgs,
        /// Visible latitude span in degrees
        #[arg(long)]
        span: f64,
        /// JSON object of neighborhood name to list of places
        #[arg(long)]
        places: Option<PathBuf>,
        /// TOML file with `zoom_threshold` / `distance_scale`
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Assign colors to every neighborhood and persist them
    Colors {
        #[command(flatten)]
        boundaries: BoundaryArgs,
        /// JSON file backing the color cache
        #[arg(long, default_value = "data/colors.json")]
        cache: PathBuf,
    },
}

fn load(args: &BoundaryArgs) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
    Ok(load_regions(&args.boundaries, &args.field_mapping())?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    nabe_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let lines = match cli.command {
        Commands::Regions { boundaries } => {
            let regions = load(&boundaries)?;
            commands::describe_regions(&regions, &ColorAssigner::detached())
        }
        Commands::Locate { boundaries, point } => {
            let index = RegionIndex::new(load(&boundaries)?);
            vec![commands::locate(&index, point.lat_lng())]
        }
        Commands::Cluster {
            boundaries,
            center,
            span,
            places,
            config,
        } => {
            let regions = load(&boundaries)?;
            let places = places.as_deref().map(load_places).transpose()?;
            let config = match config {
                Some(path) => ClusterConfig::load(&path)?,
                None => ClusterConfig::default(),
            }
            .with_env_overrides();
            let viewport = Viewport {
                center: center.lat_lng(),
                latitude_span: span,
            };
            commands::cluster_labels(&regions, config, &viewport, places.as_ref())
        }
        Commands::Colors { boundaries, cache } => {
            let regions = load(&boundaries)?;
            commands::assign_colors(&regions, &cache).await
        }
    };

    for line in lines {
        println!("{line}");
    }

    Ok(())
}
