use std::sync::Arc;

use catalog::{load_buildings, sample_buildings};
use clap::Parser;
use geography::GeographyStore;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::config::Args;
use viewer::svg::render_svg;
use viewer::viewer::{ViewEvent, Viewer};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main(args: Args) -> Result<(), String> {
    let dataset = match &args.buildings {
        Some(path) => load_buildings(path).map_err(|e| format!("{}: {e}", path.display()))?,
        None => sample_buildings(),
    };
    info!(buildings = dataset.len(), projection = %args.projection, "starting");

    let mut viewer = Viewer::new(dataset, args.viewer_options());

    // Markers draw while the boundaries are still in flight.
    let store = Arc::new(GeographyStore::new(args.sources()));
    let loader = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.load().await }
    });

    if let Some(ranges) = viewer.ranges().and_then(|base| args.filter_ranges(base)) {
        viewer.dispatch(ViewEvent::FilterChanged(ranges));
    }
    for event in args.script() {
        viewer.dispatch(event);
        tokio::task::yield_now().await;
    }

    let geography = loader.await.map_err(|e| format!("geography loader: {e}"))?;
    info!(origin = ?geography.origin, "geography ready");
    viewer.dispatch(ViewEvent::GeographyLoaded(geography));

    let legend = viewer.range_labels().unwrap_or_default();
    let svg = render_svg(&viewer.snapshot(), viewer.tooltip().as_ref(), &legend);
    match &args.output {
        Some(path) => std::fs::write(path, svg).map_err(|e| format!("{}: {e}", path.display()))?,
        None => print!("{svg}"),
    }
    Ok(())
}
