#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

use std::{collections::HashSet, error::Error, ops::RangeInclusive};

use plotters::prelude::*;
use primehash::{
    ChainedHashMap, CharSumHash, HashTable, OpenAddressHashMap, WeightedCharSumHash,
};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Number of distinct random keys inserted into every table
const KEY_COUNT: usize = 5_000;
// Take a sample after this many insertions
const SAMPLE_EVERY: usize = 250;
const INITIAL_CAPACITY: usize = 53;
const KEY_LENGTH: RangeInclusive<usize> = 3..=10;

const EMPTY_RATIO_PNG: &str = "empty_bucket_ratio.png";
const LOAD_PNG: &str = "table_load.png";
const CAPACITY_PNG: &str = "table_capacity.png";

const COLORS: [RGBColor; 4] = [
    RGBColor(220, 50, 50),  // red
    RGBColor(50, 90, 220),  // blue
    RGBColor(50, 180, 50),  // green
    RGBColor(180, 50, 180), // magenta
];

/// One observation of a table after a batch of insertions
#[derive(Debug, Clone, Copy)]
struct Sample {
    keys: usize,
    empty_ratio: f64,
    load: f64,
    capacity: usize,
}

/// Samples recorded for one table / hash function combination
type Run = (&'static str, Vec<Sample>);

fn random_keys(count: usize) -> Vec<String> {
    let mut rng = rand::rng();
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);

    while keys.len() < count {
        let length = rng.random_range(KEY_LENGTH);
        let key: String = (0..length).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect();
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }
    keys
}

fn record<T: HashTable<usize>>(mut table: T, keys: &[String]) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(keys.len() / SAMPLE_EVERY);

    for (i, key) in keys.iter().enumerate() {
        table.put(key.clone(), i);

        let inserted = i + 1;
        if inserted % SAMPLE_EVERY == 0 {
            samples.push(Sample {
                keys: inserted,
                empty_ratio: table.empty_buckets() as f64 / table.capacity() as f64,
                load: table.table_load(),
                capacity: table.capacity(),
            });
        }
    }
    samples
}

fn series(runs: &[Run], metric: fn(&Sample) -> f64) -> Vec<(&'static str, Vec<(usize, f64)>)> {
    runs.iter()
        .map(|(name, samples)| (*name, samples.iter().map(|s| (s.keys, metric(s))).collect()))
        .collect()
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    series: &[(&'static str, Vec<(usize, f64)>)],
) -> Result<(), Box<dyn Error>> {
    let font_family = "sans-serif";

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = series.iter().flat_map(|(_, points)| points.iter().map(|&(x, _)| x)).max().unwrap_or(1);
    let max_y = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|&(_, y)| y))
        .fold(0.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..max_x, 0.0..max_y.max(f64::EPSILON))?;

    chart
        .configure_mesh()
        .x_desc("Keys inserted")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (idx, (name, points)) in series.iter().enumerate() {
        let color = COLORS[idx % COLORS.len()];
        let line_style = ShapeStyle::from(&color).stroke_width(2);

        chart
            .draw_series(LineSeries::new(points.iter().copied(), line_style))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let keys = random_keys(KEY_COUNT);
    info!(keys = keys.len(), "generated random keys");

    let runs: [Run; 4] = [
        ("Chained / char sum", record(ChainedHashMap::new(INITIAL_CAPACITY, CharSumHash), &keys)),
        ("Chained / weighted", record(ChainedHashMap::new(INITIAL_CAPACITY, WeightedCharSumHash), &keys)),
        (
            "Open addressing / char sum",
            record(OpenAddressHashMap::new(INITIAL_CAPACITY, CharSumHash), &keys),
        ),
        (
            "Open addressing / weighted",
            record(OpenAddressHashMap::new(INITIAL_CAPACITY, WeightedCharSumHash), &keys),
        ),
    ];

    for (name, samples) in &runs {
        for sample in samples {
            info!(
                table = *name,
                keys = sample.keys,
                load = sample.load,
                empty_ratio = sample.empty_ratio,
                capacity = sample.capacity,
                "sample"
            );
        }
    }

    draw_chart(
        EMPTY_RATIO_PNG,
        "Share of Empty Buckets",
        "Empty buckets / capacity",
        &series(&runs, |s| s.empty_ratio),
    )?;
    draw_chart(LOAD_PNG, "Table Load Factor", "Load factor", &series(&runs, |s| s.load))?;
    draw_chart(CAPACITY_PNG, "Table Capacity", "Buckets", &series(&runs, |s| s.capacity as f64))?;

    info!(files = ?[EMPTY_RATIO_PNG, LOAD_PNG, CAPACITY_PNG], "wrote plots");
    Ok(())
}
