use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crime_dashboard::data::model::Record;

const PROVINCES: [(&str, f64); 8] = [
    // (name, population in thousands)
    ("Buenos Aires", 17_500.0),
    ("Ciudad Autónoma de Buenos Aires", 3_100.0),
    ("Córdoba", 3_800.0),
    ("Santa Fe", 3_500.0),
    ("Mendoza", 2_000.0),
    ("Salta", 1_400.0),
    ("Chaco", 1_200.0),
    ("Tierra del Fuego", 180.0),
];

const CATEGORIES: [(&str, f64); 6] = [
    // (name, baseline incidents per 100,000)
    ("Robos (excluye los agravados por el resultado de lesiones y/o muertes)", 450.0),
    ("Hurtos", 520.0),
    ("Lesiones dolosas", 260.0),
    ("Amenazas", 310.0),
    ("Homicidios dolosos", 5.0),
    ("Estafas y defraudaciones", 95.0),
];

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic SNIC-shaped provincial crime CSV")]
struct Cli {
    /// Output file.
    #[arg(long, default_value = "sample_snic.csv")]
    output: PathBuf,

    /// First year to generate.
    #[arg(long, default_value_t = 2000)]
    from: i32,

    /// Last year to generate.
    #[arg(long, default_value_t = 2023)]
    to: i32,

    /// PRNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform factor in `[1 - spread, 1 + spread]`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

fn generate_row(
    rng: &mut SimpleRng,
    (province, population_k): (&str, f64),
    (category, baseline): (&str, f64),
    year: i32,
) -> Record {
    let rate = baseline * rng.jitter(0.4);
    let incidents = (rate * population_k / 100.0).round() as u64;

    // Victim breakdowns are missing for roughly a third of the rows.
    let (male, female, undetermined) = if rng.next_f64() < 0.35 {
        (None, None, None)
    } else {
        let male = (incidents as f64 * 0.55 * rng.jitter(0.2)).round() as u64;
        let female = (incidents as f64 * 0.35 * rng.jitter(0.2)).round() as u64;
        let undetermined = incidents.saturating_sub(male + female);
        (Some(male), Some(female), Some(undetermined))
    };

    Record {
        region: province.to_string(),
        year,
        category: category.to_string(),
        incidents: Some(incidents),
        rate: Some((rate * 100.0).round() / 100.0),
        victims_male: male,
        victims_female: female,
        victims_undetermined: undetermined,
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut rng = SimpleRng::new(cli.seed);

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    let mut rows = 0;
    for province in PROVINCES {
        for year in cli.from..=cli.to {
            for category in CATEGORIES {
                writer.serialize(generate_row(&mut rng, province, category, year))?;
                rows += 1;
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", cli.output.display());
    Ok(())
}
