use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use catalog_lens::data::model::{CatalogRow, ContentType};

const COUNTRIES: [&str; 10] = [
    "United States",
    "India",
    "United Kingdom",
    "Japan",
    "South Korea",
    "Canada",
    "Spain",
    "France",
    "Mexico",
    "Egypt",
];

const MOVIE_GENRES: [&str; 8] = [
    "Dramas",
    "Comedies",
    "Action & Adventure",
    "Documentaries",
    "International Movies",
    "Thrillers",
    "Romantic Movies",
    "Horror Movies",
];

const SHOW_GENRES: [&str; 6] = [
    "International TV Shows",
    "TV Dramas",
    "TV Comedies",
    "Crime TV Shows",
    "Kids' TV",
    "Docuseries",
];

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Skewed towards index 0 so a few entries dominate the counts.
    fn skewed(&mut self, n: usize) -> usize {
        let u = self.next_f64();
        ((u * u) * n as f64) as usize % n
    }

    /// `k` distinct picks from `pool`, joined with ", ".
    fn pick_list(&mut self, pool: &[&str], k: usize) -> String {
        let mut picked: Vec<&str> = Vec::with_capacity(k);
        while picked.len() < k.min(pool.len()) {
            let candidate = pool[self.skewed(pool.len())];
            if !picked.contains(&candidate) {
                picked.push(candidate);
            }
        }
        picked.join(", ")
    }
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<CatalogRow> {
    (0..n)
        .map(|i| {
            let content_type = if rng.next_f64() < 0.7 {
                ContentType::Movie
            } else {
                ContentType::TvShow
            };

            // Most titles are recent, with a long tail back to the 1940s.
            let age = (rng.next_f64().powi(4) * 80.0) as i64;
            let release_year = 2021 - age;

            let country = if rng.next_f64() < 0.1 {
                None
            } else {
                let k = 1 + usize::from(rng.next_f64() < 0.2);
                Some(rng.pick_list(&COUNTRIES, k))
            };

            let pool: &[&str] = match content_type {
                ContentType::Movie => &MOVIE_GENRES,
                ContentType::TvShow => &SHOW_GENRES,
            };
            let n_genres = 1 + rng.below(3);
            let listed_in = rng.pick_list(pool, n_genres);

            let ratings = ["TV-MA", "TV-14", "PG-13", "R", "TV-PG"];
            let mut rating = Some(ratings[rng.below(ratings.len())].to_string());
            let duration = match content_type {
                ContentType::Movie => {
                    let minutes = 70 + rng.below(90);
                    // Same quirk as the public dataset: a few movies carry
                    // their runtime in the rating column.
                    if i % 997 == 13 {
                        rating = Some(format!("{minutes} min"));
                        None
                    } else {
                        Some(format!("{minutes} min"))
                    }
                }
                ContentType::TvShow => {
                    let seasons = 1 + rng.skewed(6);
                    Some(if seasons == 1 {
                        "1 Season".to_string()
                    } else {
                        format!("{seasons} Seasons")
                    })
                }
            };

            CatalogRow {
                show_id: Some(format!("s{}", i + 1)),
                title: format!("Title {}", i + 1),
                content_type,
                director: None,
                cast: None,
                country,
                date_added: None,
                release_year,
                rating,
                duration,
                listed_in,
                description: None,
            }
        })
        .collect()
}

fn write_csv(rows: &[CatalogRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[CatalogRow], path: &str) -> Result<()> {
    let text = |f: fn(&CatalogRow) -> Option<&str>| -> StringArray {
        rows.iter().map(f).collect()
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("show_id", DataType::Utf8, true),
        Field::new("title", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, true),
        Field::new("release_year", DataType::Int64, false),
        Field::new("rating", DataType::Utf8, true),
        Field::new("duration", DataType::Utf8, true),
        Field::new("listed_in", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(text(|r| r.show_id.as_deref())),
            Arc::new(text(|r| Some(r.title.as_str()))),
            Arc::new(text(|r| Some(r.content_type.label()))),
            Arc::new(text(|r| r.country.as_deref())),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.release_year))),
            Arc::new(text(|r| r.rating.as_deref())),
            Arc::new(text(|r| r.duration.as_deref())),
            Arc::new(text(|r| Some(r.listed_in.as_str()))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(5_000, &mut rng);

    write_csv(&rows, "sample_catalog.csv")?;
    write_parquet(&rows, "sample_catalog.parquet")?;

    println!(
        "Wrote {} titles to sample_catalog.csv and sample_catalog.parquet",
        rows.len()
    );
    Ok(())
}
