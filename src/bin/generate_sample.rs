//! Write a deterministic `sample_data.csv` in the input schema, for demos
//! and manual testing:
//!
//! ```text
//! cargo run --bin generate_sample
//! cargo run -- sample_data.csv --view matrix
//! ```

use anyhow::{Context, Result};

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

    fn next_range(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Fisher–Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            items.swap(i, self.next_range(i + 1));
        }
    }
}

const VALUES: [&str; 6] = ["honor", "family", "power", "freedom", "truth", "wealth"];

const MOVIES: [(&str, &str, f64); 6] = [
    ("Iron Harvest", "Action", 7.9),
    ("The Quiet Letter", "Romance", 8.1),
    ("Starfall", "SF", 8.6),
    ("Crown of Ash", "Drama", 7.4),
    ("Night Circuit", "Action", 6.8),
    ("Glass Orchard", "Drama", 8.9),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;

    writer.write_record([
        "name",
        "movie_name",
        "genre",
        "role",
        "rating",
        "value_list",
        "value_rank",
        "vec",
    ])?;

    let mut rows = 0usize;
    for (m, &(movie, genre, rating)) in MOVIES.iter().enumerate() {
        for (c, role) in ["protagonist", "antagonist", "support"].into_iter().enumerate() {
            // Every character ranks the full value pool, each in their own
            // priority order, so rank vectors are comparable pairwise.
            let mut values: Vec<&str> = VALUES.to_vec();
            rng.shuffle(&mut values);

            // Rank weight decays with priority, plus a little noise.
            let ranks: Vec<f64> = (0..values.len())
                .map(|i| (values.len() - i) as f64 + rng.next_f64() * 0.8)
                .collect();

            let embedding: Vec<f64> = (0..4).map(|_| rng.next_f64() * 2.0 - 1.0).collect();

            let value_list = format!(
                "[{}]",
                values
                    .iter()
                    .map(|v| format!("'{v}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let value_rank = format!(
                "[{}]",
                ranks
                    .iter()
                    .map(|r| format!("{r:.2}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let vec_field = embedding
                .iter()
                .map(|v| format!("{v:.4}"))
                .collect::<Vec<_>>()
                .join(" ");

            let name = format!("Character {}{}", m + 1, ["A", "B", "C"][c]);
            let rating_field = format!("{rating:.1}");
            writer.write_record([
                name.as_str(),
                movie,
                genre,
                role,
                rating_field.as_str(),
                value_list.as_str(),
                value_rank.as_str(),
                vec_field.as_str(),
            ])?;
            rows += 1;
        }
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {rows} characters to {output_path}");
    Ok(())
}
