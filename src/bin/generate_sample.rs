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

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let companies = [
        "Acme Robotics",
        "Bolt Energy",
        "Crane Logistics",
        "Drift Marine",
        "Everglade Foods",
        "Fathom Semiconductors",
        "Gale Textiles",
        "Harbor Pharma",
        "Ion Mobility",
        "Juniper Datacenters",
    ];

    // (host country, region)
    let countries = [
        ("Thailand", "Southeast Asia"),
        ("Vietnam", "Southeast Asia"),
        ("Indonesia", "Southeast Asia"),
        ("Japan", "East Asia"),
        ("South Korea", "East Asia"),
        ("China", "East Asia"),
        ("Hong Kong", "East Asia"),
        ("Germany", "Europe"),
        ("Poland", "Europe"),
        ("Mexico", "Latin America"),
        ("Brazil", "Latin America"),
    ];

    let sectors = [
        "Manufacturing",
        "Renewable Energy",
        "Logistics",
        "Electronics",
        "Food Processing",
        "Pharmaceuticals",
    ];

    let project_types = ["Greenfield", "Expansion", "Joint Venture", "Acquisition"];
    let stages = ["Announced", "Under Construction", "Operational"];
    let months = ["01", "03", "04", "06", "07", "09", "10", "12"];

    let output_path = "projects.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    // Raw headers are deliberately messy; the loader canonicalizes them.
    writer.write_record([
        "Company Name",
        "Host Country",
        "Region",
        "Sector",
        "Project Type",
        "Investment Amount",
        "Project Stage",
        "Date",
        "Summary of Project",
    ])?;

    let n_rows = 60;
    for i in 0..n_rows {
        let company = *rng.pick(&companies);
        let (country, region) = *rng.pick(&countries);
        let sector = *rng.pick(&sectors);
        let stage = *rng.pick(&stages);

        // A few rows are missing their project type, and a few carry a
        // non-numeric investment cell, so the loader's exclusion rules and
        // lenient coercion have something to chew on.
        let project_type = if rng.next_f64() < 0.08 {
            ""
        } else {
            *rng.pick(&project_types)
        };
        let investment = if rng.next_f64() < 0.1 {
            "N/A".to_string()
        } else {
            format!("{:.1}", 5.0 + rng.next_f64() * 495.0)
        };

        let year = 2021 + (i % 4);
        let date = format!("{year}-{}-15", rng.pick(&months));
        let summary = format!("{company} {sector} project in {country}.");

        writer.write_record([
            company,
            country,
            region,
            sector,
            project_type,
            investment.as_str(),
            stage,
            date.as_str(),
            summary.as_str(),
        ])?;
    }

    writer.flush().context("flushing CSV")?;
    println!("Wrote {n_rows} sample projects to {output_path}");
    Ok(())
}
