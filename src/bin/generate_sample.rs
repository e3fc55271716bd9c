use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const N_PAPERS: usize = 2000;

const JOURNALS: [&str; 24] = [
    "PLoS One", "bioRxiv", "BMJ", "Sci Rep", "Lancet", "Nature", "Viruses", "J Virol",
    "Int J Environ Res Public Health", "Cureus", "Front Immunol", "Emerg Infect Dis",
    "Clin Infect Dis", "J Med Virol", "Vaccine", "Eurosurveillance", "JAMA", "Cell",
    "Science", "Front Public Health", "Travel Med Infect Dis", "Lancet Infect Dis",
    "Virol J", "Nat Commun",
];
const SOURCES: [&str; 5] = ["PMC", "Medline", "WHO", "Elsevier", "MedRxiv"];
const LICENSES: [&str; 4] = ["cc-by", "no-cc", "els-covid", "cc-by-nc"];
const TOPICS: [&str; 12] = [
    "COVID-19", "SARS-CoV-2", "coronavirus", "pandemic", "vaccine", "transmission",
    "mortality", "lockdown", "ACE2", "respiratory infection", "mental health", "masks",
];
const STUDY_KINDS: [&str; 8] = [
    "A cohort study of",
    "Clinical characteristics of",
    "Modelling the impact of",
    "A systematic review of",
    "Early evidence on",
    "Risk factors for",
    "Genomic surveillance of",
    "Public attitudes towards",
];
const SETTINGS: [&str; 6] = [
    "in hospitalised patients",
    "in Wuhan, China",
    "among healthcare workers",
    "in Europe",
    "during the first wave",
    "in children",
];
const SURNAMES: [&str; 10] = [
    "Zhang", "Smith", "Garcia", "Müller", "Rossi", "Kim", "Okafor", "Silva", "Nguyen", "Patel",
];
const ABSTRACT_WORDS: [&str; 16] = [
    "we", "report", "patients", "infection", "results", "the", "viral", "load", "cases",
    "analysis", "significant", "increase", "model", "data", "respiratory", "outcome",
];

/// One output row, in the column order of the real metadata.csv.
#[derive(Serialize)]
struct MetadataRow {
    cord_uid: String,
    source_x: String,
    title: Option<String>,
    doi: String,
    pubmed_id: Option<i64>,
    license: String,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    publish_time: Option<String>,
    authors: String,
    journal: Option<String>,
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
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    /// Skewed pick: early entries are much more likely.
    fn pick_skewed<'a>(&mut self, items: &[&'a str]) -> &'a str {
        let u = self.next_f64();
        items[((u * u) * items.len() as f64) as usize % items.len()]
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn publish_time(rng: &mut SimpleRng) -> Option<String> {
    if rng.chance(0.02) {
        return None;
    }
    if rng.chance(0.01) {
        return Some("unknown".to_string());
    }
    // Most papers are from 2020 and 2021, with a tail back to 2000.
    let year = if rng.chance(0.85) {
        2020 + rng.below(3) as i32
    } else {
        2000 + rng.below(20) as i32
    };
    if rng.chance(0.1) {
        return Some(year.to_string());
    }
    Some(format!("{year}-{:02}-{:02}", 1 + rng.below(12), 1 + rng.below(28)))
}

fn make_row(i: usize, rng: &mut SimpleRng) -> MetadataRow {
    let title = (!rng.chance(0.01)).then(|| {
        format!(
            "{} {} {}",
            rng.pick(&STUDY_KINDS),
            rng.pick_skewed(&TOPICS),
            rng.pick(&SETTINGS)
        )
    });
    let abstract_text = (!rng.chance(0.2)).then(|| {
        let n = 20 + rng.below(200);
        (0..n)
            .map(|_| rng.pick_skewed(&ABSTRACT_WORDS))
            .collect::<Vec<_>>()
            .join(" ")
    });
    let n_authors = 1 + rng.below(5);
    let authors = (0..n_authors)
        .map(|_| format!("{}, {}.", rng.pick(&SURNAMES), (b'A' + rng.below(26) as u8) as char))
        .collect::<Vec<_>>()
        .join("; ");

    MetadataRow {
        cord_uid: format!("{:08x}", rng.next_u64() as u32),
        source_x: rng.pick_skewed(&SOURCES).to_string(),
        title,
        doi: format!("10.1000/cord.{i}"),
        pubmed_id: (!rng.chance(0.3)).then(|| 32_000_000 + rng.below(1_000_000) as i64),
        license: rng.pick(&LICENSES).to_string(),
        abstract_text,
        publish_time: publish_time(rng),
        authors,
        journal: (!rng.chance(0.05)).then(|| rng.pick_skewed(&JOURNALS).to_string()),
    }
}

fn write_csv(rows: &[MetadataRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[MetadataRow], path: &str) -> Result<()> {
    fn text(rows: &[MetadataRow], f: impl Fn(&MetadataRow) -> Option<&str>) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("cord_uid", text(rows, |r| Some(r.cord_uid.as_str()))),
        ("source_x", text(rows, |r| Some(r.source_x.as_str()))),
        ("title", text(rows, |r| r.title.as_deref())),
        ("doi", text(rows, |r| Some(r.doi.as_str()))),
        (
            "pubmed_id",
            Arc::new(Int64Array::from(rows.iter().map(|r| r.pubmed_id).collect::<Vec<_>>()))
                as ArrayRef,
        ),
        ("license", text(rows, |r| Some(r.license.as_str()))),
        ("abstract", text(rows, |r| r.abstract_text.as_deref())),
        ("publish_time", text(rows, |r| r.publish_time.as_deref())),
        ("authors", text(rows, |r| Some(r.authors.as_str()))),
        ("journal", text(rows, |r| r.journal.as_deref())),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, arr)| Field::new(*name, arr.data_type().clone(), true))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, a)| a).collect(),
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
    let rows: Vec<MetadataRow> = (0..N_PAPERS).map(|i| make_row(i, &mut rng)).collect();

    write_csv(&rows, "metadata.csv")?;
    write_parquet(&rows, "metadata.parquet")?;

    println!("Wrote {} papers to metadata.csv and metadata.parquet", rows.len());
    Ok(())
}
