use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use featgen::{mention_features, relation_features, Config, DictionaryStore, Sentence, Span};

/// One input record: a fully annotated sentence plus one or two spans.
/// The presence of `span2` selects relation features over mention features.
#[derive(Debug, Deserialize)]
struct InputRecord {
    /// Opaque record identifier, copied to every output row
    id: serde_json::Value,
    words: Vec<String>,
    lemmas: Vec<String>,
    poses: Vec<String>,
    ners: Vec<String>,
    begin_offsets: Option<Vec<usize>>,
    end_offsets: Option<Vec<usize>>,
    #[serde(default)]
    dependencies: Vec<String>,
    span1: SpanRecord,
    span2: Option<SpanRecord>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct SpanRecord {
    begin: usize,
    length: usize,
}

/// One output row: the record id paired with one feature string.
#[derive(Debug, Serialize)]
struct OutputRecord<'a> {
    id: &'a serde_json::Value,
    feature: &'a str,
}

#[derive(Parser, Debug)]
#[command(name = "extract")]
#[command(about = "Generate mention/relation features from JSON records on stdin")]
struct Args {
    /// TOML config file listing dictionaries to load
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extra dictionary as ID=PATH (repeatable)
    #[arg(short, long = "dict", value_name = "ID=PATH")]
    dict: Vec<String>,

    /// Lower-case phrases of dictionaries given with --dict
    #[arg(long)]
    lowercase: bool,
}

fn parse_dict_arg(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .ok_or_else(|| anyhow::anyhow!("--dict expects ID=PATH, got {:?}", arg))
}

/// Build the sentence, run the right generator, and write one JSON object
/// per feature. Returns the number of features written.
fn process_record(
    record: &InputRecord,
    dicts: &DictionaryStore,
    out: &mut impl Write,
) -> Result<usize> {
    let n = record.words.len();
    let default_offsets = vec![0; n];
    let begin_offsets = record.begin_offsets.as_deref().unwrap_or(&default_offsets);
    let end_offsets = record.end_offsets.as_deref().unwrap_or(&default_offsets);
    let sentence = Sentence::from_arrays(
        begin_offsets,
        end_offsets,
        &record.words,
        &record.lemmas,
        &record.poses,
        &record.ners,
        &record.dependencies,
    )?;
    let span1 = Span::new(record.span1.begin, record.span1.length)?;

    let mut count = 0;
    let mut write_feature = |feature: String| -> Result<()> {
        let row = OutputRecord {
            id: &record.id,
            feature: &feature,
        };
        writeln!(out, "{}", serde_json::to_string(&row)?)?;
        count += 1;
        Ok(())
    };
    match record.span2 {
        Some(s2) => {
            let span2 = Span::new(s2.begin, s2.length)?;
            for feature in relation_features(&sentence, span1, span2, dicts)? {
                write_feature(feature)?;
            }
        }
        None => {
            for feature in mention_features(&sentence, span1, dicts)? {
                write_feature(feature)?;
            }
        }
    }
    Ok(count)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let mut dicts = DictionaryStore::new();
    if let Some(path) = &args.config {
        let config = Config::load(path)?;
        let ids = config.load_dictionaries(&mut dicts)?;
        log::info!("Loaded {} dictionaries from {}", ids.len(), path.display());
    }
    for spec in &args.dict {
        let (id, path) = parse_dict_arg(spec)?;
        let loaded = if args.lowercase {
            dicts.load_path_with(path, Some(id), |line| line.to_lowercase())
        } else {
            dicts.load_path(path, Some(id))
        }
        .with_context(|| format!("Failed to load dictionary: {}", path))?;
        log::info!("Loaded dictionary {:?} from {}", loaded, path);
    }
    log::info!("{} dictionaries available", dicts.len());

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut records = 0usize;
    let mut features = 0usize;
    let mut skipped = 0usize;
    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: InputRecord = match serde_json::from_str(&line) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unparseable line {}: {}", line_no + 1, e);
                skipped += 1;
                continue;
            }
        };
        match process_record(&record, &dicts, &mut out) {
            Ok(n) => {
                records += 1;
                features += n;
            }
            Err(e) => {
                log::warn!("Skipping record at line {}: {}", line_no + 1, e);
                skipped += 1;
            }
        }
    }
    out.flush()?;

    log::info!(
        "Done: records={}, features={}, skipped={}",
        records,
        features,
        skipped
    );
    Ok(())
}
