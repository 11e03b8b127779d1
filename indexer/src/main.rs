use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indexcore::persist::{load_document_count, load_index, IndexPaths};
use indexcore::{BuilderConfig, Document, FieldName, IndexBuilder, IndexKind, IngestMode};
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Values {
    One(String),
    Many(Vec<String>),
}

impl Values {
    fn into_vec(self) -> Vec<String> {
        match self {
            Values::One(v) => vec![v],
            Values::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InputDoc {
    file_id: serde_json::Value,
    #[serde(default)]
    title: Option<Values>,
    #[serde(default)]
    content: Option<Values>,
    #[serde(default)]
    author: Option<Values>,
    #[serde(default)]
    author_org: Option<Values>,
    #[serde(default)]
    category: Option<Values>,
    #[serde(default)]
    place: Option<Values>,
    #[serde(default)]
    date: Option<Values>,
}

impl InputDoc {
    fn into_document(self) -> Document {
        let file_id = match self.file_id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        let mut doc = Document::with_file_id(file_id);
        let fields = [
            (FieldName::Title, self.title),
            (FieldName::Content, self.content),
            (FieldName::Author, self.author),
            (FieldName::AuthorOrg, self.author_org),
            (FieldName::Category, self.category),
            (FieldName::Place, self.place),
            (FieldName::Date, self.date),
        ];
        for (field, values) in fields {
            if let Some(values) = values {
                doc.set_field(field, values.into_vec());
            }
        }
        doc
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Term,
    Author,
    Category,
    Place,
}

impl From<KindArg> for IndexKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Term => IndexKind::Term,
            KindArg::Author => IndexKind::Author,
            KindArg::Category => IndexKind::Category,
            KindArg::Place => IndexKind::Place,
        }
    }
}

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build term, author, category and place posting indices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory (overrides the config file)
        #[arg(long)]
        output: Option<String>,
        /// JSON file with builder settings
        #[arg(long)]
        config: Option<String>,
        /// Delimiter regex used to split field values
        #[arg(long)]
        delimiter: Option<String>,
        /// Records written per output line
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Print records of a built index
    Inspect {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        #[arg(long, value_enum, default_value = "term")]
        kind: KindArg,
        /// Only show keys starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, config, delimiter, batch_size } => {
            let mut cfg = match config {
                Some(path) => load_config(Path::new(&path))?,
                None => BuilderConfig::default(),
            };
            if let Some(output) = output {
                cfg.index_dir = PathBuf::from(output);
            }
            if let Some(delimiter) = delimiter {
                cfg.delimiter = delimiter;
            }
            if let Some(batch_size) = batch_size {
                cfg.batch_size = batch_size;
            }
            build_index(Path::new(&input), &cfg).map(|_| ())
        }
        Commands::Inspect { index, kind, prefix, limit } => inspect(Path::new(&index), kind.into(), prefix.as_deref(), limit),
    }
}

fn load_config(path: &Path) -> Result<BuilderConfig> {
    let f = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg = serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

fn build_index(input: &Path, cfg: &BuilderConfig) -> Result<indexcore::IndexSummary> {
    let start = Instant::now();
    let mut builder = IndexBuilder::from_config(cfg)?;

    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
        files.sort();
    } else if input.is_file() {
        files.push(input.to_path_buf());
    } else {
        anyhow::bail!("input {} does not exist", input.display());
    }

    let mut stats = IngestStats::default();
    for file in files {
        let docs = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        for doc in docs {
            let outcome = builder
                .add_document(&doc.into_document())
                .with_context(|| format!("indexing document from {}", file.display()))?;
            stats.record(outcome.mode, outcome.skipped.len());
        }
    }
    tracing::info!(full = stats.full, repeated = stats.repeated, skipped_values = stats.skipped, "ingested documents");

    let summary = builder.close()?;
    tracing::info!(output = %cfg.index_dir.display(), num_docs = summary.num_docs, elapsed_ms = start.elapsed().as_millis() as u64, "done");
    Ok(summary)
}

#[derive(Default)]
struct IngestStats {
    full: usize,
    repeated: usize,
    skipped: usize,
}

impl IngestStats {
    fn record(&mut self, mode: IngestMode, skipped: usize) {
        match mode {
            IngestMode::Full => self.full += 1,
            IngestMode::CategoryOnly => self.repeated += 1,
        }
        self.skipped += skipped;
    }
}

fn read_jsonl(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let mut docs = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        docs.push(serde_json::from_str(&line).with_context(|| format!("parsing line in {}", file.display()))?);
    }
    Ok(docs)
}

fn read_json(file: &Path) -> Result<Vec<InputDoc>> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)?;
    let docs: Vec<InputDoc> = match json {
        serde_json::Value::Array(arr) => arr.into_iter().map(serde_json::from_value).collect::<Result<Vec<_>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

fn inspect(index: &Path, kind: IndexKind, prefix: Option<&str>, limit: usize) -> Result<()> {
    let paths = IndexPaths::new(index);
    let num_docs = load_document_count(&paths)?;
    let records = load_index(&paths, kind)?;
    println!("N={num_docs} {kind} keys={}", records.len());
    let matching = records.iter().filter(|r| prefix.map_or(true, |p| r.key.starts_with(p)));
    for rec in matching.take(limit) {
        let postings: Vec<String> = rec.postings.iter().map(|p| p.to_string()).collect();
        println!("{}\t{}\t{}", rec.key, rec.postings.len(), postings.join(" "));
    }
    Ok(())
}
