use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use std::io::{BufReader, Read, Write};

use crispr_scan::compare;
use crispr_scan::config::{AnalysisConfig, OFF_TARGET_WARN_LEN};
use crispr_scan::guide::{self, GuideRow, TableSummary};
use crispr_scan::io::{export, fasta};
use crispr_scan::pam::{self, CAS_PAM_TABLE};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "crispr-scan", author, version, about = "Find, score and rank CRISPR guide RNAs next to PAM sites", arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in CRISPR systems and their PAM patterns
    Systems,
    /// Find and rank guides in a sequence
    Design {
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Print the sequence with the top guides and their PAMs marked
    Map {
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// Number of top-ranked guides to draw (max 50)
        #[arg(long = "top-n", default_value_t = 10)]
        top_n: usize,
        /// Bases per line
        #[arg(short = 'w', long = "width", default_value_t = 70)]
        chars_per_line: usize,
    },
    /// Compare two sequences position by position
    Compare {
        /// First sequence (FASTA or plain text, '-' for stdin)
        first: String,
        /// Second sequence (FASTA or plain text)
        second: String,
        /// Print the full per-position diff as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct AnalysisArgs {
    /// Input sequence (FASTA or plain text, '-' for stdin)
    input: String,
    /// Use only this FASTA record (default: all records concatenated)
    #[arg(long)]
    record: Option<String>,
    /// CRISPR system name or unambiguous prefix (see `systems`)
    #[arg(short = 's', long = "system", default_value = pam::DEFAULT_CAS_SYSTEM)]
    system: String,
    /// Custom PAM pattern in IUPAC codes, overrides --system
    #[arg(short = 'p', long)]
    pam: Option<String>,
    /// Guide length in nt (18-24)
    #[arg(short = 'l', long = "guide-len", default_value_t = 20)]
    guide_len: usize,
    /// Skip self-complementarity and off-target-like scoring
    #[arg(long = "no-advanced")]
    no_advanced: bool,
    #[arg(long = "gc-min", default_value_t = 30.0)]
    gc_min: f64,
    #[arg(long = "gc-max", default_value_t = 80.0)]
    gc_max: f64,
    /// Flank size for context snippets in reports
    #[arg(long, default_value_t = 14)]
    flank: usize,
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    threads: usize,
}

impl AnalysisArgs {
    fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            cas_system: self.system.clone(),
            pam: self.pam.clone(),
            guide_len: self.guide_len,
            advanced: !self.no_advanced,
            gc_range: (self.gc_min, self.gc_max),
            flank: self.flank,
            threads: self.threads,
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Tsv,
    Csv,
    Json,
    Report,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Systems => run_systems(),
        Commands::Design { analysis, format, out } => {
            let cfg = analysis.to_config();
            run_design(&analysis.input, analysis.record.as_deref(), &cfg, format, out.as_deref())
        }
        Commands::Map { analysis, top_n, chars_per_line } => {
            let cfg = AnalysisConfig { top_n, chars_per_line, ..analysis.to_config() };
            run_map(&analysis.input, analysis.record.as_deref(), &cfg)
        }
        Commands::Compare { first, second, json } => run_compare(&first, &second, json),
    }
}

fn run_systems() -> Result<()> {
    let mut out = std::io::BufWriter::new(std::io::stdout());
    for (name, pam) in CAS_PAM_TABLE {
        writeln!(out, "{}\t{}", pam, name)?;
    }
    out.flush()?;
    Ok(())
}

fn read_text(path: &str) -> Result<String> {
    let mut text = String::new();
    if path == "-" {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("cannot read sequence file '{}': {}", path, e))?;
    }
    Ok(text)
}

fn load_sequence(path: &str, record: Option<&str>) -> Result<Vec<u8>> {
    let seq = match record {
        Some(id) => {
            let text = read_text(path)?;
            let mut reader = fasta::FastaReader::new(BufReader::new(text.as_bytes()));
            let rec = reader
                .find_record(id)?
                .ok_or_else(|| anyhow!("record '{}' not found in '{}'", id, path))?;
            debug!("Record {} ({} raw bytes)", rec.id, rec.seq.len());
            crispr_scan::clean_sequence(&rec.seq)
        }
        None => fasta::prepare_sequence(&read_text(path)?),
    };
    info!("Clean sequence: {} bp, GC {:.2}%", seq.len(), crispr_scan::gc_content(&seq));
    Ok(seq)
}

struct Analysis {
    system: String,
    pam: String,
    seq: Vec<u8>,
    rows: Vec<GuideRow>,
    filtered: Vec<GuideRow>,
}

fn analyze(input: &str, record: Option<&str>, cfg: &AnalysisConfig) -> Result<Analysis> {
    cfg.validate()?;
    let (system, pam) = cfg.resolve_pam()?;
    info!("System: {} (PAM {})", system, pam);
    info!("Guide length: {} nt, advanced scores: {}", cfg.guide_len, cfg.advanced);

    rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.threads)
        .build_global()
        .map_err(|e| anyhow!("cannot start thread pool: {}", e))?;

    let seq = load_sequence(input, record)?;
    cfg.check_sequence_len(seq.len(), pam.len())?;
    if cfg.advanced && seq.len() > OFF_TARGET_WARN_LEN {
        warn!(
            "{} bp with advanced scoring: off-target-like scan is quadratic and may be slow (use --no-advanced to skip it)",
            seq.len()
        );
    }

    let rows = guide::compute_guide_table(&seq, cfg.guide_len, &pam, cfg.advanced);
    let filtered = guide::filter_by_gc(&rows, cfg.gc_range.0, cfg.gc_range.1);
    info!("Guides found: {}, after GC filter: {}", rows.len(), filtered.len());
    if rows.is_empty() {
        warn!("no PAM sites found for {}", pam);
    } else if filtered.is_empty() {
        warn!("no guides remain after GC filtering; try widening the GC range");
    }

    Ok(Analysis { system, pam, seq, rows, filtered })
}

fn run_design(
    input: &str,
    record: Option<&str>,
    cfg: &AnalysisConfig,
    format: OutputFormat,
    out_path: Option<&str>,
) -> Result<()> {
    let a = analyze(input, record, cfg)?;

    let mut out: Box<dyn Write> = if let Some(p) = out_path {
        let fh = std::fs::File::create(p).map_err(|e| anyhow!("cannot create output '{}': {}", p, e))?;
        Box::new(std::io::BufWriter::new(fh))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };

    match format {
        OutputFormat::Tsv => export::write_tsv(&a.filtered, &mut out)?,
        OutputFormat::Csv => export::write_csv(&a.filtered, &mut out)?,
        OutputFormat::Json => export::write_json(&a.filtered, &mut out)?,
        OutputFormat::Report => {
            let summary = TableSummary::new(&a.rows, &a.filtered);
            let ctx = export::ReportContext {
                system: &a.system,
                pam: &a.pam,
                guide_len: cfg.guide_len,
                gc_range: cfg.gc_range,
                advanced: cfg.advanced,
                sequence: &a.seq,
                flank: cfg.flank,
            };
            export::write_report(&ctx, &a.filtered, &summary, chrono::Utc::now(), &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn run_map(input: &str, record: Option<&str>, cfg: &AnalysisConfig) -> Result<()> {
    let a = analyze(input, record, cfg)?;
    let metas = guide::guide_metas(&a.filtered, cfg.map_guides(), a.pam.len());
    debug!("Drawing {} guides", metas.len());
    let types = guide::sequence_position_types(&a.seq, &metas);
    let lines = guide::render_map(&a.seq, &types, cfg.chars_per_line);

    let mut out = std::io::BufWriter::new(std::io::stdout());
    writeln!(out, "# top {} guides, '=' guide, '^' PAM ({})", metas.len(), a.pam)?;
    export::write_map(&lines, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_compare(first: &str, second: &str, json: bool) -> Result<()> {
    let a = fasta::prepare_sequence(&read_text(first)?);
    let b = fasta::prepare_sequence(&read_text(second)?);
    info!("Comparing {} bp against {} bp", a.len(), b.len());

    let diff = compare::diff_sequences(&a, &b);
    let stats = compare::diff_stats(&diff)
        .ok_or_else(|| anyhow!("nothing to compare: both sequences are empty"))?;

    let mut out = std::io::BufWriter::new(std::io::stdout());
    if json {
        export::write_json(&diff, &mut out)?;
    } else {
        writeln!(out, "length_a\t{}", a.len())?;
        writeln!(out, "length_b\t{}", b.len())?;
        writeln!(out, "gc_a\t{:.1}", crispr_scan::gc_content(&a))?;
        writeln!(out, "gc_b\t{:.1}", crispr_scan::gc_content(&b))?;
        writeln!(out, "matches\t{}", stats.matches)?;
        writeln!(out, "mismatches\t{}", stats.mismatches)?;
        writeln!(out, "insertions\t{}", stats.insertions)?;
        writeln!(out, "deletions\t{}", stats.deletions)?;
        writeln!(out, "identity\t{:.2}", stats.identity)?;
    }
    out.flush()?;
    Ok(())
}
