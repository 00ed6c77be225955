use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::guide::{slice_context, GcBand, GuideRow, MapLine, TableSummary};

/// Shown wherever a score was not computed (advanced scoring off).
pub const NOT_COMPUTED: &str = "-";

pub const CSV_HEADERS: [&str; 10] = [
    "Rank",
    "Guide Start (0-based)",
    "Guide End (0-based, excl)",
    "Guide Sequence (5'→3')",
    "PAM Pattern",
    "Matched PAM (instance)",
    "GC %",
    "Self-Complementarity",
    "Off-target-like Matches",
    "Total Score (lower is better)",
];

fn opt_cell(v: Option<u32>, missing: &str) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| missing.to_string())
}

/// CSV export; not-computed scores are empty cells.
pub fn write_csv<W: Write>(rows: &[GuideRow], out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADERS)?;
    for r in rows {
        wtr.write_record([
            r.rank.to_string(),
            r.guide_start.to_string(),
            r.guide_end.to_string(),
            r.guide_seq.clone(),
            r.pam_pattern.clone(),
            r.matched_pam.clone(),
            r.gc_percent.to_string(),
            opt_cell(r.self_complementarity, ""),
            opt_cell(r.off_target_like_matches, ""),
            r.total_score.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// JSON export; not-computed scores are `null`.
pub fn write_json<W: Write, T: Serialize + ?Sized>(value: &T, mut out: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Tab-separated table for terminals.
pub fn write_tsv<W: Write>(rows: &[GuideRow], mut out: W) -> Result<()> {
    writeln!(out, "rank\tstart\tend\tguide\tpam\tgc%\tgc_band\tself_comp\toff_target\tscore")?;
    for r in rows {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{:.2}\t{}\t{}\t{}\t{:.2}",
            r.rank,
            r.guide_start,
            r.guide_end,
            r.guide_seq,
            r.matched_pam,
            r.gc_percent,
            GcBand::classify(r.gc_percent).label(),
            opt_cell(r.self_complementarity, NOT_COMPUTED),
            opt_cell(r.off_target_like_matches, NOT_COMPUTED),
            r.total_score,
        )?;
    }
    Ok(())
}

pub fn write_map<W: Write>(lines: &[MapLine], mut out: W) -> Result<()> {
    let width = lines
        .last()
        .map(|l| (l.line_start + 1).to_string().len())
        .unwrap_or(1);
    for l in lines {
        writeln!(out, "{:>w$}  {}", l.line_start + 1, l.bases, w = width)?;
        let markers = l.markers.trim_end();
        if !markers.is_empty() {
            writeln!(out, "{:>w$}  {}", "", markers, w = width)?;
        }
    }
    Ok(())
}

/// 报告所需的分析参数
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub system: &'a str,
    pub pam: &'a str,
    pub guide_len: usize,
    pub gc_range: (f64, f64),
    pub advanced: bool,
    pub sequence: &'a [u8],
    pub flank: usize,
}

/// 纯文本报告：参数、汇总、前 10 条 guide、最优 guide 的上下文。
pub fn write_report<W: Write>(
    ctx: &ReportContext<'_>,
    rows: &[GuideRow],
    summary: &TableSummary,
    generated: DateTime<Utc>,
    mut out: W,
) -> Result<()> {
    writeln!(out, "CRISPR Guide Design Report")?;
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(out)?;
    writeln!(out, "Analysis Configuration")?;
    writeln!(out, "  CRISPR System:     {}", ctx.system)?;
    writeln!(out, "  PAM Sequence:      {}", ctx.pam)?;
    writeln!(out, "  Guide Length:      {} nt", ctx.guide_len)?;
    writeln!(out, "  GC Range Filter:   {}% - {}%", ctx.gc_range.0, ctx.gc_range.1)?;
    writeln!(out, "  Advanced Scores:   {}", if ctx.advanced { "on" } else { "off" })?;
    writeln!(out, "  Sequence Length:   {} bp", ctx.sequence.len())?;
    writeln!(out, "  Guides (raw):      {}", summary.raw)?;
    writeln!(out, "  Guides (filtered): {}", summary.filtered)?;
    let fmt_score = |s: Option<f64>| s.map(|v| format!("{:.2}", v)).unwrap_or_else(|| NOT_COMPUTED.to_string());
    writeln!(out, "  Best / Worst:      {} / {}", fmt_score(summary.best), fmt_score(summary.worst))?;
    writeln!(out)?;

    if rows.is_empty() {
        writeln!(out, "No guides remain after filtering.")?;
        return Ok(());
    }

    writeln!(out, "Top {} Guide RNAs", rows.len().min(10))?;
    writeln!(out, "  {:<5} {:<26} {:<8} {:>7} {:>8}  Position", "Rank", "Guide Sequence (5'->3')", "PAM", "GC%", "Score")?;
    for r in rows.iter().take(10) {
        writeln!(
            out,
            "  {:<5} {:<26} {:<8} {:>7.2} {:>8.2}  {}-{}",
            r.rank, r.guide_seq, r.matched_pam, r.gc_percent, r.total_score, r.guide_start, r.guide_end
        )?;
    }
    writeln!(out)?;

    let best = &rows[0];
    let sc = slice_context(ctx.sequence, best.guide_start, best.guide_end, best.pam_end(), ctx.flank);
    let ((g0, g1), (p0, p1)) = sc.local_ranges(best.guide_start, best.guide_end, best.pam_end());
    writeln!(out, "Best guide context (offset {})", sc.left)?;
    writeln!(out, "  {}", sc.context)?;
    let mut track = String::with_capacity(sc.context.len());
    for i in 0..sc.context.len() {
        track.push(if (g0..g1).contains(&i) {
            '='
        } else if (p0..p1).contains(&i) {
            '^'
        } else {
            ' '
        });
    }
    writeln!(out, "  {}", track.trim_end())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::{compute_guide_table, filter_by_gc, render_map, sequence_position_types, guide_metas};
    use chrono::TimeZone;

    const SEQ: &[u8] = b"AAAATGGGATCGATCGGGAAAA";

    #[test]
    fn csv_blank_for_not_computed() {
        let rows = compute_guide_table(SEQ, 4, "NGG", false);
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Rank,Guide Start (0-based)"));
        assert_eq!(lines.next().unwrap(), "1,10,14,CGAT,NGG,CGG,50,,,0");
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn csv_numbers_when_computed() {
        let rows = compute_guide_table(SEQ, 4, "NGG", true);
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        for line in text.lines().skip(1) {
            let cells: Vec<&str> = line.split(',').collect();
            assert_eq!(cells.len(), 10);
            assert!(cells[7].parse::<u32>().is_ok());
            assert!(cells[8].parse::<u32>().is_ok());
        }
    }

    #[test]
    fn json_nulls() {
        let rows = compute_guide_table(SEQ, 4, "NGG", false);
        let mut buf = Vec::new();
        write_json(&rows, &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 4);
        assert!(v[0]["offTargetLikeMatches"].is_null());
        assert_eq!(v[0]["rank"], 1);
    }

    #[test]
    fn tsv_marks_not_computed() {
        let rows = compute_guide_table(SEQ, 4, "NGG", false);
        let mut buf = Vec::new();
        write_tsv(&rows, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let first = text.lines().nth(1).unwrap();
        assert_eq!(first, "1\t10\t14\tCGAT\tCGG\t50.00\toptimal\t-\t-\t0.00");
    }

    #[test]
    fn map_output_has_marker_rows() {
        let rows = compute_guide_table(SEQ, 4, "NGG", false);
        let metas = guide_metas(&rows, 1, 3);
        let types = sequence_position_types(SEQ, &metas);
        let lines = render_map(SEQ, &types, 10);
        let mut buf = Vec::new();
        write_map(&lines, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let out: Vec<&str> = text.lines().collect();
        assert_eq!(out[0], " 1  AAAATGGGAT");
        assert_eq!(out[1], "11  CGATCGGGAA");
        assert_eq!(out[2], "    ====^^^");
        assert_eq!(out[3], "21  AA");
    }

    #[test]
    fn report_sections() {
        let rows = compute_guide_table(SEQ, 4, "NGG", true);
        let filtered = filter_by_gc(&rows, 0.0, 100.0);
        let summary = TableSummary::new(&rows, &filtered);
        let ctx = ReportContext {
            system: "SpCas9 (S. pyogenes, Type II)",
            pam: "NGG",
            guide_len: 4,
            gc_range: (0.0, 100.0),
            advanced: true,
            sequence: SEQ,
            flank: 3,
        };
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut buf = Vec::new();
        write_report(&ctx, &filtered, &summary, when, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Generated: 2024-05-01 12:00:00 UTC"));
        assert!(text.contains("PAM Sequence:      NGG"));
        assert!(text.contains("Top 4 Guide RNAs"));
        assert!(text.contains("Best guide context"));
    }

    #[test]
    fn report_empty_state() {
        let summary = TableSummary::new(&[], &[]);
        let ctx = ReportContext {
            system: "custom",
            pam: "NGG",
            guide_len: 20,
            gc_range: (30.0, 80.0),
            advanced: false,
            sequence: SEQ,
            flank: 14,
        };
        let mut buf = Vec::new();
        write_report(&ctx, &[], &summary, Utc::now(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("No guides remain after filtering."));
        assert!(text.contains("Best / Worst:      - / -"));
    }
}
