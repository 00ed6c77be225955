use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::find::{find_guides_forward, GuideMatch};
use super::score::{
    gc_content, off_target_score, self_complementarity_score, OFF_TARGET_MAX_MISMATCHES,
    SELF_COMP_WINDOW,
};

/// 排序后的 guide 记录。`None` 表示“未计算”（关闭高级打分时），不等同于 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideRow {
    /// 1-based，排序后分配，连续且唯一
    pub rank: usize,
    pub guide_start: usize,
    pub guide_end: usize,
    pub guide_seq: String,
    pub pam_pattern: String,
    pub matched_pam: String,
    /// 0–100，保留两位小数
    pub gc_percent: f64,
    pub self_complementarity: Option<u32>,
    pub off_target_like_matches: Option<u32>,
    /// 越低越好，保留两位小数
    pub total_score: f64,
}

impl GuideRow {
    /// 重建供位置注释使用的位点信息
    pub fn to_match(&self, pam_len: usize) -> GuideMatch {
        GuideMatch {
            guide_start: self.guide_start,
            guide_end: self.guide_end,
            pam_start: self.guide_end,
            pam_end: self.guide_end + pam_len,
            guide_seq: self.guide_seq.clone(),
            pam_seq: self.matched_pam.clone(),
        }
    }

    #[inline]
    pub fn pam_end(&self) -> usize {
        self.guide_end + self.matched_pam.len()
    }
}

/// Round half up to two decimals.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0 + 0.5).floor() / 100.0
}

/// 可解释的加性总分：GC 偏离 50% 的惩罚（/5）+ 自互补 ×1 + 脱靶样 ×2。
pub fn total_score(gc: f64, self_comp: Option<u32>, off_target: Option<u32>) -> f64 {
    (gc - 50.0).abs() / 5.0
        + self_comp.unwrap_or(0) as f64
        + off_target.unwrap_or(0) as f64 * 2.0
}

fn score_match(seq: &[u8], m: GuideMatch, pam: &str, advanced: bool) -> GuideRow {
    let guide = m.guide_seq.as_bytes();
    let gc = gc_content(guide);
    let (self_comp, off_target) = if advanced {
        (
            Some(self_complementarity_score(guide, SELF_COMP_WINDOW)),
            Some(off_target_score(seq, guide, m.guide_start, OFF_TARGET_MAX_MISMATCHES)),
        )
    } else {
        (None, None)
    };
    let total = total_score(gc, self_comp, off_target);

    GuideRow {
        rank: 0, // assigned after sorting
        guide_start: m.guide_start,
        guide_end: m.guide_end,
        guide_seq: m.guide_seq,
        pam_pattern: pam.to_string(),
        matched_pam: m.pam_seq,
        gc_percent: round2(gc),
        self_complementarity: self_comp,
        off_target_like_matches: off_target,
        total_score: round2(total),
    }
}

/// 主入口：查找位点 -> 打分 -> 按总分升序稳定排序 -> 分配名次。
///
/// 各位点的打分相互独立，在 rayon 线程池上并行执行；结果按扫描顺序收集后
/// 再做稳定排序，因此输出与串行执行完全一致（包括同分时的先后顺序）。
pub fn compute_guide_table(seq: &[u8], guide_len: usize, pam: &str, advanced: bool) -> Vec<GuideRow> {
    let matches = find_guides_forward(seq, guide_len, pam.as_bytes());
    if matches.is_empty() {
        return Vec::new();
    }

    let mut rows: Vec<GuideRow> = matches
        .into_par_iter()
        .map(|m| score_match(seq, m, pam, advanced))
        .collect();

    // sort_by is stable: equal scores keep scan order
    rows.sort_by(|a, b| a.total_score.total_cmp(&b.total_score));
    for (i, r) in rows.iter_mut().enumerate() {
        r.rank = i + 1;
    }
    rows
}

/// Keep rows with `min <= gc_percent <= max`. Ranks are not reassigned.
pub fn filter_by_gc(rows: &[GuideRow], min: f64, max: f64) -> Vec<GuideRow> {
    rows.iter()
        .filter(|r| r.gc_percent >= min && r.gc_percent <= max)
        .cloned()
        .collect()
}

/// 前 `top_n` 条记录对应的位点，用于序列图注释
pub fn guide_metas(rows: &[GuideRow], top_n: usize, pam_len: usize) -> Vec<GuideMatch> {
    rows.iter().take(top_n).map(|r| r.to_match(pam_len)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSummary {
    /// guides before GC filtering
    pub raw: usize,
    pub filtered: usize,
    pub best: Option<f64>,
    pub worst: Option<f64>,
}

impl TableSummary {
    pub fn new(raw: &[GuideRow], filtered: &[GuideRow]) -> Self {
        Self {
            raw: raw.len(),
            filtered: filtered.len(),
            best: filtered.first().map(|r| r.total_score),
            worst: filtered.last().map(|r| r.total_score),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GcBand {
    /// 40–60%
    Optimal,
    /// 30–70%
    Acceptable,
    Poor,
}

impl GcBand {
    pub fn classify(gc: f64) -> Self {
        if (40.0..=60.0).contains(&gc) {
            GcBand::Optimal
        } else if (30.0..=70.0).contains(&gc) {
            GcBand::Acceptable
        } else {
            GcBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GcBand::Optimal => "optimal",
            GcBand::Acceptable => "acceptable",
            GcBand::Poor => "poor",
        }
    }
}
