use crate::util::dna;

pub use crate::util::dna::gc_content;

pub const SELF_COMP_WINDOW: usize = 4;
pub const OFF_TARGET_MAX_MISMATCHES: usize = 5;

/// 自互补启发式：对 guide 中每个长度为 `window` 的窗口，
/// 若其反向互补序列出现在同一 guide 中则计 1 分。
/// 仅作为发夹结构风险的粗略代理，不是二级结构预测。
pub fn self_complementarity_score(seq: &[u8], window: usize) -> u32 {
    if window == 0 || seq.len() < window {
        return 0;
    }
    let mut score = 0u32;
    for w in seq.windows(window) {
        let rc = dna::revcomp(w);
        if seq.windows(window).any(|x| x == rc.as_slice()) {
            score += 1;
        }
    }
    score
}

/// 同序列“脱靶样”计数（教学用近似，不是全基因组搜索）：
/// 在整条分析序列上滑动 guide 长度的窗口，跳过起点为 `origin_start` 的窗口，
/// 与 guide 的 Hamming 距离 <= `max_mismatches` 时计 1 分。
///
/// 每个 guide 的代价为 O(len(seq) * len(guide))，对全部 guide 为 O(n^2)，
/// 只适合较短输入。
pub fn off_target_score(seq: &[u8], guide: &[u8], origin_start: usize, max_mismatches: usize) -> u32 {
    let l = guide.len();
    if l == 0 || seq.len() < l {
        return 0;
    }
    let mut score = 0u32;
    for (i, w) in seq.windows(l).enumerate() {
        if i == origin_start {
            continue;
        }
        if dna::hamming(w, guide) <= max_mismatches {
            score += 1;
        }
    }
    score
}
