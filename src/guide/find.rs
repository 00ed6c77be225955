use crate::pam::pam_matches;

/// 一个候选 guide / PAM 位点（正链）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideMatch {
    /// guide 区间 [guide_start, guide_end)，0-based
    pub guide_start: usize,
    pub guide_end: usize,
    /// PAM 区间 [pam_start, pam_end)，pam_start == guide_end
    pub pam_start: usize,
    pub pam_end: usize,
    pub guide_seq: String,
    /// 实际匹配到的 PAM 碱基（不是模式本身）
    pub pam_seq: String,
}

/// 调用方的前置检查：序列是否足够容纳 guide + PAM。
#[inline]
pub fn is_sequence_long_enough(seq_len: usize, guide_len: usize, pam_len: usize) -> bool {
    seq_len >= guide_len + pam_len
}

/// 正链滑窗扫描：起点 i 从 0 到 len - guide_len - pam_len（含），
/// 若紧随 guide 窗口之后的片段匹配 PAM，则输出一个位点。
/// 允许 guide 相互重叠；输出按 guide_start 升序。
/// 不扫描反向互补链。
pub fn find_guides_forward(seq: &[u8], guide_len: usize, pam: &[u8]) -> Vec<GuideMatch> {
    let pam_len = pam.len();
    if !is_sequence_long_enough(seq.len(), guide_len, pam_len) {
        return Vec::new();
    }

    let last = seq.len() - guide_len - pam_len;
    let mut guides = Vec::new();
    for i in 0..=last {
        let pam_start = i + guide_len;
        let pam_end = pam_start + pam_len;
        let fragment = &seq[pam_start..pam_end];
        if pam_matches(fragment, pam) {
            guides.push(GuideMatch {
                guide_start: i,
                guide_end: pam_start,
                pam_start,
                pam_end,
                guide_seq: String::from_utf8_lossy(&seq[i..pam_start]).into_owned(),
                pam_seq: String::from_utf8_lossy(fragment).into_owned(),
            });
        }
    }
    guides
}
