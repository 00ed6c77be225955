use super::find::GuideMatch;

pub const DEFAULT_FLANK: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionType {
    Normal,
    Guide,
    Pam,
}

impl PositionType {
    /// Marker used in the text map track.
    pub fn marker(self) -> char {
        match self {
            PositionType::Normal => ' ',
            PositionType::Guide => '=',
            PositionType::Pam => '^',
        }
    }
}

/// 为序列每个位置标注类别。按给定顺序处理位点，后写覆盖先写；
/// 每个位点先标 guide 再标 PAM。区间被截断到 [0, len)。
pub fn sequence_position_types(seq: &[u8], metas: &[GuideMatch]) -> Vec<PositionType> {
    let mut pos = vec![PositionType::Normal; seq.len()];
    for g in metas {
        mark(&mut pos, g.guide_start, g.guide_end, PositionType::Guide);
        mark(&mut pos, g.pam_start, g.pam_end, PositionType::Pam);
    }
    pos
}

fn mark(pos: &mut [PositionType], start: usize, end: usize, kind: PositionType) {
    let end = end.min(pos.len());
    if start < end {
        pos[start..end].fill(kind);
    }
}

/// guide 周围的上下文片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqContext {
    pub context: String,
    /// 片段在原序列中的起点（绝对坐标），用于重新定位高亮区间
    pub left: usize,
    pub right: usize,
}

impl SeqContext {
    /// guide / PAM ranges relative to `context`.
    pub fn local_ranges(&self, guide_start: usize, guide_end: usize, pam_end: usize) -> ((usize, usize), (usize, usize)) {
        let g0 = guide_start.saturating_sub(self.left);
        let g1 = guide_end.saturating_sub(self.left);
        let p1 = pam_end.min(self.right).saturating_sub(self.left);
        ((g0, g1), (g1, p1))
    }
}

/// 截取 [guide_start - flank, pam_end + flank)，截断到序列边界。
pub fn slice_context(seq: &[u8], guide_start: usize, guide_end: usize, pam_end: usize, flank: usize) -> SeqContext {
    let left = guide_start.saturating_sub(flank).min(seq.len());
    let right = pam_end.saturating_add(flank).min(seq.len()).max(left);
    SeqContext {
        context: String::from_utf8_lossy(&seq[left..right]).into_owned(),
        left,
        right,
    }
}

/// 文本序列图的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLine {
    /// 0-based start of the line in the sequence
    pub line_start: usize,
    pub bases: String,
    pub markers: String,
}

/// 按 `chars_per_line` 折行，生成碱基行与标注行。
pub fn render_map(seq: &[u8], types: &[PositionType], chars_per_line: usize) -> Vec<MapLine> {
    if chars_per_line == 0 {
        return Vec::new();
    }
    seq.chunks(chars_per_line)
        .zip(types.chunks(chars_per_line))
        .enumerate()
        .map(|(i, (bases, kinds))| MapLine {
            line_start: i * chars_per_line,
            bases: String::from_utf8_lossy(bases).into_owned(),
            markers: kinds.iter().map(|k| k.marker()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PositionType::{Guide as G, Normal as N, Pam as P};

    fn meta(gs: usize, ge: usize, ps: usize, pe: usize) -> GuideMatch {
        GuideMatch {
            guide_start: gs,
            guide_end: ge,
            pam_start: ps,
            pam_end: pe,
            guide_seq: String::new(),
            pam_seq: String::new(),
        }
    }

    #[test]
    fn single_guide_layout() {
        let types = sequence_position_types(b"ACGTACGTAC", &[meta(2, 5, 5, 8)]);
        assert_eq!(types, vec![N, N, G, G, G, P, P, P, N, N]);
    }

    #[test]
    fn no_metas_all_normal() {
        let types = sequence_position_types(b"ACGT", &[]);
        assert_eq!(types, vec![N; 4]);
        assert!(sequence_position_types(b"", &[meta(0, 2, 2, 4)]).is_empty());
    }

    #[test]
    fn later_meta_overwrites() {
        // second guide covers the first guide's PAM
        let types = sequence_position_types(b"AAAAAAAAAA", &[meta(0, 3, 3, 5), meta(3, 6, 6, 8)]);
        assert_eq!(types, vec![G, G, G, G, G, G, P, P, N, N]);
        // reversed order: first guide's PAM wins at 3..5
        let types = sequence_position_types(b"AAAAAAAAAA", &[meta(3, 6, 6, 8), meta(0, 3, 3, 5)]);
        assert_eq!(types, vec![G, G, G, P, P, G, P, P, N, N]);
    }

    #[test]
    fn ranges_clamped() {
        let types = sequence_position_types(b"AAAAA", &[meta(3, 5, 5, 8), meta(10, 12, 12, 15)]);
        assert_eq!(types, vec![N, N, N, G, G]);
    }

    #[test]
    fn context_clamps_and_offsets() {
        let seq = b"AAAAACCCCCGGGTTTTT";
        let ctx = slice_context(seq, 5, 10, 13, 2);
        assert_eq!(ctx.context, "AACCCCCGGGTT");
        assert_eq!(ctx.left, 3);
        assert_eq!(ctx.right, 15);
        assert_eq!(ctx.local_ranges(5, 10, 13), ((2, 7), (7, 10)));

        let ctx = slice_context(seq, 1, 6, 9, DEFAULT_FLANK);
        assert_eq!(ctx.left, 0);
        assert_eq!(ctx.right, seq.len());
        assert_eq!(ctx.context.len(), seq.len());
    }

    #[test]
    fn map_wraps_lines() {
        let seq = b"ACGTACGTAC";
        let types = sequence_position_types(seq, &[meta(2, 5, 5, 8)]);
        let lines = render_map(seq, &types, 4);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].bases, "ACGT");
        assert_eq!(lines[0].markers, "  ==");
        assert_eq!(lines[1].line_start, 4);
        assert_eq!(lines[1].markers, "=^^^");
        assert_eq!(lines[2].bases, "AC");
        assert_eq!(lines[2].markers, "  ");
        assert!(render_map(seq, &types, 0).is_empty());
    }
}
