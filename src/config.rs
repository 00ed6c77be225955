use anyhow::{anyhow, bail, Result};
use log::debug;

use crate::guide::is_sequence_long_enough;
use crate::pam::systems::{self, DEFAULT_CAS_SYSTEM};

pub const GUIDE_LEN_MIN: usize = 18;
pub const GUIDE_LEN_MAX: usize = 24;
pub const MAX_MAP_GUIDES: usize = 50;
/// 超过该长度且开启高级打分时，O(n^2) 脱靶扫描会明显变慢
pub const OFF_TARGET_WARN_LEN: usize = 10_000;

/// 一次分析的参数
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub cas_system: String,
    /// 显式 PAM，覆盖 cas_system 对应的模式
    pub pam: Option<String>,
    pub guide_len: usize,
    /// 是否计算自互补与脱靶样得分
    pub advanced: bool,
    /// GC 过滤区间（含端点）
    pub gc_range: (f64, f64),
    pub top_n: usize,
    pub chars_per_line: usize,
    pub flank: usize,
    pub threads: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cas_system: DEFAULT_CAS_SYSTEM.to_string(),
            pam: None,
            guide_len: 20,
            advanced: true,
            gc_range: (30.0, 80.0),
            top_n: 10,
            chars_per_line: 70,
            flank: 14,
            threads: 1,
        }
    }
}

impl AnalysisConfig {
    /// Resolve the (system name, PAM pattern) pair this run uses.
    pub fn resolve_pam(&self) -> Result<(String, String)> {
        if let Some(p) = &self.pam {
            let p = p.to_ascii_uppercase();
            if !systems::is_valid_pattern(&p) {
                bail!("invalid PAM pattern '{}': use IUPAC symbols (A C G T N R Y W V S K M B D H)", p);
            }
            return Ok(("custom".to_string(), p));
        }
        let (name, pam) = systems::resolve_system(&self.cas_system)
            .ok_or_else(|| anyhow!("unknown or ambiguous CRISPR system '{}' (see `crispr-scan systems`)", self.cas_system))?;
        Ok((name.to_string(), pam.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        debug!("Validating analysis settings");
        if !(GUIDE_LEN_MIN..=GUIDE_LEN_MAX).contains(&self.guide_len) {
            bail!(
                "guide length {} out of range ({}-{} nt)",
                self.guide_len,
                GUIDE_LEN_MIN,
                GUIDE_LEN_MAX
            );
        }
        let (lo, hi) = self.gc_range;
        if !(0.0..=100.0).contains(&lo) || !(0.0..=100.0).contains(&hi) || lo > hi {
            bail!("invalid GC range {}-{}: need 0 <= min <= max <= 100", lo, hi);
        }
        if self.top_n == 0 {
            bail!("top-n must be at least 1");
        }
        if self.chars_per_line == 0 {
            bail!("chars-per-line must be at least 1");
        }
        if self.threads == 0 {
            bail!("threads must be at least 1");
        }
        self.resolve_pam()?;
        debug!("Analysis settings validated");
        Ok(())
    }

    /// Number of guides drawn on the map, capped at [`MAX_MAP_GUIDES`].
    pub fn map_guides(&self) -> usize {
        self.top_n.min(MAX_MAP_GUIDES)
    }

    /// 调用 guide 表构建前的前置检查
    pub fn check_sequence_len(&self, seq_len: usize, pam_len: usize) -> Result<()> {
        if seq_len == 0 {
            bail!("input contains no A/C/G/T bases");
        }
        if !is_sequence_long_enough(seq_len, self.guide_len, pam_len) {
            bail!(
                "sequence too short: {} bp, need at least {} bp (guide {} + PAM {})",
                seq_len,
                self.guide_len + pam_len,
                self.guide_len,
                pam_len
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = AnalysisConfig::default();
        cfg.validate().unwrap();
        let (name, pam) = cfg.resolve_pam().unwrap();
        assert_eq!(name, DEFAULT_CAS_SYSTEM);
        assert_eq!(pam, "NGG");
    }

    #[test]
    fn guide_len_bounds() {
        let mut cfg = AnalysisConfig { guide_len: 17, ..Default::default() };
        assert!(cfg.validate().is_err());
        cfg.guide_len = 25;
        assert!(cfg.validate().is_err());
        cfg.guide_len = 24;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn gc_range_checked() {
        let cfg = AnalysisConfig { gc_range: (60.0, 40.0), ..Default::default() };
        assert!(cfg.validate().is_err());
        let cfg = AnalysisConfig { gc_range: (0.0, 101.0), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn pam_override() {
        let cfg = AnalysisConfig { pam: Some("nnGRrt".to_string()), ..Default::default() };
        assert_eq!(cfg.resolve_pam().unwrap().1, "NNGRRT");
        let cfg = AnalysisConfig { pam: Some("NGZ".to_string()), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unknown_system_rejected() {
        let cfg = AnalysisConfig { cas_system: "Cas42".to_string(), ..Default::default() };
        assert!(cfg.resolve_pam().is_err());
    }

    #[test]
    fn sequence_len_precondition() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.check_sequence_len(0, 3).is_err());
        assert!(cfg.check_sequence_len(22, 3).is_err());
        assert!(cfg.check_sequence_len(23, 3).is_ok());
    }

    #[test]
    fn map_guides_capped() {
        let cfg = AnalysisConfig { top_n: 500, ..Default::default() };
        assert_eq!(cfg.map_guides(), MAX_MAP_GUIDES);
    }
}
