use super::iupac;

/// CRISPR 系统名称 -> PAM 模式（文献整理，教学用途）。
pub const CAS_PAM_TABLE: &[(&str, &str)] = &[
    ("SpCas9 (S. pyogenes, Type II)", "NGG"),
    ("SaCas9 (S. aureus, Type II-A)", "NNGRRT"),
    ("StCas9 (S. thermophilus, Type II-A)", "NNAGAA"),
    ("S. solfataricus (Type I-A1)", "CCN"),
    ("S. solfataricus (Type I-A2)", "TCN"),
    ("H. walsbyi (Type I-B)", "TTC"),
    ("E. coli (Type I-E)", "AWG"),
    ("E. coli (Type I-F)", "CC"),
    ("P. aeruginosa (Type I-F)", "CC"),
    ("FnCas12a (F. novicida, Type V-A)", "TTTN"),
    ("AsCas12a (Acidaminococcus, Type V-A)", "TTTN"),
];

pub const DEFAULT_CAS_SYSTEM: &str = "SpCas9 (S. pyogenes, Type II)";

/// Exact name lookup.
pub fn pam_for_system(name: &str) -> Option<&'static str> {
    CAS_PAM_TABLE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, pam)| *pam)
}

/// Exact name first, then a case-insensitive prefix match on the system name
/// (so `spcas9` resolves). Ambiguous prefixes resolve to nothing.
pub fn resolve_system(query: &str) -> Option<(&'static str, &'static str)> {
    if let Some(hit) = CAS_PAM_TABLE.iter().find(|(n, _)| *n == query) {
        return Some(*hit);
    }
    let q = query.to_ascii_lowercase();
    let mut hits = CAS_PAM_TABLE
        .iter()
        .filter(|(n, _)| n.to_ascii_lowercase().starts_with(&q));
    let first = hits.next()?;
    if hits.next().is_some() {
        return None;
    }
    Some(*first)
}

/// A user-supplied PAM is usable when it is non-empty and every symbol is a
/// known IUPAC code.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && pattern.bytes().all(iupac::is_iupac_symbol)
}
