/// IUPAC 简并碱基表：符号 -> 允许匹配的具体碱基。
/// 不在表中的符号视为空集（任何碱基都不匹配）。
pub const IUPAC_CODES: &[(u8, &[u8])] = &[
    (b'A', b"A"),
    (b'T', b"T"),
    (b'G', b"G"),
    (b'C', b"C"),
    (b'N', b"ATGC"),
    (b'R', b"AG"),
    (b'Y', b"CT"),
    (b'W', b"AT"),
    (b'V', b"ACG"),
    (b'S', b"CG"),
    (b'K', b"GT"),
    (b'M', b"AC"),
    (b'B', b"CGT"),
    (b'D', b"AGT"),
    (b'H', b"ACT"),
];

/// 返回符号允许的碱基集合；未知符号返回空切片。
#[inline]
pub fn allowed_bases(symbol: u8) -> &'static [u8] {
    IUPAC_CODES
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, bases)| *bases)
        .unwrap_or(&[])
}

#[inline]
pub fn is_iupac_symbol(symbol: u8) -> bool {
    IUPAC_CODES.iter().any(|(s, _)| *s == symbol)
}

/// 判断片段是否匹配 PAM 模式。长度不同直接返回 false（不是错误）。
pub fn pam_matches(fragment: &[u8], pattern: &[u8]) -> bool {
    if fragment.len() != pattern.len() {
        return false;
    }
    fragment
        .iter()
        .zip(pattern)
        .all(|(&base, &sym)| allowed_bases(sym).contains(&base))
}
