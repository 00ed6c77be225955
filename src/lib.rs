//! # crispr-scan
//!
//! CRISPR guide RNA 设计工具（教学用途）。
//!
//! 本 crate 提供：
//!
//! - **序列规范化**：去除 FASTA 头与空白，仅保留 A/C/G/T
//! - **PAM 匹配**：支持 IUPAC 简并碱基的 PAM 模式
//! - **guide 查找**：正链滑窗，提取紧邻 PAM 的候选 guide
//! - **启发式打分**：GC 含量、自互补、同序列脱靶样计数，加性总分与排序
//! - **位置注释**：为序列图标注 guide / PAM / 普通位置
//!
//! 所有打分均为可解释的启发式近似，不是真实的脱靶预测；
//! 脱靶样扫描只在输入序列内部进行，复杂度 O(n^2)，适合较短序列。
//!
//! ## 快速示例
//!
//! ```rust
//! use crispr_scan::guide::{compute_guide_table, guide_metas, sequence_position_types};
//! use crispr_scan::io::fasta::prepare_sequence;
//! use crispr_scan::pam::pam_for_system;
//!
//! let seq = prepare_sequence(">demo\nAAAATGGGATCGATCGGGAAAA\n");
//! let pam = pam_for_system("SpCas9 (S. pyogenes, Type II)").unwrap();
//!
//! let rows = compute_guide_table(&seq, 4, pam, false);
//! assert_eq!(rows[0].rank, 1);
//! assert!(rows[0].off_target_like_matches.is_none());
//!
//! let metas = guide_metas(&rows, 10, pam.len());
//! let types = sequence_position_types(&seq, &metas);
//! assert_eq!(types.len(), seq.len());
//! ```
//!
//! ## 模块说明
//!
//! - [`util`] — 碱基清洗、反向互补、GC 含量
//! - [`io`] — FASTA 解析与结果导出（CSV / JSON / 文本报告）
//! - [`pam`] — IUPAC 表、PAM 匹配、CRISPR 系统表
//! - [`guide`] — guide 查找、打分、排序与位置注释
//! - [`compare`] — 两条序列的逐位比较
//! - [`config`] — 分析参数与校验

pub mod compare;
pub mod config;
pub mod guide;
pub mod io;
pub mod pam;
pub mod util;

pub use guide::{compute_guide_table, sequence_position_types, slice_context, GuideRow};
pub use io::fasta::parse_fasta;
pub use pam::{CAS_PAM_TABLE, IUPAC_CODES};
pub use util::dna::{clean_sequence, gc_content};
