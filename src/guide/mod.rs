pub mod annotate;
pub mod find;
pub mod score;
pub mod table;

pub use annotate::{render_map, sequence_position_types, slice_context, MapLine, PositionType, SeqContext};
pub use find::{find_guides_forward, is_sequence_long_enough, GuideMatch};
pub use score::{gc_content, off_target_score, self_complementarity_score};
pub use table::{compute_guide_table, filter_by_gc, guide_metas, GcBand, GuideRow, TableSummary};
