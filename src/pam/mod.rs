pub mod iupac;
pub mod systems;

pub use iupac::{allowed_bases, pam_matches, IUPAC_CODES};
pub use systems::{pam_for_system, resolve_system, CAS_PAM_TABLE, DEFAULT_CAS_SYSTEM};
