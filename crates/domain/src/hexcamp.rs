//! Name-to-geocell rewriting.
//!
//! A query such as `www.uxirkffr.test.hex.camp.` is split into a preserved
//! prefix (`www.`), an identifier label (`uxirkffr`) and the configured
//! suffix. The identifier is base-32 decoded, reinterpreted as an H3 cell
//! index and expanded into its ancestry, which is rendered back as a
//! canonical name below the reserved `h3` label:
//! `www.3.4.5.4.2.4.2.1.2.4.46.h3.test.hex.camp.`
pub mod canonical_name;
pub mod cell_address;
pub mod identifier;
pub mod name_match;

pub use canonical_name::CanonicalName;
pub use cell_address::{CellAddress, PathSegments};
pub use identifier::{decode_identifier, DecodedBuffer};
pub use name_match::{NameMatch, QueryNameMatcher, MARKER_LABEL};
