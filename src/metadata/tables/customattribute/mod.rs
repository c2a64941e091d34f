//! The `CustomAttribute` table (0x0C).
//!
//! Each row attaches one attribute instance to a parent row: the constructor that was
//! invoked and the blob with its encoded arguments. The table is sorted by the encoded
//! `parent` column, which makes the attributes of one entity a contiguous run.
//!
//! # Reference
//! - [ECMA-335 II.22.10](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

mod raw;

pub use raw::*;
