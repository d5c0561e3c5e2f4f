pub mod commands;
pub mod error;
pub mod frame;
pub mod igv;
pub mod io;
pub mod locus;
pub mod reporting;
pub mod review;
pub mod test_utilities;
pub mod tracks;

pub mod prelude {
    pub use crate::error::ReviewError;
    pub use crate::frame::Frame;
    pub use crate::locus::LocusKey;
    pub use crate::review::{BamColumns, MutationColumns, ReviewData};
    pub use crate::tracks::{clamp_selection, initial_selection, track_table};
}
