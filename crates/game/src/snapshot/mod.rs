mod buffer;
mod extrapolator;

pub use buffer::{PaddleState, Snapshot, SnapshotBuffer};
pub use extrapolator::{Extrapolator, MAX_SNAPSHOTS};
