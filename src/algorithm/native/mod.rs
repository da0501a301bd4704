//! Table operations implemented with Arrow kernels.

mod cast;
mod concatenate;
mod dissolve;
mod explode;
mod filter;
mod merge;
mod project;
mod take;

pub use cast::AsType;
pub use concatenate::Concatenate;
pub use dissolve::Dissolve;
pub use explode::Explode;
pub use filter::Filter;
pub use merge::{JoinType, Merge, MergeOptions};
pub use project::Project;
pub use take::Take;
