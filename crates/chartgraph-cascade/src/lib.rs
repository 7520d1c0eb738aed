mod report;
mod state;

pub use report::{BumpReport, RewrittenPin, UpdatedChart};
pub use state::CascadeState;
