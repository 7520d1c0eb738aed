mod bump;
mod manifest;

pub use bump::BumpPart;
pub use manifest::{ChartDependency, ChartManifest, MANIFEST_FILE_NAME};

#[cfg(test)]
mod tests;
