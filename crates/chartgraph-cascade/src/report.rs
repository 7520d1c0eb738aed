use serde::Serialize;

use crate::state::CascadeState;

/// Summary of one cascade run, in updated-name order.
#[derive(Debug, Clone, Serialize)]
pub struct BumpReport {
    pub updated: Vec<UpdatedChart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatedChart {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<RewrittenPin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewrittenPin {
    pub name: String,
    pub version: String,
}

impl CascadeState<'_> {
    pub fn report(&self) -> BumpReport {
        let updated = self
            .updated()
            .iter()
            .map(|name| UpdatedChart {
                name: name.clone(),
                version: self
                    .version_of(name)
                    .map(|version| version.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
                dependencies: self
                    .dependency_rewrites()
                    .get(name)
                    .map(|rewrites| {
                        rewrites
                            .iter()
                            .map(|dependency| RewrittenPin {
                                name: dependency.clone(),
                                version: self
                                    .version_of(dependency)
                                    .map(|version| version.to_string())
                                    .unwrap_or_else(|| "unknown".to_string()),
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();
        BumpReport { updated }
    }
}
