//! Deployment branch selection (prod vs stage API/CDN hosts).

use std::fmt;

use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Prod,
    Stage,
}

impl Branch {
    /// Resolve a CLI branch string. Historically every value other than
    /// `prod` selected the stage hosts; unknown values keep that aliasing
    /// but are warned about instead of silently accepted.
    pub fn resolve(raw: &str) -> Branch {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prod" => Branch::Prod,
            "stage" => Branch::Stage,
            other => {
                warn!(target: "startup", "unknown branch {other:?}, falling back to stage hosts");
                Branch::Stage
            }
        }
    }

    pub fn endpoints(self) -> Endpoints {
        match self {
            Branch::Prod => Endpoints {
                api_base: "https://api.lambdatestinternal.com".to_string(),
                cdn_base: "https://ltbrowserdeploy.lambdatest.com".to_string(),
            },
            Branch::Stage => Endpoints {
                api_base: "https://stage-api.lambdatestinternal.com".to_string(),
                cdn_base: "https://stage-ltbrowserdeploy.lambdatest.com".to_string(),
            },
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Prod => write!(f, "prod"),
            Branch::Stage => write!(f, "stage"),
        }
    }
}

/// API and CDN hosts for one deployment branch, built once at startup and
/// passed by reference into the resolver and provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub cdn_base: String,
}
