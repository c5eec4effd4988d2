use std::fmt;

/// Build metadata captured by the build script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub repo_version: &'static str,
    pub build_profile: &'static str,
    pub build_target: &'static str,
    pub build_timestamp: &'static str,
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        repo_version: env!("REPO_VERSION"),
        build_profile: env!("BUILD_PROFILE"),
        build_target: env!("BUILD_TARGET"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chirp {} ({}, {} build for {}, built {})",
            self.version,
            self.repo_version,
            self.build_profile,
            self.build_target,
            self.build_timestamp
        )
    }
}
