//! Target platforms and artifact-extension resolution.
//!
//! A `PlatformId` names a target operating system for which a build
//! artifact can be produced. The supported set is closed: every supported
//! platform has exactly one artifact extension, and asking for the
//! extension of anything else is a configuration error, not a runtime
//! condition.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A target platform identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformId {
    /// 64-bit desktop Windows
    Windows,

    /// 64-bit desktop Linux
    Linux,

    /// macOS application bundle
    MacOS,

    /// Android (recognized identifier, not in the supported build set)
    Android,

    /// iOS (recognized identifier, not in the supported build set)
    Ios,
}

/// Error for a platform outside the closed supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported platform: {platform}")]
pub struct UnsupportedPlatform {
    /// The rejected platform
    pub platform: PlatformId,
}

impl PlatformId {
    /// The closed set of buildable platforms, in canonical order.
    pub fn supported() -> &'static [PlatformId] {
        &[PlatformId::Windows, PlatformId::MacOS, PlatformId::Linux]
    }

    /// Whether this platform is in the supported build set.
    pub fn is_supported(&self) -> bool {
        Self::supported().contains(self)
    }

    /// Resolve the artifact file extension for this platform.
    ///
    /// Total over the supported set; anything else is rejected. Callers
    /// surface the error as-is, it indicates a misconfigured request.
    pub fn artifact_extension(&self) -> Result<&'static str, UnsupportedPlatform> {
        match self {
            PlatformId::Windows => Ok("exe"),
            PlatformId::MacOS => Ok("app"),
            PlatformId::Linux => Ok("x86_64"),
            other => Err(UnsupportedPlatform { platform: *other }),
        }
    }

    /// Directory segment used for this platform's output tree.
    pub fn output_dir_name(&self) -> &'static str {
        match self {
            PlatformId::Windows => "Windows",
            PlatformId::Linux => "Linux",
            PlatformId::MacOS => "MacOS",
            PlatformId::Android => "Android",
            PlatformId::Ios => "iOS",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlatformId::Windows => "windows",
            PlatformId::Linux => "linux",
            PlatformId::MacOS => "macos",
            PlatformId::Android => "android",
            PlatformId::Ios => "ios",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PlatformId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" | "win64" => Ok(PlatformId::Windows),
            "linux" => Ok(PlatformId::Linux),
            "macos" | "mac" | "osx" => Ok(PlatformId::MacOS),
            "android" => Ok(PlatformId::Android),
            "ios" => Ok(PlatformId::Ios),
            _ => Err(format!(
                "unknown platform '{}'; expected one of: windows, linux, macos",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_total_over_supported_set() {
        for platform in PlatformId::supported() {
            assert!(platform.artifact_extension().is_ok());
        }
        assert_eq!(PlatformId::Windows.artifact_extension().unwrap(), "exe");
        assert_eq!(PlatformId::MacOS.artifact_extension().unwrap(), "app");
        assert_eq!(PlatformId::Linux.artifact_extension().unwrap(), "x86_64");
    }

    #[test]
    fn test_extension_rejects_outside_supported_set() {
        let err = PlatformId::Android.artifact_extension().unwrap_err();
        assert_eq!(err.platform, PlatformId::Android);
        assert!(PlatformId::Ios.artifact_extension().is_err());
    }

    #[test]
    fn test_is_supported() {
        assert!(PlatformId::Windows.is_supported());
        assert!(PlatformId::Linux.is_supported());
        assert!(PlatformId::MacOS.is_supported());
        assert!(!PlatformId::Android.is_supported());
        assert!(!PlatformId::Ios.is_supported());
    }

    #[test]
    fn test_parse_and_display_roundtrip() {
        for platform in [
            PlatformId::Windows,
            PlatformId::Linux,
            PlatformId::MacOS,
            PlatformId::Android,
            PlatformId::Ios,
        ] {
            let parsed: PlatformId = platform.to_string().parse().unwrap();
            assert_eq!(parsed, platform);
        }
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("win64".parse::<PlatformId>().unwrap(), PlatformId::Windows);
        assert_eq!("osx".parse::<PlatformId>().unwrap(), PlatformId::MacOS);
        assert!("playstation".parse::<PlatformId>().is_err());
    }
}
