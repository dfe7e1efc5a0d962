// Compound field decoding: "WxH", "Name Version Arch", "Name Version"

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Decode failure for a compound string field. `field` names the wire field
/// the value came from so a rejected batch can be traced to its cause.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {field} value: {cause}")]
pub struct DecodeError {
    pub field: &'static str,
    pub cause: String,
}

impl DecodeError {
    fn new(field: &'static str, cause: impl Into<String>) -> Self {
        Self {
            field,
            cause: cause.into(),
        }
    }
}

/// Screen or viewport size, encoded on the wire as `"<width>x<height>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl TryFrom<String> for Resolution {
    type Error = DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl TryFrom<&str> for Resolution {
    type Error = DecodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = s.split('x').collect();
        let [w, h] = parts.as_slice() else {
            return Err(DecodeError::new(
                "resolution",
                format!("expected <width>x<height>, got {s:?}"),
            ));
        };
        let width = w
            .parse::<u32>()
            .map_err(|e| DecodeError::new("resolution", format!("width {w:?}: {e}")))?;
        let height = h
            .parse::<u32>()
            .map_err(|e| DecodeError::new("resolution", format!("height {h:?}: {e}")))?;
        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<Resolution> for String {
    fn from(r: Resolution) -> Self {
        r.to_string()
    }
}

/// OS descriptor, encoded as `"<name...> <version> <architecture>"`.
/// The name may itself contain spaces ("OS X 10.15.7 64-bit").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform {
    pub name: String,
    pub version: String,
    pub architecture: String,
}

impl TryFrom<String> for Platform {
    type Error = DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl TryFrom<&str> for Platform {
    type Error = DecodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = s.split(' ').collect();
        if parts.len() < 3 {
            return Err(DecodeError::new(
                "platform",
                format!("expected <name> <version> <architecture>, got {s:?}"),
            ));
        }
        let architecture = parts[parts.len() - 1].to_string();
        let version = parts[parts.len() - 2].to_string();
        // Strip the trailing " <version> <architecture>" so internal spaces
        // in the name survive.
        let name = s[..s.len() - architecture.len() - version.len() - 2].to_string();
        Ok(Self {
            name,
            version,
            architecture,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.version, self.architecture)
    }
}

impl From<Platform> for String {
    fn from(p: Platform) -> Self {
        p.to_string()
    }
}

/// Browser descriptor, encoded as `"<name...> <version>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BrowserClient {
    pub name: String,
    pub version: String,
}

impl TryFrom<String> for BrowserClient {
    type Error = DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_from(s.as_str())
    }
}

impl TryFrom<&str> for BrowserClient {
    type Error = DecodeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = s.split(' ').collect();
        if parts.len() < 2 {
            return Err(DecodeError::new(
                "browserClient",
                format!("expected <name> <version>, got {s:?}"),
            ));
        }
        let version = parts[parts.len() - 1].to_string();
        let name = s[..s.len() - version.len() - 1].to_string();
        Ok(Self { name, version })
    }
}

impl fmt::Display for BrowserClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

impl From<BrowserClient> for String {
    fn from(b: BrowserClient) -> Self {
        b.to_string()
    }
}
