//! Seed URL resolution for package names
//!
//! Maps a subject and an optional ecosystem tag onto the documentation or
//! registry page the crawl starts from. Unknown or missing tags fall back to
//! npm.

mod detect;

pub use detect::{detect_package, PackageRef};

use crate::{UrlError, UrlResult};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// Package ecosystems with a known documentation location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Ecosystem {
    #[default]
    Npm,
    Pypi,
    Crates,
    Go,
    Rubygems,
    Hex,
    Packagist,
    Nuget,
    Maven,
}

/// Returned when an ecosystem tag matches no known ecosystem or alias
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown ecosystem: '{0}'")]
pub struct UnknownEcosystem(pub String);

impl Ecosystem {
    pub const ALL: [Ecosystem; 9] = [
        Self::Npm,
        Self::Pypi,
        Self::Crates,
        Self::Go,
        Self::Rubygems,
        Self::Hex,
        Self::Packagist,
        Self::Nuget,
        Self::Maven,
    ];

    /// Canonical lowercase tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Pypi => "pypi",
            Self::Crates => "crates",
            Self::Go => "go",
            Self::Rubygems => "rubygems",
            Self::Hex => "hex",
            Self::Packagist => "packagist",
            Self::Nuget => "nuget",
            Self::Maven => "maven",
        }
    }

    /// Builds the documentation URL for a package in this ecosystem
    pub fn doc_url(&self, name: &str) -> UrlResult<Url> {
        let raw = match self {
            Self::Npm => format!("https://www.npmjs.com/package/{}", name),
            Self::Pypi => format!("https://pypi.org/project/{}/", name),
            Self::Crates => format!(
                "https://docs.rs/{}/latest/{}/",
                name,
                name.replace('-', "_")
            ),
            Self::Go => format!("https://pkg.go.dev/{}", name),
            Self::Rubygems => format!("https://rubydoc.info/gems/{}", name),
            Self::Hex => format!("https://hexdocs.pm/{}/", name),
            Self::Packagist => format!("https://packagist.org/packages/{}", name),
            Self::Nuget => format!("https://www.nuget.org/packages/{}", name),
            Self::Maven => match name.split_once(':') {
                Some((group, artifact)) => format!(
                    "https://central.sonatype.com/artifact/{}/{}",
                    group, artifact
                ),
                None => {
                    let mut url = Url::parse("https://central.sonatype.com/search")
                        .map_err(|e| UrlError::Parse(e.to_string()))?;
                    url.query_pairs_mut().append_pair("q", name);
                    return Ok(url);
                }
            },
        };

        Url::parse(&raw).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))
    }
}

impl FromStr for Ecosystem {
    type Err = UnknownEcosystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ecosystem = match s.trim().to_ascii_lowercase().as_str() {
            "npm" | "node" | "js" | "javascript" | "ts" | "typescript" => Self::Npm,
            "pypi" | "pip" | "python" | "py" => Self::Pypi,
            "crates" | "crates.io" | "cargo" | "rust" | "rs" => Self::Crates,
            "go" | "golang" => Self::Go,
            "rubygems" | "gem" | "gems" | "ruby" | "rb" => Self::Rubygems,
            "hex" | "elixir" | "erlang" => Self::Hex,
            "packagist" | "composer" | "php" => Self::Packagist,
            "nuget" | "dotnet" | ".net" | "csharp" | "c#" => Self::Nuget,
            "maven" | "java" | "kotlin" | "jvm" => Self::Maven,
            _ => return Err(UnknownEcosystem(s.to_string())),
        };
        Ok(ecosystem)
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a subject to its seed documentation URL
///
/// An unknown or absent `ecosystem` tag resolves through npm.
///
/// # Example
///
/// ```
/// use docweave::resolver::resolve;
///
/// let seed = resolve("serde-json", Some("rust")).unwrap();
/// assert_eq!(seed.as_str(), "https://docs.rs/serde-json/latest/serde_json/");
///
/// let seed = resolve("react", Some("unknown")).unwrap();
/// assert_eq!(seed.as_str(), "https://www.npmjs.com/package/react");
/// ```
pub fn resolve(subject: &str, ecosystem: Option<&str>) -> UrlResult<Url> {
    let name = subject.trim();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(UrlError::InvalidSubject(subject.to_string()));
    }

    let ecosystem = match ecosystem {
        Some(tag) => tag.parse().unwrap_or_else(|e: UnknownEcosystem| {
            tracing::warn!("{}, falling back to {}", e, Ecosystem::default());
            Ecosystem::default()
        }),
        None => Ecosystem::default(),
    };

    let url = ecosystem.doc_url(name)?;
    tracing::debug!("Resolved {} ({}) to {}", name, ecosystem, url);
    Ok(url)
}
