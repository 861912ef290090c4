//! Package reference detection in source text
//!
//! Each detector pairs an ecosystem with an import-statement pattern and a
//! function that maps the captured module path onto a package name. The match
//! that starts earliest in the text wins.

use super::Ecosystem;
use regex::Regex;
use std::sync::LazyLock;

/// A package name together with the ecosystem it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub name: String,
    pub ecosystem: Ecosystem,
}

/// Single Go import: `import "x"` or `import alias "x"`
static GO_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bimport\s+(?:[\w.]+\s+)?"([^"\s]+)""#).unwrap());

/// Grouped Go imports: `import ( ... )`
static GO_IMPORT_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\bimport\s*\((.*?)\)").unwrap());

static GO_QUOTED_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\s]+)""#).unwrap());

/// ES imports, dynamic imports and CommonJS requires
static JS_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bimport\s+(?:[\w*${},\s]+\s+from\s+)?['"]([^'"\s]+)['"]|\b(?:require|import)\(\s*['"]([^'"\s]+)['"]\s*\)"#,
    )
    .unwrap()
});

/// `from x.y import z` and bare `import x.y [as z]` lines
static PYTHON_IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*from[ \t]+([A-Za-z_]\w*)(?:\.\w+)*[ \t]+import\b|^[ \t]*import[ \t]+([A-Za-z_]\w*)(?:\.\w+)*(?:[ \t]+as[ \t]+\w+)?[ \t]*(?:,[^\n]*)?$",
    )
    .unwrap()
});

/// `use krate::...` and `extern crate krate`
static RUST_USE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+([a-z_][a-z0-9_]*)::|\bextern[ \t]+crate[ \t]+([a-z_][a-z0-9_]*)")
        .unwrap()
});

/// `require 'x'` and Gemfile `gem 'x'`
static RUBY_REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*(?:require|gem)[ \t]+['"]([^'"\s]+)['"]"#).unwrap()
});

const NODE_BUILTINS: &[&str] = &[
    "assert", "buffer", "child_process", "crypto", "events", "fs", "http", "https", "net", "os",
    "path", "process", "stream", "url", "util", "zlib",
];

const PYTHON_STDLIB: &[&str] = &[
    "__future__", "abc", "asyncio", "collections", "dataclasses", "datetime", "enum", "functools",
    "io", "itertools", "json", "logging", "math", "os", "pathlib", "random", "re", "subprocess",
    "sys", "time", "typing", "unittest",
];

const RUST_BUILTIN_ROOTS: &[&str] = &["alloc", "core", "crate", "self", "std", "super"];

const RUBY_STDLIB: &[&str] = &[
    "csv", "date", "digest", "fileutils", "json", "logger", "net", "open-uri", "pp", "securerandom",
    "set", "time", "uri", "yaml",
];

struct Detector {
    ecosystem: Ecosystem,
    find: fn(&str) -> Option<(usize, String)>,
}

/// Detectors in tie-break order for matches starting at the same offset
const DETECTORS: [Detector; 5] = [
    Detector {
        ecosystem: Ecosystem::Go,
        find: find_go,
    },
    Detector {
        ecosystem: Ecosystem::Npm,
        find: |text| first_capture(&JS_IMPORT_RE, text, npm_package),
    },
    Detector {
        ecosystem: Ecosystem::Pypi,
        find: |text| first_capture(&PYTHON_IMPORT_RE, text, python_package),
    },
    Detector {
        ecosystem: Ecosystem::Crates,
        find: |text| first_capture(&RUST_USE_RE, text, rust_package),
    },
    Detector {
        ecosystem: Ecosystem::Rubygems,
        find: |text| first_capture(&RUBY_REQUIRE_RE, text, ruby_package),
    },
];

/// Finds the first third-party package referenced by an import statement
///
/// Relative imports and standard library modules are ignored.
///
/// # Example
///
/// ```
/// use docweave::resolver::{detect_package, Ecosystem};
///
/// let found = detect_package("import axios from 'axios';").unwrap();
/// assert_eq!(found.name, "axios");
/// assert_eq!(found.ecosystem, Ecosystem::Npm);
/// ```
pub fn detect_package(text: &str) -> Option<PackageRef> {
    let found = DETECTORS
        .iter()
        .filter_map(|detector| {
            (detector.find)(text).map(|(start, name)| {
                (
                    start,
                    PackageRef {
                        name,
                        ecosystem: detector.ecosystem,
                    },
                )
            })
        })
        .min_by_key(|(start, _)| *start)
        .map(|(_, package)| package);

    if let Some(package) = &found {
        tracing::debug!("Detected {} package {}", package.ecosystem, package.name);
    }
    found
}

/// Offset and package name of the first capture accepted by `package`
fn first_capture(
    pattern: &Regex,
    text: &str,
    package: fn(&str) -> Option<String>,
) -> Option<(usize, String)> {
    pattern.captures_iter(text).find_map(|caps| {
        let module = caps.iter().skip(1).flatten().next()?;
        let name = package(module.as_str())?;
        caps.get(0).map(|whole| (whole.start(), name))
    })
}

fn find_go(text: &str) -> Option<(usize, String)> {
    let single = first_capture(&GO_IMPORT_RE, text, go_package);
    let grouped = GO_IMPORT_BLOCK_RE.captures_iter(text).find_map(|caps| {
        let block = caps.get(1)?;
        GO_QUOTED_PATH_RE
            .captures_iter(block.as_str())
            .find_map(|inner| {
                let path = inner.get(1)?;
                go_package(path.as_str()).map(|name| (block.start() + path.start(), name))
            })
    });

    [single, grouped]
        .into_iter()
        .flatten()
        .min_by_key(|(start, _)| *start)
}

fn go_package(path: &str) -> Option<String> {
    // Standard library paths have no domain in the first segment
    let first = path.split('/').next()?;
    first.contains('.').then(|| path.to_string())
}

fn npm_package(specifier: &str) -> Option<String> {
    if specifier.starts_with('.') || specifier.starts_with('/') || specifier.starts_with("node:") {
        return None;
    }

    let mut segments = specifier.split('/');
    let first = segments.next()?;
    let name = if first.starts_with('@') {
        format!("{}/{}", first, segments.next()?)
    } else {
        first.to_string()
    };

    (!NODE_BUILTINS.contains(&name.as_str())).then_some(name)
}

fn python_package(module: &str) -> Option<String> {
    (!PYTHON_STDLIB.contains(&module)).then(|| module.to_string())
}

fn rust_package(root: &str) -> Option<String> {
    (!RUST_BUILTIN_ROOTS.contains(&root)).then(|| root.to_string())
}

fn ruby_package(feature: &str) -> Option<String> {
    let first = feature.split('/').next()?;
    (!RUBY_STDLIB.contains(&first)).then(|| first.to_string())
}
