//! Disease name canonicalization.
//!
//! Classifiers trained on different dataset exports spell class names differently
//! (`powdery_mildew`, `Sooty-Mold`, `Die Back`). Every label passes through
//! [`canonicalize`] before it is gated, reported or used for a practice lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Sentinel reported when no trustworthy diagnosis exists.
pub const UNCERTAIN: &str = "Uncertain";

/// The closed set of classes MangoScan knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disease {
    Anthracnose,
    BacterialCanker,
    CuttingWeevil,
    DieBack,
    GallMidge,
    Healthy,
    PowderyMildew,
    SootyMould,
}

impl Disease {
    pub const ALL: [Disease; 8] = [
        Disease::Anthracnose,
        Disease::BacterialCanker,
        Disease::CuttingWeevil,
        Disease::DieBack,
        Disease::GallMidge,
        Disease::Healthy,
        Disease::PowderyMildew,
        Disease::SootyMould,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Disease::Anthracnose => "Anthracnose",
            Disease::BacterialCanker => "Bacterial Canker",
            Disease::CuttingWeevil => "Cutting Weevil",
            Disease::DieBack => "Die Back",
            Disease::GallMidge => "Gall Midge",
            Disease::Healthy => "Healthy",
            Disease::PowderyMildew => "Powdery Mildew",
            Disease::SootyMould => "Sooty Mould",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`canonicalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanonicalName {
    /// The label matched an alias of a known class.
    Known(Disease),
    /// Unknown but non-empty label, e.g. a class added by a retrained model.
    Passthrough(String),
    /// Empty label, or an explicit "uncertain"/"unknown" class.
    Uncertain,
}

impl CanonicalName {
    pub fn as_str(&self) -> &str {
        match self {
            CanonicalName::Known(disease) => disease.as_str(),
            CanonicalName::Passthrough(raw) => raw,
            CanonicalName::Uncertain => UNCERTAIN,
        }
    }

    pub fn into_string(self) -> String {
        match self {
            CanonicalName::Passthrough(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized key -> class. `None` maps to the uncertain sentinel.
static ALIASES: LazyLock<HashMap<&'static str, Option<Disease>>> = LazyLock::new(|| {
    HashMap::from([
        ("anthracnose", Some(Disease::Anthracnose)),
        ("bacterial canker", Some(Disease::BacterialCanker)),
        ("canker", Some(Disease::BacterialCanker)),
        ("cutting weevil", Some(Disease::CuttingWeevil)),
        ("die back", Some(Disease::DieBack)),
        ("dieback", Some(Disease::DieBack)),
        ("gall midge", Some(Disease::GallMidge)),
        ("gallmidge", Some(Disease::GallMidge)),
        ("healthy", Some(Disease::Healthy)),
        ("healthy leaf", Some(Disease::Healthy)),
        ("powdery mildew", Some(Disease::PowderyMildew)),
        ("powdery mildews", Some(Disease::PowderyMildew)),
        ("sooty mould", Some(Disease::SootyMould)),
        ("sooty mold", Some(Disease::SootyMould)),
        ("uncertain", None),
        ("unknown", None),
    ])
});

/// Lowercase, with `-`/`_` runs and whitespace runs collapsed to single spaces.
fn normalize_key(raw: &str) -> String {
    raw.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map a raw classifier label to its canonical name. Total and idempotent.
pub fn canonicalize(raw: &str) -> CanonicalName {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CanonicalName::Uncertain;
    }

    match ALIASES.get(normalize_key(trimmed).as_str()) {
        Some(Some(disease)) => CanonicalName::Known(*disease),
        Some(None) => CanonicalName::Uncertain,
        None => CanonicalName::Passthrough(trimmed.to_string()),
    }
}
