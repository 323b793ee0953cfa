//! Compiler versions and `pragma solidity` requirements.
//!
//! Matching is delegated to [`semver`]; this module only adds the parts of
//! the pragma grammar that Cargo-style requirements lack:
//! - A bare version is exact (`0.8.13`), not caret
//! - Whitespace separates conjoined comparators, and an operator may be
//!   followed by a space (`>= 0.6.0 < 0.7.0`)
//! - Hyphen ranges: `0.8.0 - 0.8.19`
//! - Disjunction with `||`
//! - Wildcard components: `0.8.x`, `*`

use anyhow::{anyhow, bail, Result};
use semver::{Comparator, Version};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A concrete compiler version (`major.minor.patch`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SolcVersion(Version);

impl SolcVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    pub fn as_semver(&self) -> &Version {
        &self.0
    }
}

impl fmt::Display for SolcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SolcVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        Version::parse(body).map(Self).map_err(|err| {
            anyhow!(
                "Invalid compiler version \"{}\": expected <major>.<minor>.<patch> ({})",
                s,
                err
            )
        })
    }
}

impl TryFrom<String> for SolcVersion {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SolcVersion> for String {
    fn from(version: SolcVersion) -> Self {
        version.to_string()
    }
}

/// A parsed `pragma solidity` requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReq {
    raw: String,
    /// Disjunction of conjunctions.
    sets: Vec<semver::VersionReq>,
}

impl VersionReq {
    /// Whether `version` satisfies the requirement.
    pub fn matches(&self, version: &SolcVersion) -> bool {
        self.sets.iter().any(|set| set.matches(&version.0))
    }

    /// The requirement as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionReq {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim().to_string();
        if raw.is_empty() {
            bail!("Empty version requirement");
        }

        let sets = raw
            .split("||")
            .map(|alternative| {
                let comparators = parse_conjunction(&raw, alternative)?;
                Ok(semver::VersionReq { comparators })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { raw, sets })
    }
}

const OPERATORS: [&str; 8] = ["", "=", ">", ">=", "<", "<=", "^", "~"];

fn split_operator(term: &str) -> (&str, &str) {
    let end = term
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '^' | '~'))
        .unwrap_or(term.len());
    term.split_at(end)
}

/// Whitespace-separated terms, with a detached operator glued to its version.
fn split_terms(raw: &str, text: &str) -> Result<Vec<String>> {
    let mut words = text.split_whitespace();
    let mut terms = Vec::new();
    while let Some(word) = words.next() {
        let (op, version) = split_operator(word);
        if !op.is_empty() && version.is_empty() {
            match words.next() {
                Some(next) if next != "-" => terms.push(format!("{}{}", op, next)),
                _ => bail!("Invalid version requirement \"{}\": dangling operator", raw),
            }
        } else {
            terms.push(word.to_string());
        }
    }
    Ok(terms)
}

fn parse_conjunction(raw: &str, text: &str) -> Result<Vec<Comparator>> {
    let terms = split_terms(raw, text)?;
    if terms.is_empty() {
        bail!("Invalid version requirement \"{}\": empty alternative", raw);
    }

    let mut comparators = Vec::new();
    let mut i = 0;
    while i < terms.len() {
        let term = terms[i].as_str();
        if term == "-" {
            bail!("Invalid version requirement \"{}\": unexpected '-'", raw);
        }
        let (op, version) = split_operator(term);

        if terms.get(i + 1).map(String::as_str) == Some("-") {
            let upper = match terms.get(i + 2) {
                Some(upper) if op.is_empty() && upper != "-" => upper.as_str(),
                _ => bail!("Invalid version requirement \"{}\": incomplete range", raw),
            };
            let (upper_op, upper) = split_operator(upper);
            if !upper_op.is_empty() {
                bail!("Invalid version requirement \"{}\": operator in range", raw);
            }
            comparators.extend(comparator(raw, ">=", version)?);
            comparators.extend(comparator(raw, "<=", upper)?);
            i += 3;
            continue;
        }

        comparators.extend(comparator(raw, op, version)?);
        i += 1;
    }
    Ok(comparators)
}

fn is_wildcard(component: &str) -> bool {
    matches!(component, "x" | "X" | "*")
}

/// Lower one `<op><version>` term. `None` means the term matches everything.
fn comparator(raw: &str, op: &str, version: &str) -> Result<Option<Comparator>> {
    if !OPERATORS.contains(&op) {
        bail!("Invalid version requirement \"{}\": unknown operator \"{}\"", raw, op);
    }
    let version = version.strip_prefix('v').unwrap_or(version);

    let mut components: Vec<&str> = version.split('.').collect();
    while components.last().is_some_and(|c| is_wildcard(c)) {
        components.pop();
    }
    if components.iter().any(|c| is_wildcard(c)) {
        bail!("Invalid version requirement \"{}\": number after wildcard", raw);
    }

    let text = if components.is_empty() {
        match op {
            // Nothing is above or below every version.
            ">" | "<" => "<0.0.0".to_string(),
            _ => return Ok(None),
        }
    } else {
        let op = if op.is_empty() { "=" } else { op };
        format!("{}{}", op, components.join("."))
    };

    Comparator::parse(&text)
        .map(Some)
        .map_err(|err| anyhow!("Invalid version requirement \"{}\": {}", raw, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SolcVersion {
        s.parse().unwrap()
    }

    fn req(s: &str) -> VersionReq {
        s.parse().unwrap()
    }

    #[test]
    fn test_version_parse_and_order() {
        assert_eq!(v("0.8.13"), SolcVersion::new(0, 8, 13));
        assert_eq!(v("v0.8.13"), SolcVersion::new(0, 8, 13));
        assert!(v("0.8.13") > v("0.8.6"));
        assert!("0.8".parse::<SolcVersion>().is_err());
        assert!("0.8.x".parse::<SolcVersion>().is_err());
        assert!("latest".parse::<SolcVersion>().is_err());
    }

    #[test]
    fn test_version_serde() {
        let json = serde_json::to_string(&v("0.8.13")).unwrap();
        assert_eq!(json, "\"0.8.13\"");
        let back: SolcVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SolcVersion::new(0, 8, 13));
        assert!(serde_json::from_str::<SolcVersion>("\"0.8\"").is_err());
    }

    #[test]
    fn test_bare_version_is_exact() {
        let r = req("0.8.13");
        assert!(r.matches(&v("0.8.13")));
        assert!(!r.matches(&v("0.8.14")));
        assert!(req("=0.8.13").matches(&v("0.8.13")));
    }

    #[test]
    fn test_caret() {
        let r = req("^0.8.0");
        assert!(r.matches(&v("0.8.0")));
        assert!(r.matches(&v("0.8.13")));
        assert!(!r.matches(&v("0.9.0")));
        assert!(!r.matches(&v("0.7.6")));

        let r = req("^0.0.3");
        assert!(r.matches(&v("0.0.3")));
        assert!(!r.matches(&v("0.0.4")));
    }

    #[test]
    fn test_tilde_and_partial() {
        assert!(req("~0.8.4").matches(&v("0.8.19")));
        assert!(!req("~0.8.4").matches(&v("0.8.3")));
        assert!(req("0.8").matches(&v("0.8.6")));
        assert!(!req("0.8").matches(&v("0.9.0")));
        assert!(req("0.8.x").matches(&v("0.8.0")));
        assert!(req("*").matches(&v("0.4.24")));
        assert!(!req(">*").matches(&v("0.4.24")));
    }

    #[test]
    fn test_ranges_and_disjunction() {
        let r = req(">=0.8.0 <0.8.12");
        assert!(r.matches(&v("0.8.11")));
        assert!(!r.matches(&v("0.8.13")));

        let r = req(">= 0.6.0 < 0.7.0 || ^0.8.0");
        assert!(r.matches(&v("0.6.12")));
        assert!(r.matches(&v("0.8.6")));
        assert!(!r.matches(&v("0.7.6")));

        let r = req("0.8.0 - 0.8.11");
        assert!(r.matches(&v("0.8.11")));
        assert!(!r.matches(&v("0.8.13")));

        assert!(req("<=0.8").matches(&v("0.8.19")));
        assert!(!req(">0.8").matches(&v("0.8.19")));
    }

    #[test]
    fn test_invalid_requirements() {
        assert!("".parse::<VersionReq>().is_err());
        assert!(">=".parse::<VersionReq>().is_err());
        assert!("^0.8.0 abc".parse::<VersionReq>().is_err());
        assert!("0.8.0 -".parse::<VersionReq>().is_err());
        assert!("- 0.8.0".parse::<VersionReq>().is_err());
        assert!(">=0.8.0 - 0.9.0".parse::<VersionReq>().is_err());
        assert!("0.x.1".parse::<VersionReq>().is_err());
        assert!("|| 0.8.0".parse::<VersionReq>().is_err());
    }

    #[test]
    fn test_empty_alternative_is_rejected() {
        let err = "^0.6.0 ||".parse::<VersionReq>().unwrap_err();
        assert!(err.to_string().contains("empty alternative"), "{err}");
        assert!("^0.6.0 || || ^0.8.0".parse::<VersionReq>().is_err());
        assert!("||".parse::<VersionReq>().is_err());
    }

    #[test]
    fn test_huge_components_do_not_overflow() {
        let max = u64::MAX;
        let r = req(&format!("^{}", max));
        assert!(r.matches(&SolcVersion::new(max, 3, 0)));
        assert!(!r.matches(&v("0.8.13")));

        let r = req(&format!("~{}.{}", max, max));
        assert!(r.matches(&SolcVersion::new(max, max, 7)));

        let r = req(&format!("<={}.{}", max, max));
        assert!(r.matches(&v("0.8.13")));
        assert!(!req(&format!(">{}", max)).matches(&v("0.8.13")));
    }
}
