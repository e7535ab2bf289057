//! Unity editor version identifiers
//!
//! A version has the shape `major.minor.patch[type+revision]`, where the
//! type letter is `a` (alpha), `b` (beta) or `f` (final release):
//! - `2020.3.34` / `2020.3.34f1` -> release
//! - `2022.2.0b9` -> beta, revision 9
//! - `2023.1.0a14` -> alpha, revision 14

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::release::error::VersionParseError;

/// Release channel of a version
///
/// Declaration order is the comparison rank: Alpha < Beta < Release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Alpha,
    Beta,
    Release,
}

impl Channel {
    /// Order in which channel listings are enumerated
    pub const LISTING_ORDER: [Channel; 3] = [Channel::Alpha, Channel::Beta, Channel::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Alpha => "alpha",
            Channel::Beta => "beta",
            Channel::Release => "release",
        }
    }

    /// Letter written between patch and revision in the canonical form
    fn suffix(&self) -> Option<char> {
        match self {
            Channel::Alpha => Some('a'),
            Channel::Beta => Some('b'),
            Channel::Release => None,
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a' => Some(Channel::Alpha),
            'b' => Some(Channel::Beta),
            'f' => Some(Channel::Release),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alpha" | "a" => Ok(Channel::Alpha),
            "beta" | "b" => Ok(Channel::Beta),
            "release" | "final" | "f" => Ok(Channel::Release),
            other => Err(format!("unknown channel: {}", other)),
        }
    }
}

/// An immutable Unity version identifier
///
/// Field order matters: the derived `Ord` compares major, minor, patch,
/// channel rank and revision in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnityVersion {
    major: u32,
    minor: u32,
    patch: u32,
    channel: Channel,
    revision: u32,
}

impl UnityVersion {
    /// Creates a version from its parts
    ///
    /// Returns a range error when `revision` is zero. Release versions print
    /// without their revision, so a release with a revision other than 1 does
    /// not survive a format/parse round trip.
    pub fn new(
        major: u32,
        minor: u32,
        patch: u32,
        channel: Channel,
        revision: u32,
    ) -> Result<Self, VersionParseError> {
        if revision == 0 {
            return Err(VersionParseError::Range(
                "revision must be positive".to_string(),
            ));
        }
        Ok(Self {
            major,
            minor,
            patch,
            channel,
            revision,
        })
    }

    /// Creates a release-channel version with revision 1
    pub fn release(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            channel: Channel::Release,
            revision: 1,
        }
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }
}

impl fmt::Display for UnityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(letter) = self.channel.suffix() {
            write!(f, "{}{}", letter, self.revision)?;
        }
        Ok(())
    }
}

/// Parses `major.minor.patch[<letter><revision>]`
///
/// A bare patch is a release with revision 1. `f<n>` keeps its revision even
/// though the canonical text drops it again.
impl FromStr for UnityVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() < 3 {
            return Err(VersionParseError::Format(format!(
                "expected at least 3 segments in '{}'",
                s
            )));
        }

        let major = parse_number(parts[0], "major")?;
        let minor = parse_number(parts[1], "minor")?;
        let (patch, channel, revision) = parse_patch_segment(parts[2])?;

        Self::new(major, minor, patch, channel, revision)
    }
}

/// Splits the third segment into patch, channel and revision
///
/// Exactly one channel letter may appear; without one the whole segment is
/// the patch number of a release version.
fn parse_patch_segment(segment: &str) -> Result<(u32, Channel, u32), VersionParseError> {
    let letters: Vec<char> = ['a', 'b', 'f']
        .into_iter()
        .filter(|letter| segment.contains(*letter))
        .collect();

    match letters.as_slice() {
        [] => Ok((parse_number(segment, "patch")?, Channel::Release, 1)),
        [letter] => {
            let (patch, revision) = segment.split_once(*letter).ok_or_else(|| {
                VersionParseError::Format(format!("malformed patch segment '{}'", segment))
            })?;
            let channel = Channel::from_letter(*letter).ok_or_else(|| {
                VersionParseError::Format(format!("malformed patch segment '{}'", segment))
            })?;
            Ok((
                parse_number(patch, "patch")?,
                channel,
                parse_number(revision, "revision")?,
            ))
        }
        _ => Err(VersionParseError::Format(format!(
            "malformed patch segment '{}'",
            segment
        ))),
    }
}

fn parse_number(text: &str, field: &str) -> Result<u32, VersionParseError> {
    let value: i64 = text.parse().map_err(|_| {
        VersionParseError::Format(format!("{} '{}' is not an integer", field, text))
    })?;
    if value < 0 {
        return Err(VersionParseError::Range(format!(
            "{} must not be negative, got {}",
            field, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| VersionParseError::Range(format!("{} {} is too large", field, value)))
}

impl Serialize for UnityVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Conversion of registry arguments that may be a version or its text form
pub trait IntoVersion {
    fn into_version(self) -> Result<UnityVersion, VersionParseError>;
}

impl IntoVersion for UnityVersion {
    fn into_version(self) -> Result<UnityVersion, VersionParseError> {
        Ok(self)
    }
}

impl IntoVersion for &UnityVersion {
    fn into_version(self) -> Result<UnityVersion, VersionParseError> {
        Ok(*self)
    }
}

impl IntoVersion for &str {
    fn into_version(self) -> Result<UnityVersion, VersionParseError> {
        self.parse()
    }
}

impl IntoVersion for String {
    fn into_version(self) -> Result<UnityVersion, VersionParseError> {
        self.parse()
    }
}

impl IntoVersion for &String {
    fn into_version(self) -> Result<UnityVersion, VersionParseError> {
        self.parse()
    }
}
