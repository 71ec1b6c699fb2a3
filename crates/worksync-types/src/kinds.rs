use std::fmt;

use serde::{Deserialize, Serialize};

/// Language kind of a project.
///
/// A replica can only materialize projects whose language kind has a
/// registered compiler front end; unknown kinds fail synchronization without
/// corrupting the current snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageKind {
    CSharp,
    VisualBasic,
    /// A language this build of worksync has no built-in front end for.
    Other(String),
}

impl LanguageKind {
    /// Display name, also used for front-end registry lookup.
    pub fn name(&self) -> &str {
        match self {
            Self::CSharp => "C#",
            Self::VisualBasic => "Visual Basic",
            Self::Other(name) => name,
        }
    }

    /// Stable tag byte for checksum metadata encoding.
    pub fn tag(&self) -> u8 {
        match self {
            Self::CSharp => 1,
            Self::VisualBasic => 2,
            Self::Other(_) => 255,
        }
    }
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Kind of a document within a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// A compilable source document.
    Source,
    /// An additional (non-compiled) document carried alongside sources.
    Additional,
}

impl DocumentKind {
    /// Stable tag byte for checksum metadata encoding.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Source => 1,
            Self::Additional => 2,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Additional => write!(f, "additional"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_names() {
        assert_eq!(LanguageKind::CSharp.name(), "C#");
        assert_eq!(LanguageKind::VisualBasic.name(), "Visual Basic");
        assert_eq!(LanguageKind::Other("F#".into()).name(), "F#");
    }

    #[test]
    fn language_tags_are_distinct() {
        assert_ne!(LanguageKind::CSharp.tag(), LanguageKind::VisualBasic.tag());
        assert_ne!(
            LanguageKind::CSharp.tag(),
            LanguageKind::Other("F#".into()).tag()
        );
    }

    #[test]
    fn document_kind_tags_are_distinct() {
        assert_ne!(DocumentKind::Source.tag(), DocumentKind::Additional.tag());
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(format!("{}", LanguageKind::CSharp), "C#");
        assert_eq!(format!("{}", DocumentKind::Additional), "additional");
    }

    #[test]
    fn serde_roundtrip() {
        let kind = LanguageKind::Other("F#".into());
        let json = serde_json::to_string(&kind).unwrap();
        let parsed: LanguageKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, parsed);
    }
}
