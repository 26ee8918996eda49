//! Badges and labels for the domain detail view.

use serde::Serialize;

use super::DomainFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Danger,
    Warning,
    Info,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub content: String,
    pub tone: BadgeTone,
}

impl Badge {
    fn new(content: &str, tone: BadgeTone) -> Self {
        Badge {
            content: content.to_string(),
            tone,
        }
    }
}

/// Hosting platforms the scanner fingerprints for dangling-domain takeovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TakeoverPlatform {
    GitHub,
    Glitch,
    Heroku,
    Netlify,
    Railway,
    Replit,
    Vercel,
}

impl TakeoverPlatform {
    pub const ALL: [TakeoverPlatform; 7] = [
        TakeoverPlatform::GitHub,
        TakeoverPlatform::Glitch,
        TakeoverPlatform::Heroku,
        TakeoverPlatform::Netlify,
        TakeoverPlatform::Railway,
        TakeoverPlatform::Replit,
        TakeoverPlatform::Vercel,
    ];

    /// Identifier as written by the scanner.
    pub fn id(self) -> &'static str {
        match self {
            TakeoverPlatform::GitHub => "github",
            TakeoverPlatform::Glitch => "glitch",
            TakeoverPlatform::Heroku => "heroku",
            TakeoverPlatform::Netlify => "netlify",
            TakeoverPlatform::Railway => "railway",
            TakeoverPlatform::Replit => "replit",
            TakeoverPlatform::Vercel => "vercel",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TakeoverPlatform::GitHub => "GitHub",
            TakeoverPlatform::Glitch => "Glitch",
            TakeoverPlatform::Heroku => "Heroku",
            TakeoverPlatform::Netlify => "Netlify",
            TakeoverPlatform::Railway => "Railway",
            TakeoverPlatform::Replit => "Replit",
            TakeoverPlatform::Vercel => "Vercel",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(id))
    }
}

impl std::fmt::Display for TakeoverPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// What the takeover row should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "platform", rename_all = "lowercase")]
pub enum TakeoverIndication {
    /// Flag set and the platform is recognized.
    Platform(TakeoverPlatform),
    /// Flag set but the platform is missing or unrecognized.
    Generic,
    /// Flag not set. The platform field is ignored.
    None,
}

impl TakeoverIndication {
    pub fn resolve(flags: DomainFlags, platform: Option<&str>) -> Self {
        if !flags.possible_takeover() {
            return TakeoverIndication::None;
        }
        match platform.and_then(TakeoverPlatform::from_id) {
            Some(p) => TakeoverIndication::Platform(p),
            None => TakeoverIndication::Generic,
        }
    }

    pub fn is_flagged(self) -> bool {
        !matches!(self, TakeoverIndication::None)
    }

    pub fn badge(self) -> Badge {
        match self {
            TakeoverIndication::Platform(p) => Badge::new(p.display_name(), BadgeTone::Warning),
            TakeoverIndication::Generic => Badge::new("Possible takeover", BadgeTone::Warning),
            TakeoverIndication::None => Badge::new("No", BadgeTone::Danger),
        }
    }
}

pub fn status_label(flags: DomainFlags) -> &'static str {
    if flags.has_expired() { "Expired" } else { "Active" }
}

pub fn recency_label(flags: DomainFlags) -> &'static str {
    if flags.is_recent() { "Yes" } else { "No" }
}

/// Everything the domain detail modal renders for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainDetails {
    pub label: String,
    pub flags: u64,
    pub expired: bool,
    pub recent: bool,
    pub possible_takeover: bool,
    pub status: Badge,
    pub recency: Badge,
    pub takeover: TakeoverIndication,
    pub takeover_badge: Badge,
}

impl DomainDetails {
    pub fn decode(label: &str, flags: DomainFlags, platform: Option<&str>) -> Self {
        let expired = flags.has_expired();
        let recent = flags.is_recent();
        let takeover = TakeoverIndication::resolve(flags, platform);

        DomainDetails {
            label: label.to_string(),
            flags: flags.bits(),
            expired,
            recent,
            possible_takeover: flags.possible_takeover(),
            status: Badge::new(
                status_label(flags),
                if expired { BadgeTone::Danger } else { BadgeTone::Success },
            ),
            recency: Badge::new(
                recency_label(flags),
                if recent { BadgeTone::Info } else { BadgeTone::Secondary },
            ),
            takeover,
            takeover_badge: takeover.badge(),
        }
    }
}
