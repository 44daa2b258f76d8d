//! Status resolution for table cells.
//!
//! Every status column in the dashboard reduces a raw value (a string from the
//! backend, a pair of flags, a score) to the same presentation triple: a
//! label, a [`ColorKind`] and an [`IconKind`]. The view layer only renders
//! that triple.
//!
//! Unrecognized values are governed by [`UnknownStatusPolicy`]. The default
//! is permissive: the cell shows a visible "Unknown" fallback instead of an
//! empty tag.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// Presentation enums
// ============================================

/// Semantic color of a status cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorKind {
    Success,
    Info,
    Warning,
    Danger,
    Neutral,
}

impl ColorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorKind::Success => "success",
            ColorKind::Info => "info",
            ColorKind::Warning => "warning",
            ColorKind::Danger => "danger",
            ColorKind::Neutral => "neutral",
        }
    }

    /// Palette value used by the web dashboard
    pub fn hex(&self) -> &'static str {
        match self {
            ColorKind::Success => "#52c41a",
            ColorKind::Info => "#1890ff",
            ColorKind::Warning => "#faad14",
            ColorKind::Danger => "#ff4d4f",
            ColorKind::Neutral => "#8c8c8c",
        }
    }
}

/// Icon shown next to a status label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    Check,
    Close,
    Warning,
    /// Rotating sync arrows (integration in progress)
    Sync,
    /// Loading spinner (work in progress)
    Spinner,
    Clock,
    Question,
    Thunderbolt,
    FieldTime,
    Desktop,
    Mobile,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Check => "check",
            IconKind::Close => "close",
            IconKind::Warning => "warning",
            IconKind::Sync => "sync",
            IconKind::Spinner => "spinner",
            IconKind::Clock => "clock",
            IconKind::Question => "question",
            IconKind::Thunderbolt => "thunderbolt",
            IconKind::FieldTime => "field_time",
            IconKind::Desktop => "desktop",
            IconKind::Mobile => "mobile",
        }
    }

    /// Whether the icon animates
    pub fn is_spinning(&self) -> bool {
        matches!(self, IconKind::Sync | IconKind::Spinner)
    }

    /// Terminal-friendly glyph
    pub fn glyph(&self) -> &'static str {
        match self {
            IconKind::Check => "✓",
            IconKind::Close => "✗",
            IconKind::Warning => "!",
            IconKind::Sync => "↻",
            IconKind::Spinner => "…",
            IconKind::Clock => "◷",
            IconKind::Question => "?",
            IconKind::Thunderbolt => "⚡",
            IconKind::FieldTime => "◴",
            IconKind::Desktop => "▭",
            IconKind::Mobile => "▯",
        }
    }
}

/// Icon for a render device label ("Desktop" or anything else as mobile).
pub fn device_icon(device: &str) -> IconKind {
    if device.trim().eq_ignore_ascii_case("desktop") {
        IconKind::Desktop
    } else {
        IconKind::Mobile
    }
}

/// Resolved presentation of a status value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub label: String,
    pub color: ColorKind,
    pub icon: IconKind,
    /// Longer explanation for tooltips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl StatusDisplay {
    fn new(label: impl Into<String>, color: ColorKind, icon: IconKind) -> Self {
        Self {
            label: label.into(),
            color,
            icon,
            description: None,
        }
    }

    fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

impl fmt::Display for StatusDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon.glyph(), self.label)
    }
}

// ============================================
// Status vocabularies
// ============================================

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace('_', "-")
}

fn unknown(kind: StatusKind, raw: &str) -> Error {
    Error::UnknownStatus {
        kind: kind.as_str(),
        value: raw.to_string(),
    }
}

/// Whether a domain's connection to the caching service works
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Active,
    Pending,
    Error,
}

impl IntegrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::Active => "active",
            IntegrationStatus::Pending => "pending",
            IntegrationStatus::Error => "error",
        }
    }

    pub fn display(&self) -> StatusDisplay {
        match self {
            IntegrationStatus::Active => {
                StatusDisplay::new("Active", ColorKind::Success, IconKind::Check)
            }
            IntegrationStatus::Pending => {
                StatusDisplay::new("Integrating", ColorKind::Info, IconKind::Sync)
            }
            IntegrationStatus::Error => {
                StatusDisplay::new("Error", ColorKind::Danger, IconKind::Close)
            }
        }
    }
}

impl FromStr for IntegrationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "active" => Ok(IntegrationStatus::Active),
            "pending" => Ok(IntegrationStatus::Pending),
            "error" => Ok(IntegrationStatus::Error),
            _ => Err(unknown(StatusKind::Integration, s)),
        }
    }
}

/// Outcome of the automated "does a missing page return 404" check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotFoundCheck {
    pub reachable: bool,
    pub returns_404: bool,
}

/// Category derived from a [`NotFoundCheck`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundCategory {
    Unreachable,
    Correct,
    Incorrect,
}

impl NotFoundCheck {
    pub fn category(&self) -> NotFoundCategory {
        if !self.reachable {
            NotFoundCategory::Unreachable
        } else if self.returns_404 {
            NotFoundCategory::Correct
        } else {
            NotFoundCategory::Incorrect
        }
    }

    pub fn display(&self) -> StatusDisplay {
        match self.category() {
            NotFoundCategory::Unreachable => {
                StatusDisplay::new("Unreachable", ColorKind::Danger, IconKind::Close)
            }
            NotFoundCategory::Correct => {
                StatusDisplay::new("Correct", ColorKind::Success, IconKind::Check)
            }
            NotFoundCategory::Incorrect => {
                StatusDisplay::new("Incorrect", ColorKind::Warning, IconKind::Warning)
            }
        }
    }
}

/// State of a URL in the caching queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueItemStatus {
    Queued,
    Caching,
}

impl QueueItemStatus {
    pub fn display(&self) -> StatusDisplay {
        match self {
            QueueItemStatus::Caching => {
                StatusDisplay::new("Caching", ColorKind::Info, IconKind::Spinner)
            }
            QueueItemStatus::Queued => {
                StatusDisplay::new("Queued", ColorKind::Warning, IconKind::Clock)
            }
        }
    }
}

impl FromStr for QueueItemStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "queued" => Ok(QueueItemStatus::Queued),
            "caching" => Ok(QueueItemStatus::Caching),
            _ => Err(unknown(StatusKind::Queue, s)),
        }
    }
}

/// Rollup of how well the pages listed in a sitemap render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SitemapHealth {
    Healthy,
    Warning,
    Error,
    Unknown,
}

impl SitemapHealth {
    pub fn display(&self) -> StatusDisplay {
        match self {
            SitemapHealth::Healthy => {
                StatusDisplay::new("Healthy", ColorKind::Success, IconKind::Check)
                    .with_description("All pages in this sitemap are working correctly")
            }
            SitemapHealth::Warning => {
                StatusDisplay::new("Warning", ColorKind::Warning, IconKind::Warning)
                    .with_description("Some pages might be loading slowly or have minor issues")
            }
            SitemapHealth::Error => StatusDisplay::new("Error", ColorKind::Danger, IconKind::Close)
                .with_description("Some pages are not working - immediate attention needed"),
            SitemapHealth::Unknown => {
                StatusDisplay::new("Unknown", ColorKind::Neutral, IconKind::Question)
                    .with_description("Status unknown")
            }
        }
    }
}

impl FromStr for SitemapHealth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "healthy" => Ok(SitemapHealth::Healthy),
            "warning" => Ok(SitemapHealth::Warning),
            "error" => Ok(SitemapHealth::Error),
            "unknown" => Ok(SitemapHealth::Unknown),
            _ => Err(unknown(StatusKind::SitemapHealth, s)),
        }
    }
}

/// Result of a single prerender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOutcome {
    Success,
    Failed,
}

impl RenderOutcome {
    /// The label is the HTTP status code the render produced.
    pub fn display(&self, status_code: u16) -> StatusDisplay {
        match self {
            RenderOutcome::Success => {
                StatusDisplay::new(status_code.to_string(), ColorKind::Success, IconKind::Check)
            }
            RenderOutcome::Failed => {
                StatusDisplay::new(status_code.to_string(), ColorKind::Danger, IconKind::Close)
            }
        }
    }
}

impl FromStr for RenderOutcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "success" => Ok(RenderOutcome::Success),
            "failed" => Ok(RenderOutcome::Failed),
            _ => Err(unknown(StatusKind::Render, s)),
        }
    }
}

/// Which queue lane a URL sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePriority {
    /// Manually promoted
    High,
    /// Scheduled by automatic recaching
    Normal,
}

impl QueuePriority {
    pub fn display(&self) -> StatusDisplay {
        match self {
            QueuePriority::High => {
                StatusDisplay::new("Priority", ColorKind::Danger, IconKind::Thunderbolt)
            }
            QueuePriority::Normal => {
                StatusDisplay::new("Automatic", ColorKind::Neutral, IconKind::FieldTime)
            }
        }
    }
}

impl FromStr for QueuePriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "high" => Ok(QueuePriority::High),
            "normal" => Ok(QueuePriority::Normal),
            _ => Err(unknown(StatusKind::Priority, s)),
        }
    }
}

/// How a URL query parameter affects the cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterRule {
    Use,
    Ignore,
    AlwaysIgnore,
}

impl ParameterRule {
    pub fn display(&self) -> StatusDisplay {
        match self {
            ParameterRule::Use => {
                StatusDisplay::new("Use for caching", ColorKind::Success, IconKind::Check)
                    .with_description("Parameter is part of the cache key")
            }
            ParameterRule::Ignore => {
                StatusDisplay::new("Ignore when caching", ColorKind::Warning, IconKind::Warning)
                    .with_description("Parameter will be removed before caching the URL")
            }
            ParameterRule::AlwaysIgnore => {
                StatusDisplay::new("Always ignored", ColorKind::Neutral, IconKind::Close)
            }
        }
    }
}

impl FromStr for ParameterRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "use" => Ok(ParameterRule::Use),
            "ignore" => Ok(ParameterRule::Ignore),
            "always-ignore" => Ok(ParameterRule::AlwaysIgnore),
            _ => Err(unknown(StatusKind::ParameterRule, s)),
        }
    }
}

/// SEO score tag. Scores above 100 are out of range.
pub fn seo_score_display(score: u8) -> Option<StatusDisplay> {
    let color = match score {
        90..=100 => ColorKind::Success,
        70..=89 => ColorKind::Warning,
        0..=69 => ColorKind::Danger,
        _ => return None,
    };
    let icon = match color {
        ColorKind::Success => IconKind::Check,
        ColorKind::Warning => IconKind::Warning,
        _ => IconKind::Close,
    };
    Some(StatusDisplay::new(score.to_string(), color, icon))
}

// ============================================
// Resolver
// ============================================

/// Which status column a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Integration,
    NotFound,
    Queue,
    SitemapHealth,
    Render,
    Priority,
    ParameterRule,
    SeoScore,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Integration => "integration",
            StatusKind::NotFound => "notfound",
            StatusKind::Queue => "queue",
            StatusKind::SitemapHealth => "sitemap health",
            StatusKind::Render => "render",
            StatusKind::Priority => "priority",
            StatusKind::ParameterRule => "parameter rule",
            StatusKind::SeoScore => "seo score",
        }
    }

    /// Fallback shown for values outside the vocabulary
    fn fallback(&self) -> StatusDisplay {
        match self {
            StatusKind::SitemapHealth => SitemapHealth::Unknown.display(),
            StatusKind::Queue => StatusDisplay::new("Unknown", ColorKind::Warning, IconKind::Clock),
            _ => StatusDisplay::new("Unknown", ColorKind::Warning, IconKind::Warning),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw status value tagged with its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRecord<'a> {
    Integration(&'a str),
    NotFound(NotFoundCheck),
    Queue(&'a str),
    SitemapHealth(&'a str),
    Render { status: &'a str, status_code: u16 },
    Priority(&'a str),
    ParameterRule(&'a str),
    SeoScore(u8),
}

impl StatusRecord<'_> {
    pub fn kind(&self) -> StatusKind {
        match self {
            StatusRecord::Integration(_) => StatusKind::Integration,
            StatusRecord::NotFound(_) => StatusKind::NotFound,
            StatusRecord::Queue(_) => StatusKind::Queue,
            StatusRecord::SitemapHealth(_) => StatusKind::SitemapHealth,
            StatusRecord::Render { .. } => StatusKind::Render,
            StatusRecord::Priority(_) => StatusKind::Priority,
            StatusRecord::ParameterRule(_) => StatusKind::ParameterRule,
            StatusRecord::SeoScore(_) => StatusKind::SeoScore,
        }
    }
}

/// What to do with a value outside a status vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownStatusPolicy {
    /// Show the kind's "Unknown" fallback
    #[default]
    Permissive,
    /// Return [`Error::UnknownStatus`]
    Strict,
}

/// Maps status records to their presentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver {
    pub policy: UnknownStatusPolicy,
}

impl StatusResolver {
    pub fn new(policy: UnknownStatusPolicy) -> Self {
        Self { policy }
    }

    pub fn strict() -> Self {
        Self::new(UnknownStatusPolicy::Strict)
    }

    pub fn resolve(&self, record: &StatusRecord<'_>) -> Result<StatusDisplay> {
        let resolved = match *record {
            StatusRecord::Integration(raw) => raw.parse::<IntegrationStatus>().map(|s| s.display()),
            StatusRecord::NotFound(check) => Ok(check.display()),
            StatusRecord::Queue(raw) => raw.parse::<QueueItemStatus>().map(|s| s.display()),
            StatusRecord::SitemapHealth(raw) => raw.parse::<SitemapHealth>().map(|s| s.display()),
            StatusRecord::Render {
                status,
                status_code,
            } => status
                .parse::<RenderOutcome>()
                .map(|s| s.display(status_code)),
            StatusRecord::Priority(raw) => raw.parse::<QueuePriority>().map(|s| s.display()),
            StatusRecord::ParameterRule(raw) => raw.parse::<ParameterRule>().map(|s| s.display()),
            StatusRecord::SeoScore(score) => seo_score_display(score)
                .ok_or_else(|| unknown(StatusKind::SeoScore, &score.to_string())),
        };

        match resolved {
            Err(Error::UnknownStatus { kind, value })
                if self.policy == UnknownStatusPolicy::Permissive =>
            {
                tracing::warn!(kind, value = %value, "unknown status value, using fallback");
                Ok(record.kind().fallback())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permissive(record: StatusRecord<'_>) -> StatusDisplay {
        StatusResolver::default().resolve(&record).unwrap()
    }

    #[test]
    fn test_integration_statuses() {
        let active = permissive(StatusRecord::Integration("active"));
        assert_eq!(
            (active.color, active.icon, active.label.as_str()),
            (ColorKind::Success, IconKind::Check, "Active")
        );

        let pending = permissive(StatusRecord::Integration("pending"));
        assert_eq!(
            (pending.color, pending.icon, pending.label.as_str()),
            (ColorKind::Info, IconKind::Sync, "Integrating")
        );
        assert!(pending.icon.is_spinning());

        let error = permissive(StatusRecord::Integration("error"));
        assert_eq!(
            (error.color, error.icon, error.label.as_str()),
            (ColorKind::Danger, IconKind::Close, "Error")
        );
    }

    #[test]
    fn test_integration_unknown_fallback() {
        let other = permissive(StatusRecord::Integration("suspended"));
        assert_eq!(other.color, ColorKind::Warning);
        assert_eq!(other.icon, IconKind::Warning);
        assert_eq!(other.label, "Unknown");
    }

    #[test]
    fn test_strict_rejects_unknown() {
        let err = StatusResolver::strict()
            .resolve(&StatusRecord::Integration("suspended"))
            .unwrap_err();
        match err {
            Error::UnknownStatus { kind, value } => {
                assert_eq!(kind, "integration");
                assert_eq!(value, "suspended");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_values_are_case_insensitive() {
        assert_eq!(
            permissive(StatusRecord::Integration(" Active ")).label,
            "Active"
        );
        assert_eq!(
            permissive(StatusRecord::ParameterRule("always_ignore")).label,
            "Always ignored"
        );
    }

    #[test]
    fn test_not_found_unreachable_wins() {
        for returns_404 in [true, false] {
            let display = permissive(StatusRecord::NotFound(NotFoundCheck {
                reachable: false,
                returns_404,
            }));
            assert_eq!(display.label, "Unreachable");
            assert_eq!(display.color, ColorKind::Danger);
            assert_eq!(display.icon, IconKind::Close);
        }
    }

    #[test]
    fn test_not_found_correct_and_incorrect() {
        let correct = permissive(StatusRecord::NotFound(NotFoundCheck {
            reachable: true,
            returns_404: true,
        }));
        assert_eq!(correct.label, "Correct");
        assert_eq!(correct.color, ColorKind::Success);

        let incorrect = permissive(StatusRecord::NotFound(NotFoundCheck {
            reachable: true,
            returns_404: false,
        }));
        assert_eq!(incorrect.label, "Incorrect");
        assert_eq!(incorrect.icon, IconKind::Warning);
    }

    #[test]
    fn test_queue_statuses() {
        let caching = permissive(StatusRecord::Queue("caching"));
        assert_eq!((caching.color, caching.icon), (ColorKind::Info, IconKind::Spinner));
        assert_eq!(caching.label, "Caching");

        let queued = permissive(StatusRecord::Queue("queued"));
        assert_eq!((queued.color, queued.icon), (ColorKind::Warning, IconKind::Clock));
        assert_eq!(queued.label, "Queued");

        let odd = permissive(StatusRecord::Queue("paused"));
        assert_eq!((odd.color, odd.icon), (ColorKind::Warning, IconKind::Clock));
        assert_eq!(odd.label, "Unknown");
    }

    #[test]
    fn test_sitemap_health() {
        let healthy = permissive(StatusRecord::SitemapHealth("healthy"));
        assert_eq!(healthy.icon, IconKind::Check);
        assert_eq!(
            healthy.description,
            Some("All pages in this sitemap are working correctly")
        );

        let declared_unknown = permissive(StatusRecord::SitemapHealth("unknown"));
        let undeclared = permissive(StatusRecord::SitemapHealth("stale"));
        assert_eq!(declared_unknown, undeclared);
        assert_eq!(undeclared.icon, IconKind::Question);
        assert_eq!(undeclared.description, Some("Status unknown"));

        // "unknown" is part of the vocabulary, so strict mode accepts it
        assert!(StatusResolver::strict()
            .resolve(&StatusRecord::SitemapHealth("unknown"))
            .is_ok());
    }

    #[test]
    fn test_render_outcome_labels_with_status_code() {
        let ok = permissive(StatusRecord::Render {
            status: "Success",
            status_code: 200,
        });
        assert_eq!(ok.label, "200");
        assert_eq!(ok.color, ColorKind::Success);

        let failed = permissive(StatusRecord::Render {
            status: "Failed",
            status_code: 404,
        });
        assert_eq!(failed.label, "404");
        assert_eq!(failed.icon, IconKind::Close);
    }

    #[test]
    fn test_priority_vocabulary() {
        assert_eq!(permissive(StatusRecord::Priority("high")).label, "Priority");
        assert_eq!(permissive(StatusRecord::Priority("normal")).label, "Automatic");
    }

    #[test]
    fn test_seo_score_thresholds() {
        assert_eq!(seo_score_display(92).unwrap().color, ColorKind::Success);
        assert_eq!(seo_score_display(90).unwrap().color, ColorKind::Success);
        assert_eq!(seo_score_display(89).unwrap().color, ColorKind::Warning);
        assert_eq!(seo_score_display(70).unwrap().color, ColorKind::Warning);
        assert_eq!(seo_score_display(69).unwrap().color, ColorKind::Danger);
        assert!(seo_score_display(101).is_none());
        assert!(StatusResolver::strict()
            .resolve(&StatusRecord::SeoScore(150))
            .is_err());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = StatusResolver::default();
        let record = StatusRecord::Integration("pending");
        assert_eq!(
            resolver.resolve(&record).unwrap(),
            resolver.resolve(&record).unwrap()
        );
    }

    #[test]
    fn test_device_icon() {
        assert_eq!(device_icon("Desktop"), IconKind::Desktop);
        assert_eq!(device_icon("Mobile"), IconKind::Mobile);
    }
}
