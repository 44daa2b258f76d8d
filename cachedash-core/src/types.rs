//! Dashboard view-model types
//!
//! These records mirror what the dashboard tables display. A [`Dashboard`]
//! snapshot is the JSON document the presentation layer loads; it stands in
//! for whatever API eventually serves the data.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Domain** | A site whose pages are prerendered and cached |
//! | **Integration** | Whether the domain's connection to the caching service works |
//! | **404 check** | Periodic probe that a nonexistent page returns a not-found response |
//! | **Queue** | URLs waiting for cache generation |
//! | **Sitemap** | A sitemap the service revisits to discover pages |
//! | **Render** | One prerender of a URL, recorded in history |
//!
//! Status fields are kept as the raw strings the backend sends. Turning them
//! into labels is the job of [`crate::status::StatusResolver`], which decides
//! what to do with values it does not recognize.

use crate::error::Result;
use crate::status::NotFoundCheck;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================
// Domains
// ============================================

/// A domain registered with the caching service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Domain {
    /// Hostname without scheme (e.g., "example.com")
    pub domain: String,
    pub created_at: String,
    /// Number of known URLs on this domain
    pub url_count: u64,
    /// Raw integration status ("active", "pending", "error")
    pub integration_status: String,
    /// Explanation shown when integration failed
    #[serde(default)]
    pub error_message: Option<String>,
    /// Hours before cached pages are automatically recached
    pub cache_expiration_hours: u32,
    /// 404 monitoring state
    pub not_found: NotFoundMonitor,
}

impl Domain {
    /// Whether anything about this domain needs attention
    pub fn has_issues(&self) -> bool {
        !self.is_active() || self.has_not_found_issue()
    }

    /// Whether the integration is live
    pub fn is_active(&self) -> bool {
        self.integration_status.trim().eq_ignore_ascii_case("active")
    }

    /// Whether the 404 check is failing
    pub fn has_not_found_issue(&self) -> bool {
        let check = self.not_found.check();
        !(check.reachable && check.returns_404)
    }
}

/// 404 monitoring configuration and latest results for a domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotFoundMonitor {
    pub enabled: bool,
    pub reachable: bool,
    #[serde(rename = "returns404", alias = "returns_404")]
    pub returns_404: bool,
    pub last_checked: String,
    pub next_check: String,
    /// Human-readable interval (e.g., "1 hour")
    pub check_interval: String,
    pub error_count: u32,
    #[serde(default)]
    pub history: Vec<CheckHistoryEntry>,
}

impl NotFoundMonitor {
    pub fn check(&self) -> NotFoundCheck {
        NotFoundCheck {
            reachable: self.reachable,
            returns_404: self.returns_404,
        }
    }
}

/// One past run of the 404 check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckHistoryEntry {
    pub timestamp: String,
    /// "success" or "error"
    pub status: String,
    pub message: String,
}

// ============================================
// Queue
// ============================================

/// A URL waiting for cache generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub url: String,
    /// Raw priority ("high" for manual promotion, "normal" for automatic)
    pub priority: String,
    /// Raw status ("queued", "caching")
    pub status: String,
    /// Render device ("Desktop", "Mobile")
    pub device: String,
    pub added_at: String,
    /// Free-form estimate (e.g., "2 minutes")
    pub estimated_time: String,
    /// Where the URL came from ("API", "Manual", "Sitemap")
    pub source: String,
    /// Age of the currently cached copy, in hours
    pub age_hours: u32,
}

impl QueueItem {
    pub fn is_priority(&self) -> bool {
        self.priority.trim().eq_ignore_ascii_case("high")
    }
}

// ============================================
// Sitemaps
// ============================================

/// A sitemap the service revisits to discover pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sitemap {
    pub enabled: bool,
    pub url: String,
    pub created_at: String,
    /// Human-readable revisit interval (e.g., "24 hours")
    pub revisit_interval: String,
    /// Devices the sitemap is rendered for
    #[serde(default)]
    pub devices: Vec<String>,
    pub last_visited_at: String,
    pub next_visit: String,
    /// "Manual" or "Google Search Console"
    pub origin: String,
    /// Raw health ("healthy", "warning", "error")
    pub health: String,
}

// ============================================
// Render history
// ============================================

/// One prerender recorded in history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRecord {
    pub url: String,
    pub device: String,
    /// Raw outcome ("Success", "Failed")
    pub status: String,
    /// Render time in seconds
    pub duration_secs: f64,
    pub timestamp: String,
    pub status_code: u16,
}

// ============================================
// Cached pages
// ============================================

/// A page currently held in the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPage {
    pub url: String,
    pub device: String,
    /// 0-100 SEO score
    pub seo_score: u8,
    /// Cache state label (e.g., "Cached")
    pub state: String,
    pub first_seen: String,
    pub source: String,
    pub last_crawled: String,
}

// ============================================
// URL parameters
// ============================================

/// A query parameter and how it affects the cache key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlParameter {
    pub name: String,
    /// Raw rule ("use", "ignore", "always-ignore")
    pub rule: String,
    /// Built-in tracking parameter that cannot be edited
    #[serde(default)]
    pub is_system: bool,
}

// ============================================
// Snapshot
// ============================================

/// Everything the dashboard tables display at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub domains: Vec<Domain>,
    #[serde(default)]
    pub queue: Vec<QueueItem>,
    #[serde(default)]
    pub sitemaps: Vec<Sitemap>,
    #[serde(default)]
    pub history: Vec<RenderRecord>,
    #[serde(default)]
    pub pages: Vec<CachedPage>,
    #[serde(default)]
    pub parameters: Vec<UrlParameter>,
}

impl Dashboard {
    /// Parse a snapshot from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a snapshot from a JSON file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let dashboard = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            domains = dashboard.domains.len(),
            queue = dashboard.queue.len(),
            sitemaps = dashboard.sitemaps.len(),
            "Loaded dashboard snapshot"
        );
        Ok(dashboard)
    }
}
