//! Table rows for the dashboard views.
//!
//! A [`RenderPass`] pins the reference instant once, so every relative time in
//! one table is computed against the same "now". Rows are denormalized and
//! ready to print.

use crate::config::DisplayConfig;
use crate::error::Result;
use crate::format::{format_cache_duration, RelativeTimeFormatter};
use crate::status::{
    device_icon, IconKind, StatusDisplay, StatusRecord, StatusResolver, UnknownStatusPolicy,
};
use crate::types::{CachedPage, Domain, QueueItem, RenderRecord, Sitemap, UrlParameter};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Domain table row
#[derive(Debug, Clone, Serialize)]
pub struct DomainRow {
    pub domain: String,
    pub created: String,
    pub url_count: u64,
    pub cache_duration: String,
    pub integration: StatusDisplay,
    pub error_message: Option<String>,
    pub not_found: StatusDisplay,
    pub monitoring_enabled: bool,
    pub last_checked: String,
    pub next_check: String,
    pub check_interval: String,
    pub error_count: u32,
}

/// Queue table row
#[derive(Debug, Clone, Serialize)]
pub struct QueueRow {
    pub url: String,
    pub priority: StatusDisplay,
    pub status: StatusDisplay,
    pub device: String,
    pub device_icon: IconKind,
    pub added: String,
    pub estimated_time: String,
    pub source: String,
    /// e.g., "72h old"
    pub age: String,
}

/// Sitemap table row
#[derive(Debug, Clone, Serialize)]
pub struct SitemapRow {
    pub url: String,
    pub enabled: bool,
    pub created: String,
    pub revisit_interval: String,
    pub devices: Vec<String>,
    pub last_visited: String,
    pub next_visit: String,
    pub origin: String,
    pub health: StatusDisplay,
}

/// Render history row
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRow {
    pub url: String,
    pub device: String,
    pub device_icon: IconKind,
    pub outcome: StatusDisplay,
    /// e.g., "1.5s"
    pub duration: String,
    /// Timestamp as recorded
    pub rendered_at: String,
    pub rendered_ago: String,
}

/// Cached page row
#[derive(Debug, Clone, Serialize)]
pub struct PageRow {
    pub url: String,
    pub device: String,
    pub seo: StatusDisplay,
    pub state: String,
    pub first_seen: String,
    pub source: String,
    /// Time since the page was last crawled
    pub content_age: String,
}

/// URL parameter row
#[derive(Debug, Clone, Serialize)]
pub struct ParameterRow {
    pub name: String,
    pub rule: StatusDisplay,
    pub is_system: bool,
}

/// One consistent pass over a set of records.
#[derive(Debug, Clone, Copy)]
pub struct RenderPass {
    reference: DateTime<Utc>,
    formatter: RelativeTimeFormatter,
    resolver: StatusResolver,
}

impl RenderPass {
    pub fn new(
        reference: DateTime<Utc>,
        formatter: RelativeTimeFormatter,
        resolver: StatusResolver,
    ) -> Self {
        Self {
            reference,
            formatter,
            resolver,
        }
    }

    /// Build a pass from display settings
    pub fn from_config(config: &DisplayConfig, reference: DateTime<Utc>) -> Self {
        let policy = if config.strict_status {
            UnknownStatusPolicy::Strict
        } else {
            UnknownStatusPolicy::Permissive
        };
        Self::new(
            reference,
            RelativeTimeFormatter {
                extend_future_to_months: config.extend_future_to_months,
            },
            StatusResolver::new(policy),
        )
    }

    pub fn reference(&self) -> DateTime<Utc> {
        self.reference
    }

    pub fn formatter(&self) -> RelativeTimeFormatter {
        self.formatter
    }

    /// Relative time for a raw timestamp
    pub fn relative(&self, timestamp: &str) -> Result<String> {
        self.formatter.format_str(timestamp, self.reference)
    }

    pub fn resolve(&self, record: StatusRecord<'_>) -> Result<StatusDisplay> {
        self.resolver.resolve(&record)
    }

    pub fn domain_row(&self, domain: &Domain) -> Result<DomainRow> {
        let monitor = &domain.not_found;
        Ok(DomainRow {
            domain: domain.domain.clone(),
            created: self.relative(&domain.created_at)?,
            url_count: domain.url_count,
            cache_duration: format_cache_duration(domain.cache_expiration_hours),
            integration: self.resolve(StatusRecord::Integration(&domain.integration_status))?,
            error_message: domain.error_message.clone(),
            not_found: self.resolve(StatusRecord::NotFound(monitor.check()))?,
            monitoring_enabled: monitor.enabled,
            last_checked: self.relative(&monitor.last_checked)?,
            next_check: self.relative(&monitor.next_check)?,
            check_interval: monitor.check_interval.clone(),
            error_count: monitor.error_count,
        })
    }

    pub fn queue_row(&self, item: &QueueItem) -> Result<QueueRow> {
        Ok(QueueRow {
            url: item.url.clone(),
            priority: self.resolve(StatusRecord::Priority(&item.priority))?,
            status: self.resolve(StatusRecord::Queue(&item.status))?,
            device: item.device.clone(),
            device_icon: device_icon(&item.device),
            added: self.relative(&item.added_at)?,
            estimated_time: item.estimated_time.clone(),
            source: item.source.clone(),
            age: format!("{}h old", item.age_hours),
        })
    }

    pub fn sitemap_row(&self, sitemap: &Sitemap) -> Result<SitemapRow> {
        Ok(SitemapRow {
            url: sitemap.url.clone(),
            enabled: sitemap.enabled,
            created: self.relative(&sitemap.created_at)?,
            revisit_interval: sitemap.revisit_interval.clone(),
            devices: sitemap.devices.clone(),
            last_visited: self.relative(&sitemap.last_visited_at)?,
            next_visit: self.relative(&sitemap.next_visit)?,
            origin: sitemap.origin.clone(),
            health: self.resolve(StatusRecord::SitemapHealth(&sitemap.health))?,
        })
    }

    pub fn history_row(&self, record: &RenderRecord) -> Result<HistoryRow> {
        Ok(HistoryRow {
            url: record.url.clone(),
            device: record.device.clone(),
            device_icon: device_icon(&record.device),
            outcome: self.resolve(StatusRecord::Render {
                status: &record.status,
                status_code: record.status_code,
            })?,
            duration: format!("{}s", record.duration_secs),
            rendered_at: record.timestamp.clone(),
            rendered_ago: self.relative(&record.timestamp)?,
        })
    }

    pub fn page_row(&self, page: &CachedPage) -> Result<PageRow> {
        Ok(PageRow {
            url: page.url.clone(),
            device: page.device.clone(),
            seo: self.resolve(StatusRecord::SeoScore(page.seo_score))?,
            state: page.state.clone(),
            first_seen: page.first_seen.clone(),
            source: page.source.clone(),
            content_age: self.relative(&page.last_crawled)?,
        })
    }

    pub fn parameter_row(&self, parameter: &UrlParameter) -> Result<ParameterRow> {
        Ok(ParameterRow {
            name: parameter.name.clone(),
            rule: self.resolve(StatusRecord::ParameterRule(&parameter.rule))?,
            is_system: parameter.is_system,
        })
    }

    /// Render every record, stopping at the first error
    pub fn rows<T, R>(
        &self,
        records: &[T],
        render: impl Fn(&Self, &T) -> Result<R>,
    ) -> Result<Vec<R>> {
        records.iter().map(|record| render(self, record)).collect()
    }
}

// ============================================
// Filters
// ============================================

/// Domain table status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DomainFilter {
    #[default]
    All,
    /// Integration is active, whatever the 404 check says
    Active,
    /// Integration or 404 problems
    Issues,
    /// 404 check failing
    NotFoundErrors,
}

impl DomainFilter {
    pub fn matches(&self, domain: &Domain) -> bool {
        match self {
            DomainFilter::All => true,
            DomainFilter::Active => domain.is_active(),
            DomainFilter::Issues => domain.has_issues(),
            DomainFilter::NotFoundErrors => domain.has_not_found_issue(),
        }
    }
}

/// Case-insensitive substring match on the domain name, as typed into the
/// domain search box. A blank query matches everything.
pub fn domain_matches_search(domain: &Domain, query: &str) -> bool {
    let query = query.trim();
    query.is_empty()
        || domain
            .domain
            .to_ascii_lowercase()
            .contains(&query.to_ascii_lowercase())
}

/// Queue lane filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueFilter {
    #[default]
    All,
    Automatic,
    Priority,
}

impl QueueFilter {
    pub fn matches(&self, item: &QueueItem) -> bool {
        match self {
            QueueFilter::All => true,
            QueueFilter::Automatic => !item.is_priority(),
            QueueFilter::Priority => item.is_priority(),
        }
    }
}

/// Render history filter on outcome and device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Only successful (`Some(true)`) or failed (`Some(false)`) renders
    pub success: Option<bool>,
    /// Case-insensitive device name
    pub device: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &RenderRecord) -> bool {
        let outcome_ok = match self.success {
            Some(want) => record.status.trim().eq_ignore_ascii_case("success") == want,
            None => true,
        };
        let device_ok = match &self.device {
            Some(device) => record.device.trim().eq_ignore_ascii_case(device.trim()),
            None => true,
        };
        outcome_ok && device_ok
    }
}
