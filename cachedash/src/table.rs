//! Terminal table rendering using comfy-table.

use cachedash_core::status::{ColorKind, StatusDisplay};
use cachedash_core::view::{DomainRow, HistoryRow, PageRow, ParameterRow, QueueRow, SitemapRow};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );
    table
}

fn color(kind: ColorKind) -> Color {
    match kind {
        ColorKind::Success => Color::Green,
        ColorKind::Info => Color::Blue,
        ColorKind::Warning => Color::Yellow,
        ColorKind::Danger => Color::Red,
        ColorKind::Neutral => Color::Grey,
    }
}

fn status(display: &StatusDisplay) -> Cell {
    Cell::new(display).fg(color(display.color))
}

fn yes_no(flag: bool) -> Cell {
    Cell::new(if flag { "on" } else { "off" })
}

pub fn domains(rows: &[DomainRow]) -> Table {
    let mut table = new_table(&[
        "DOMAIN",
        "CREATED",
        "URLS",
        "CACHE",
        "INTEGRATION",
        "404 STATUS",
        "LAST CHECK",
        "NEXT CHECK",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.domain.clone()),
            Cell::new(row.created.clone()),
            Cell::new(row.url_count.to_string()),
            Cell::new(row.cache_duration.clone()),
            status(&row.integration),
            status(&row.not_found),
            Cell::new(row.last_checked.clone()),
            Cell::new(row.next_check.clone()),
        ]);
    }
    table
}

pub fn queue(rows: &[QueueRow]) -> Table {
    let mut table = new_table(&[
        "URL", "PRIORITY", "STATUS", "DEVICE", "SOURCE", "ADDED", "AGE",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.url.clone()),
            status(&row.priority),
            status(&row.status),
            Cell::new(format!("{} {}", row.device_icon.glyph(), row.device)),
            Cell::new(row.source.clone()),
            Cell::new(row.added.clone()),
            Cell::new(row.age.clone()),
        ]);
    }
    table
}

pub fn sitemaps(rows: &[SitemapRow]) -> Table {
    let mut table = new_table(&[
        "URL",
        "ENABLED",
        "REVISIT",
        "DEVICES",
        "LAST VISIT",
        "NEXT VISIT",
        "ORIGIN",
        "HEALTH",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.url.clone()),
            yes_no(row.enabled),
            Cell::new(row.revisit_interval.clone()),
            Cell::new(row.devices.join(", ")),
            Cell::new(row.last_visited.clone()),
            Cell::new(row.next_visit.clone()),
            Cell::new(row.origin.clone()),
            status(&row.health),
        ]);
    }
    table
}

pub fn history(rows: &[HistoryRow]) -> Table {
    let mut table = new_table(&["URL", "DEVICE", "STATUS", "DURATION", "RENDERED"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.url.clone()),
            Cell::new(format!("{} {}", row.device_icon.glyph(), row.device)),
            status(&row.outcome),
            Cell::new(row.duration.clone()),
            Cell::new(format!("{} ({})", row.rendered_at, row.rendered_ago)),
        ]);
    }
    table
}

pub fn pages(rows: &[PageRow]) -> Table {
    let mut table = new_table(&[
        "CONTENT AGE",
        "URL",
        "DEVICE",
        "SEO",
        "STATE",
        "FIRST SEEN",
        "SOURCE",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.content_age.clone()),
            Cell::new(row.url.clone()),
            Cell::new(row.device.clone()),
            status(&row.seo),
            Cell::new(row.state.clone()),
            Cell::new(row.first_seen.clone()),
            Cell::new(row.source.clone()),
        ]);
    }
    table
}

pub fn parameters(rows: &[ParameterRow]) -> Table {
    let mut table = new_table(&["PARAMETER", "RULE", "SYSTEM"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.name.clone()),
            Cell::new(row.rule.label.clone()),
            Cell::new(if row.is_system { "yes" } else { "" }),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use cachedash_core::status::IconKind;

    /// Terminal columns occupied by `line`; the glyphs used here are the
    /// only double-width characters in these tests.
    fn display_width(line: &str) -> usize {
        line.chars().map(|c| if c == '⚡' { 2 } else { 1 }).sum()
    }

    fn badge(label: &str, color: ColorKind, icon: IconKind) -> StatusDisplay {
        StatusDisplay {
            label: label.to_string(),
            color,
            icon,
            description: None,
        }
    }

    #[test]
    fn test_wide_glyph_rows_line_up() {
        let mut table = new_table(&["PRIORITY", "URL"]);
        table.add_row(vec![
            status(&badge("Priority", ColorKind::Danger, IconKind::Thunderbolt)),
            Cell::new("a"),
        ]);
        table.add_row(vec![
            status(&badge("Automatic", ColorKind::Neutral, IconKind::FieldTime)),
            Cell::new("b"),
        ]);

        let rendered = table.to_string();
        let widths: Vec<usize> = rendered.lines().map(display_width).collect();
        assert!(rendered.contains("⚡ Priority"), "{rendered}");
        assert!(
            widths.iter().all(|w| *w == widths[0]),
            "rows differ in width {widths:?}:\n{rendered}"
        );

        let column = |needle: &str| {
            let line = rendered.lines().find(|l| l.contains(needle)).unwrap();
            let prefix = &line[..line.rfind(needle).unwrap()];
            display_width(prefix)
        };
        assert_eq!(column(" a "), column(" b "));
    }

    #[test]
    fn test_parameters_table() {
        let rows = vec![ParameterRow {
            name: "fbclid".to_string(),
            rule: badge("Always ignored", ColorKind::Neutral, IconKind::Close),
            is_system: true,
        }];
        let rendered = parameters(&rows).to_string();
        assert!(rendered.contains("PARAMETER"));
        assert!(rendered.contains("fbclid"));
        assert!(rendered.contains("Always ignored"));
        assert!(rendered.contains("yes"));
    }
}
