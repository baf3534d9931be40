//! Telegram report rendering
//!
//! Only changed items that are currently in stock qualify. Categories without a
//! qualifying item are left out, and no report is produced when none qualify.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::diff::ChangeSet;
use crate::model::Category;

const TITLE: &str = "✨ *Store Stock Updated!* ✨";
const FOOTER: &str = "Happy Gardening! 🌳";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// Render the Markdown report for `changes`, or `None` if nothing qualifies
pub fn render_report(changes: &ChangeSet, now: DateTime<Tz>) -> Option<String> {
    let sections: Vec<String> = Category::ALL
        .iter()
        .filter_map(|&category| render_category(category, changes))
        .collect();

    if sections.is_empty() {
        return None;
    }

    let mut lines = vec![
        TITLE.to_string(),
        format!("_{}_", now.format(TIMESTAMP_FORMAT)),
        String::new(),
    ];
    lines.extend(sections);
    lines.push(FOOTER.to_string());

    Some(lines.join("\n"))
}

fn render_category(category: Category, changes: &ChangeSet) -> Option<String> {
    let items: Vec<String> = changes
        .get(category)?
        .iter()
        .map(|change| change.record())
        .filter(|record| record.in_stock())
        .map(|record| {
            format!(
                "- {} : {}",
                display_name(&record.name),
                record.stock.unwrap_or_default()
            )
        })
        .collect();

    if items.is_empty() {
        return None;
    }

    let mut section = format!("{} *{}:*\n", category.emoji(), category.label());
    for item in items {
        section.push_str(&item);
        section.push('\n');
    }
    Some(section)
}

/// `carrot_seed` -> `Carrot Seed`, escaped for Telegram Markdown
pub fn display_name(raw: &str) -> String {
    escape_markdown(&title_case(&raw.replace('_', " ")))
}

/// Uppercase the first letter of every word, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }

    out
}

fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '*' | '_' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
