//! Shared helper functions for CLI commands.

use anyhow::Context;
use console::style;

use crate::config::Settings;
use crate::models::ProductRecord;
use crate::repository::ProductRepository;

/// Open the product store, creating the data directory if needed.
pub fn open_repository(settings: &Settings) -> anyhow::Result<ProductRepository> {
    settings.ensure_directories()?;
    let path = settings.database_path();
    ProductRepository::open(&path)
        .with_context(|| format!("Failed to open product database {}", path.display()))
}

/// Shorten text for single-line display.
pub fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", cut)
}

/// Print every non-empty field of a product.
pub fn print_product(record: &ProductRecord) {
    println!(
        "\n{} {}",
        style(&record.search_term).bold(),
        style(format!("(#{})", record.id)).dim()
    );
    println!("{}", "-".repeat(60));

    let fields = [
        ("Brand", &record.brand),
        ("Product name", &record.product_name),
        ("Product no", &record.product_no),
        ("Weight", &record.weight),
        ("Material", &record.material),
        ("Dimensions", &record.dimensions),
        ("Color", &record.color),
        ("Sustainability", &record.sustainability),
        ("Other info", &record.other_info),
        ("Headline", &record.headline),
        ("Short text", &record.short_text),
        ("Long text", &record.long_text),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            println!("  {:<15} {}", style(label).cyan(), value);
        }
    }
    if !record.bullet_points.is_empty() {
        println!("  {}", style("Bullet points").cyan());
        for bullet in record.bullet_points.lines() {
            println!("    {}", bullet.trim_start_matches("- "));
        }
    }
    if let Some(created_at) = record.created_at {
        println!(
            "  {:<15} {}",
            style("Created").cyan(),
            created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
