//! Describe command: write marketing texts for a stored product.

use console::style;
use tracing::info;

use crate::cli::helpers::{open_repository, print_product};
use crate::config::{Config, Settings};
use crate::llm::LlmClient;

pub fn cmd_describe(settings: &Settings, config: &Config, keyword: &str) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    let Some(mut record) = repo.find_like(keyword)? else {
        anyhow::bail!("No stored product matches '{}'", keyword.trim());
    };
    info!(
        "Describing '{}' (matched '{}')",
        record.search_term,
        keyword.trim()
    );

    let client = LlmClient::new(config.llm.clone())?;
    let texts = client.generate_product_texts(&record)?;
    repo.update_texts(&record.search_term, &texts)?;

    record.headline = texts.headline;
    record.short_text = texts.short_text;
    record.long_text = texts.long_text;
    record.bullet_points = texts.bullet_points;

    print_product(&record);
    println!(
        "\n{} Updated texts for '{}'",
        style("✓").green(),
        record.search_term
    );
    Ok(())
}
