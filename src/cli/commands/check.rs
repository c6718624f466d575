//! Check command: report external tool availability and LLM settings.

use console::style;

use crate::config::Config;
use crate::ocr::{check_binary, check_tools};

pub fn cmd_check(config: &Config) -> anyhow::Result<()> {
    println!("\n{}", style("PDF Tool Status").bold());
    println!("{}", "-".repeat(50));

    println!("\n{}", style("External Tools:").cyan());
    for (tool, available) in check_tools() {
        let status = if available {
            style("✓ found").green()
        } else {
            style("✗ not found").red()
        };
        println!("  {:<15} {}", tool, status);
    }

    println!("\n{}", style("Extraction Backends (in order):").cyan());
    let mut all_ready = true;
    for kind in config.extraction.backends() {
        let missing: Vec<&str> = kind
            .required_tools()
            .iter()
            .copied()
            .filter(|tool| !check_binary(tool))
            .collect();
        if missing.is_empty() {
            println!("  {:<15} {}", kind, style("✓ ready").green());
        } else {
            all_ready = false;
            println!(
                "  {:<15} {} {}",
                kind,
                style("✗ unavailable").red(),
                style(format!("(missing {})", missing.join(", "))).dim()
            );
        }
    }

    println!("\n{}", style("Language Model:").cyan());
    let llm = &config.llm;
    let key_status = if llm.api_key.is_some() {
        style("✓ API key set").green()
    } else {
        style("✗ no API key (set OPENAI_API_KEY)").red()
    };
    println!("  {:<15} {}", "Endpoint", llm.endpoint);
    println!("  {:<15} {}", "Model", llm.model);
    println!(
        "  {:<15} {}",
        "Enabled",
        if llm.enabled { "yes" } else { "no" }
    );
    println!("  {:<15} {}", "Key", key_status);

    println!();
    if all_ready {
        println!("{} All PDF backends are available", style("✓").green());
    } else {
        println!(
            "{} Unavailable backends contribute no text. Install:",
            style("!").yellow()
        );
        println!("  - pdftotext, pdftoppm: poppler-utils package");
        println!("  - tesseract: tesseract-ocr package");
    }

    Ok(())
}
