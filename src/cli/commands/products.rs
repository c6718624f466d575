//! Product store browsing and export commands.

use std::path::Path;

use clap::Args;
use console::style;

use crate::cli::helpers::{open_repository, print_product, truncate};
use crate::config::Settings;
use crate::export::write_products;
use crate::models::{ProductField, ProductRecord};
use crate::search::split_terms;

/// Field values for `products set`; omitted fields are left unchanged.
#[derive(Args)]
pub struct SetArgs {
    /// Search term the product is stored under
    pub term: String,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub product_name: Option<String>,
    #[arg(long)]
    pub product_no: Option<String>,
    #[arg(long)]
    pub headline: Option<String>,
    #[arg(long)]
    pub short_text: Option<String>,
    #[arg(long)]
    pub long_text: Option<String>,
    /// Bullet point (repeatable; replaces the stored list)
    #[arg(long = "bullet")]
    pub bullets: Vec<String>,
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long)]
    pub material: Option<String>,
    #[arg(long)]
    pub sustainability: Option<String>,
    #[arg(long)]
    pub dimensions: Option<String>,
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long)]
    pub other_info: Option<String>,
}

impl SetArgs {
    /// Given fields in store column order.
    pub fn values(&self) -> Vec<(ProductField, String)> {
        let bullets = (!self.bullets.is_empty()).then(|| self.bullets.join("\n"));
        ProductField::ALL
            .into_iter()
            .filter_map(|field| {
                let value = match field {
                    ProductField::Brand => self.brand.clone(),
                    ProductField::ProductName => self.product_name.clone(),
                    ProductField::ProductNo => self.product_no.clone(),
                    ProductField::Headline => self.headline.clone(),
                    ProductField::ShortText => self.short_text.clone(),
                    ProductField::LongText => self.long_text.clone(),
                    ProductField::BulletPoints => bullets.clone(),
                    ProductField::Weight => self.weight.clone(),
                    ProductField::Material => self.material.clone(),
                    ProductField::Sustainability => self.sustainability.clone(),
                    ProductField::Dimensions => self.dimensions.clone(),
                    ProductField::Color => self.color.clone(),
                    ProductField::OtherInfo => self.other_info.clone(),
                };
                value.map(|v| (field, v))
            })
            .collect()
    }
}

pub fn cmd_products_list(settings: &Settings) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    let records = repo.list()?;

    if records.is_empty() {
        println!("No products stored yet. Run 'catalog-scout search' first.");
        return Ok(());
    }
    print_table(&records);
    Ok(())
}

pub fn cmd_products_search(settings: &Settings, keyword: &str) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    let records = repo.search(keyword)?;

    if records.is_empty() {
        println!("No products match '{}'", keyword.trim());
        return Ok(());
    }
    print_table(&records);
    Ok(())
}

pub fn cmd_products_set(settings: &Settings, args: SetArgs) -> anyhow::Result<()> {
    let term = args.term.trim();
    if term.is_empty() {
        anyhow::bail!("Search term must not be empty");
    }
    let values = args.values();
    if values.is_empty() {
        anyhow::bail!("No fields given; see 'catalog-scout products set --help'");
    }

    let repo = open_repository(settings)?;
    let inserted = repo.set_fields(term, &values)?;
    println!(
        "{} {} '{}' ({} field(s))",
        style("✓").green(),
        if inserted { "Created" } else { "Updated" },
        term,
        values.len()
    );
    Ok(())
}

fn print_table(records: &[ProductRecord]) {
    println!(
        "\n{:<5} {:<20} {:<20} {}",
        style("ID").bold(),
        style("Search term").bold(),
        style("Brand").bold(),
        style("Product name").bold()
    );
    println!("{}", "-".repeat(80));
    for record in records {
        println!(
            "{:<5} {:<20} {:<20} {}",
            record.id,
            truncate(&record.search_term, 20),
            truncate(&record.brand, 20),
            truncate(&record.product_name, 40)
        );
    }
    println!("\n{} product(s)", records.len());
}

pub fn cmd_products_show(settings: &Settings, term: &str) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    match repo.get(term.trim())? {
        Some(record) => {
            print_product(&record);
            Ok(())
        }
        None => anyhow::bail!("No product stored for '{}'", term.trim()),
    }
}

pub fn cmd_export(settings: &Settings, terms: &str, output: &Path) -> anyhow::Result<()> {
    let terms = split_terms(terms);
    if terms.is_empty() {
        anyhow::bail!("No search terms given");
    }

    let repo = open_repository(settings)?;
    let records = repo.fetch_for_terms(&terms)?;
    for term in &terms {
        if !records.iter().any(|r| &r.search_term == term) {
            println!("{} No stored product for '{}'", style("!").yellow(), term);
        }
    }
    if records.is_empty() {
        anyhow::bail!("Nothing to export");
    }

    write_products(output, &records)?;
    println!(
        "{} Exported {} product(s) to {}",
        style("✓").green(),
        records.len(),
        output.display()
    );
    Ok(())
}

pub fn cmd_export_all(settings: &Settings, output: &Path) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    let records = repo.list()?;
    if records.is_empty() {
        anyhow::bail!("Nothing to export");
    }

    write_products(output, &records)?;
    println!(
        "{} Exported {} product(s) to {}",
        style("✓").green(),
        records.len(),
        output.display()
    );
    Ok(())
}
