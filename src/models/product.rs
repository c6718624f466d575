//! Product models: language model analysis and stored catalog records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Structured product data extracted from search results by the language model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub brand: String,
    pub product_name: String,
    pub product_no: String,
    pub weight: String,
    pub material: String,
    pub dimensions: String,
    pub color: String,
    pub sustainability: String,
    pub other_info: String,
    pub headline: String,
    pub short_text: String,
    pub long_text: String,
    pub bullet_points: Vec<String>,
}

impl ProductAnalysis {
    /// Replace brand and product name with caller-supplied values.
    ///
    /// Blank overrides are ignored so the extracted value survives.
    pub fn apply_overrides(&mut self, brand: Option<&str>, product_name: Option<&str>) {
        if let Some(brand) = brand.map(str::trim).filter(|b| !b.is_empty()) {
            self.brand = brand.to_string();
        }
        if let Some(name) = product_name.map(str::trim).filter(|n| !n.is_empty()) {
            self.product_name = name.to_string();
        }
    }

    /// Bullet points in their stored form, one per line.
    pub fn bullet_text(&self) -> String {
        self.bullet_points.join("\n")
    }

    /// Check whether the model returned nothing recognizable.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A row of the product store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub search_term: String,
    pub brand: String,
    pub product_name: String,
    pub product_no: String,
    pub headline: String,
    pub short_text: String,
    pub long_text: String,
    /// Newline-separated bullet list.
    pub bullet_points: String,
    pub weight: String,
    pub material: String,
    pub sustainability: String,
    pub dimensions: String,
    pub color: String,
    pub other_info: String,
    pub created_at: Option<NaiveDateTime>,
}

impl ProductRecord {
    /// Stored value of one field.
    pub fn field(&self, field: ProductField) -> &str {
        match field {
            ProductField::Brand => &self.brand,
            ProductField::ProductName => &self.product_name,
            ProductField::ProductNo => &self.product_no,
            ProductField::Headline => &self.headline,
            ProductField::ShortText => &self.short_text,
            ProductField::LongText => &self.long_text,
            ProductField::BulletPoints => &self.bullet_points,
            ProductField::Weight => &self.weight,
            ProductField::Material => &self.material,
            ProductField::Sustainability => &self.sustainability,
            ProductField::Dimensions => &self.dimensions,
            ProductField::Color => &self.color,
            ProductField::OtherInfo => &self.other_info,
        }
    }

    /// Render the factual fields as input for text generation.
    ///
    /// Empty fields are left out.
    pub fn facts_text(&self) -> String {
        [
            ("Brand", &self.brand),
            ("Product name", &self.product_name),
            ("Product number", &self.product_no),
            ("Weight", &self.weight),
            ("Material", &self.material),
            ("Dimensions", &self.dimensions),
            ("Color", &self.color),
            ("Sustainability", &self.sustainability),
            ("Other information", &self.other_info),
        ]
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{}: {}", label, value.trim()))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

/// An editable column of the product store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Brand,
    ProductName,
    ProductNo,
    Headline,
    ShortText,
    LongText,
    BulletPoints,
    Weight,
    Material,
    Sustainability,
    Dimensions,
    Color,
    OtherInfo,
}

impl ProductField {
    /// Every field in export column order.
    pub const ALL: [ProductField; 13] = [
        ProductField::Brand,
        ProductField::ProductName,
        ProductField::ProductNo,
        ProductField::Headline,
        ProductField::ShortText,
        ProductField::LongText,
        ProductField::BulletPoints,
        ProductField::Weight,
        ProductField::Material,
        ProductField::Sustainability,
        ProductField::Dimensions,
        ProductField::Color,
        ProductField::OtherInfo,
    ];

    /// Database column name.
    pub fn column(&self) -> &'static str {
        match self {
            ProductField::Brand => "brand",
            ProductField::ProductName => "product_name",
            ProductField::ProductNo => "product_no",
            ProductField::Headline => "headline",
            ProductField::ShortText => "short_text",
            ProductField::LongText => "long_text",
            ProductField::BulletPoints => "bullet_points",
            ProductField::Weight => "weight",
            ProductField::Material => "material",
            ProductField::Sustainability => "sustainability",
            ProductField::Dimensions => "dimensions",
            ProductField::Color => "color",
            ProductField::OtherInfo => "other_info",
        }
    }

    /// Spreadsheet header.
    pub fn label(&self) -> &'static str {
        match self {
            ProductField::Brand => "Brand",
            ProductField::ProductName => "Product name",
            ProductField::ProductNo => "Product number",
            ProductField::Headline => "Headline",
            ProductField::ShortText => "Short text",
            ProductField::LongText => "Long text",
            ProductField::BulletPoints => "Bullet points",
            ProductField::Weight => "Weight",
            ProductField::Material => "Material",
            ProductField::Sustainability => "Sustainability",
            ProductField::Dimensions => "Dimensions",
            ProductField::Color => "Color",
            ProductField::OtherInfo => "Other info",
        }
    }

    /// Match a column name or header, ignoring case, spaces and underscores.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL.into_iter().find(|field| {
            let column: String = field.column().chars().filter(|c| *c != '_').collect();
            key == column || (key == "productnumber" && *field == ProductField::ProductNo)
        })
    }
}

/// Marketing texts generated for an existing product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTexts {
    pub headline: String,
    pub short_text: String,
    pub long_text: String,
    pub bullet_points: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_non_blank_values() {
        let mut analysis = ProductAnalysis {
            brand: "Acme".to_string(),
            product_name: "Dog Collar".to_string(),
            ..Default::default()
        };
        analysis.apply_overrides(Some(" Hurtta "), Some("   "));

        assert_eq!(analysis.brand, "Hurtta");
        assert_eq!(analysis.product_name, "Dog Collar");
    }

    #[test]
    fn test_overrides_none_keeps_values() {
        let mut analysis = ProductAnalysis {
            brand: "Acme".to_string(),
            ..Default::default()
        };
        analysis.apply_overrides(None, None);
        assert_eq!(analysis.brand, "Acme");
    }

    #[test]
    fn test_facts_text_skips_empty_fields() {
        let record = ProductRecord {
            brand: "Acme".to_string(),
            color: "Red".to_string(),
            ..Default::default()
        };
        assert_eq!(record.facts_text(), "Brand: Acme\nColor: Red");
    }

    #[test]
    fn test_field_from_column_or_header() {
        assert_eq!(ProductField::from_name("product_no"), Some(ProductField::ProductNo));
        assert_eq!(ProductField::from_name("Product number"), Some(ProductField::ProductNo));
        assert_eq!(ProductField::from_name(" Other info "), Some(ProductField::OtherInfo));
        assert_eq!(ProductField::from_name("BULLET_POINTS"), Some(ProductField::BulletPoints));
        assert_eq!(ProductField::from_name("created_at"), None);
        assert_eq!(ProductField::from_name("search_term"), None);

        for field in ProductField::ALL {
            assert_eq!(ProductField::from_name(field.label()), Some(field));
            assert_eq!(ProductField::from_name(field.column()), Some(field));
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(ProductAnalysis::default().is_empty());
        let analysis = ProductAnalysis {
            bullet_points: vec!["Waterproof".to_string()],
            ..Default::default()
        };
        assert!(!analysis.is_empty());
    }
}
