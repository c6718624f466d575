//! Parsing of the fixed-format replies returned by the language model.

use crate::models::{ProductAnalysis, ProductTexts};

/// Parse a `KEY: value` reply with a trailing `- ` bullet list.
///
/// Keys are matched case-insensitively with markdown emphasis stripped, so
/// `**Brand**: Acme` reads the same as `BRAND: Acme`. Unknown keys and
/// section headers (lines ending in `:`) are skipped.
pub fn parse_analysis(content: &str) -> ProductAnalysis {
    let mut analysis = ProductAnalysis::default();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.ends_with(':') {
            continue;
        }
        if let Some(bullet) = line.strip_prefix("- ") {
            let bullet = bullet.trim();
            if !bullet.is_empty() {
                analysis.bullet_points.push(bullet.to_string());
            }
            continue;
        }
        let Some((key, value)) = line.split_once(": ") else {
            continue;
        };
        let value = value.trim().to_string();
        let slot = match normalize_key(key).as_str() {
            "BRAND" => &mut analysis.brand,
            "PRODUCT NAME" => &mut analysis.product_name,
            "PRODUCT NUMBER" => &mut analysis.product_no,
            "WEIGHT" => &mut analysis.weight,
            "MATERIALS" => &mut analysis.material,
            "DIMENSIONS" => &mut analysis.dimensions,
            "COLOR" => &mut analysis.color,
            "SUSTAINABILITY" => &mut analysis.sustainability,
            "OTHER INFO" => &mut analysis.other_info,
            "HEADLINE" => &mut analysis.headline,
            "SHORT TEXT" => &mut analysis.short_text,
            "LONG TEXT" => &mut analysis.long_text,
            _ => continue,
        };
        *slot = value;
    }

    analysis
}

fn normalize_key(key: &str) -> String {
    key.trim_matches(|c: char| c == '*' || c == '#' || c.is_whitespace())
        .to_uppercase()
}

/// Split a text-generation reply into its four blank-line separated blocks.
pub fn split_product_texts(content: &str) -> ProductTexts {
    let mut blocks = content
        .trim()
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(String::from);

    ProductTexts {
        headline: blocks.next().unwrap_or_default(),
        short_text: blocks.next().unwrap_or_default(),
        long_text: blocks.next().unwrap_or_default(),
        // Anything past the third block belongs to the bullet list
        bullet_points: blocks.collect::<Vec<_>>().join("\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = "BRAND: Hurtta\n\
        PRODUCT NAME: Weekend Warrior Collar\n\
        PRODUCT NUMBER: 932134\n\
        WEIGHT: 120 g\n\
        MATERIALS: Nylon, neoprene\n\
        DIMENSIONS: 45-55 cm\n\
        COLOR: Red\n\
        SUSTAINABILITY: Recycled nylon\n\
        OTHER INFO: Reflective\n\
        ---MARKETING CONTENT---\n\
        HEADLINE: Reflekterande halsband for aktiva hundar\n\
        SHORT TEXT: Mjukt och slitstarkt.\n\
        LONG TEXT: Ett halsband for alla vader.\n\
        BULLET POINTS:\n\
        - Reflekterande detaljer\n\
        - Mjuk neopren\n";

    #[test]
    fn test_parse_full_reply() {
        let analysis = parse_analysis(REPLY);

        assert_eq!(analysis.brand, "Hurtta");
        assert_eq!(analysis.product_name, "Weekend Warrior Collar");
        assert_eq!(analysis.product_no, "932134");
        assert_eq!(analysis.material, "Nylon, neoprene");
        assert_eq!(analysis.other_info, "Reflective");
        assert_eq!(analysis.headline, "Reflekterande halsband for aktiva hundar");
        assert_eq!(
            analysis.bullet_points,
            vec!["Reflekterande detaljer", "Mjuk neopren"]
        );
    }

    #[test]
    fn test_parse_markdown_keys() {
        let analysis = parse_analysis("**Brand**: Acme\n## Color: Blue\nUnknown: x");
        assert_eq!(analysis.brand, "Acme");
        assert_eq!(analysis.color, "Blue");
    }

    #[test]
    fn test_value_keeps_inner_separator() {
        let analysis = parse_analysis("OTHER INFO: Size: M, fits 40-50 cm");
        assert_eq!(analysis.other_info, "Size: M, fits 40-50 cm");
    }

    #[test]
    fn test_parse_garbage_is_empty() {
        assert!(parse_analysis("I cannot help with that.").is_empty());
    }

    #[test]
    fn test_split_product_texts() {
        let texts = split_product_texts(
            "Headline\n\nShort text here.\n\nLong text here.\n\n- One\n- Two\n\n- Three",
        );
        assert_eq!(texts.headline, "Headline");
        assert_eq!(texts.short_text, "Short text here.");
        assert_eq!(texts.long_text, "Long text here.");
        assert_eq!(texts.bullet_points, "- One\n- Two\n- Three");
    }

    #[test]
    fn test_split_missing_parts_are_empty() {
        let texts = split_product_texts("Only a headline");
        assert_eq!(texts.headline, "Only a headline");
        assert!(texts.short_text.is_empty());
        assert!(texts.bullet_points.is_empty());
    }
}
