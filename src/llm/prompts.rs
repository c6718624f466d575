//! Default LLM prompts for product analysis.

/// System prompt for extracting structured product data from search results.
///
/// The reply format is what [`super::parse_analysis`] reads back.
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"Analyze the product text and extract information in this format:
BRAND: [extract brand]
PRODUCT NAME: [extract name]
PRODUCT NUMBER: [extract number]
WEIGHT: [extract weight, specify unit if available]
MATERIALS: [extract materials, list primary components]
DIMENSIONS: [extract dimensions, specify unit and convert to metric system if needed]
COLOR: [extract color]
SUSTAINABILITY: [extract sustainability info]
OTHER INFO: [extract other relevant details, include notable attributes]
---MARKETING CONTENT---
HEADLINE: [Create an SEO title in {language}. Include the product type and its intended user. Avoid generic phrases like 'best', 'perfect' or 'ultimate'. Keep it between 50-75 chars]
SHORT TEXT: [Create a short description in {language}. Exclude the product name. Focus on benefits alongside key features or use cases. Avoid overly promotional language. Keep it between 180-210 chars]
LONG TEXT: [Create a detailed description in {language}. Describe features, materials and specifications in depth. Include practical use cases and care tips. Include any sustainability features. Keep it between 400-600 chars]
BULLET POINTS [in {language}, one feature per bullet point, max 75 chars each]:
- [key feature 1]
- [key feature 2]
..."#;

/// Prompt for writing marketing texts from an existing product record.
///
/// The reply is four blocks separated by blank lines: headline, short text,
/// long text, bullet list.
pub const DEFAULT_DESCRIPTION_PROMPT: &str = r#"Write a product description for the following product:

{product}

Follow these instructions:
1. Structure, as four blocks separated by one blank line:
- A headline of at most 75 characters.
- A short text summarizing the main properties of the product. Max 300 characters.
- A long text giving a fuller description with examples of use. Avoid subjective words such as best or nicest. Max 600 characters.
- A bullet list of all available facts, each bullet between 40 and 100 characters, each line starting with "- ".

2. Language and format:
- Write in {language}, even if the information is given in another language.
- Mention every piece of information at least once.
- Do not use apostrophes.
- Highlight sustainability only if such information is explicitly given."#;
