//! Splits the final generation response into the five product-copy fields.
//!
//! Sections are located by heading text, never by position. A heading is an
//! ATX line (`#` markers followed by whitespace), or a line that is entirely
//! bold/underscore emphasis naming one of the five sections; a bolded value
//! such as `**Stoneware Mug**` is content. Each section runs to the next
//! heading, except the product description, which runs to the end of the
//! document.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::errors::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCopy {
    pub meta_title: String,
    pub meta_description: String,
    pub seo_keywords: String,
    pub related_keywords: String,
    pub product_description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MetaTitle,
    MetaDescription,
    SeoKeywords,
    RelatedKeywords,
    ProductDescription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    NextHeading,
    EndOfDocument,
}

struct Rule {
    field: Field,
    label: &'static str,
    boundary: Boundary,
}

const RULES: [Rule; 5] = [
    Rule { field: Field::MetaTitle, label: "meta title", boundary: Boundary::NextHeading },
    Rule { field: Field::MetaDescription, label: "meta description", boundary: Boundary::NextHeading },
    Rule { field: Field::SeoKeywords, label: "seo keywords", boundary: Boundary::NextHeading },
    Rule { field: Field::RelatedKeywords, label: "related keywords", boundary: Boundary::NextHeading },
    Rule { field: Field::ProductDescription, label: "product description", boundary: Boundary::EndOfDocument },
];

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*(?:#{1,6}(?:[ \t]+(?P<hashed>[^\n]*?))?|(?P<bold>(?:\*\*|__)[^\n]+?(?:\*\*|__)[ \t]*:?))[ \t]*\r?$")
            .expect("static regex")
    })
}

fn numbering_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]\s*").expect("static regex"))
}

fn thematic_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\n[ \t]*(?:-{3,}|\*{3,}|_{3,})[ \t]*)+$").expect("static regex"))
}

struct Heading {
    label: String,
    start: usize,
    end: usize,
}

fn normalize_label(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '*' | '_' | '#')).collect();
    let stripped = stripped.trim();
    numbering_re().replace(stripped, "").trim().to_lowercase()
}

fn names_a_section(label: &str) -> bool {
    RULES.iter().any(|rule| label.starts_with(rule.label))
}

fn headings(text: &str) -> Vec<Heading> {
    heading_re()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let label = match (caps.name("hashed"), caps.name("bold")) {
                (Some(hashed), _) => normalize_label(hashed.as_str()),
                (None, Some(bold)) => {
                    let label = normalize_label(bold.as_str());
                    if !names_a_section(&label) {
                        return None;
                    }
                    label
                }
                // Bare `#` run.
                (None, None) => String::new(),
            };
            Some(Heading { label, start: whole.start(), end: whole.end() })
        })
        .collect()
}

fn clean(section: &str) -> String {
    let trimmed = section.trim();
    thematic_break_re().replace(trimmed, "").trim().to_string()
}

fn extract(text: &str, heads: &[Heading], rule: &Rule) -> Result<String, ParseError> {
    let idx = heads
        .iter()
        .position(|h| h.label.starts_with(rule.label))
        .ok_or(ParseError::MissingSection(rule.label))?;
    let from = heads[idx].end;
    let to = match rule.boundary {
        Boundary::EndOfDocument => text.len(),
        Boundary::NextHeading => heads.get(idx + 1).map_or(text.len(), |h| h.start),
    };
    let body = clean(&text[from..to]);
    if body.is_empty() {
        return Err(ParseError::MissingSection(rule.label));
    }
    Ok(body)
}

/// Parses the whole response or nothing.
pub fn parse_product_copy(text: &str) -> Result<ProductCopy, ParseError> {
    let heads = headings(text);
    let mut copy = ProductCopy {
        meta_title: String::new(),
        meta_description: String::new(),
        seo_keywords: String::new(),
        related_keywords: String::new(),
        product_description: String::new(),
    };
    for rule in &RULES {
        let body = extract(text, &heads, rule)?;
        let slot = match rule.field {
            Field::MetaTitle => &mut copy.meta_title,
            Field::MetaDescription => &mut copy.meta_description,
            Field::SeoKeywords => &mut copy.seo_keywords,
            Field::RelatedKeywords => &mut copy.related_keywords,
            Field::ProductDescription => &mut copy.product_description,
        };
        *slot = body;
    }
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WELL_FORMED: &str = "---

### **Meta Title (SEO-Optimized, Max 60 Characters)**

Hand-Thrown Stoneware Mug | Clayworks

### **Meta Description (SEO-Optimized, Max 160 Characters)**

Start slow mornings with a mug shaped by hand.

### **SEO Keywords (Comma-separated, 2-3 terms)**

stoneware mug, handmade mug

### **Related Keywords (Semantic & Long-tail, Comma-separated)**

artisan coffee cup, ceramic mug gift

---

### **Product Description (On-Brand & Persuasive)**

Every mug is **thrown by hand**.

#### Why you'll love it
- Holds 12 oz
- Dishwasher safe
";

    fn expected() -> ProductCopy {
        ProductCopy {
            meta_title: "Hand-Thrown Stoneware Mug | Clayworks".into(),
            meta_description: "Start slow mornings with a mug shaped by hand.".into(),
            seo_keywords: "stoneware mug, handmade mug".into(),
            related_keywords: "artisan coffee cup, ceramic mug gift".into(),
            product_description: "Every mug is **thrown by hand**.\n\n#### Why you'll love it\n- Holds 12 oz\n- Dishwasher safe".into(),
        }
    }

    #[test]
    fn parses_the_prompted_layout() {
        assert_eq!(parse_product_copy(WELL_FORMED).unwrap(), expected());
    }

    #[test]
    fn parsing_is_repeatable() {
        assert_eq!(parse_product_copy(WELL_FORMED), parse_product_copy(WELL_FORMED));
    }

    #[test]
    fn tolerates_heading_level_case_and_bold_variations() {
        let text = "## meta title\nHand-Thrown Stoneware Mug | Clayworks\n\n\
# **META DESCRIPTION**   \n\n   Start slow mornings with a mug shaped by hand.   \n\n\
**SEO Keywords:**\nstoneware mug, handmade mug\n\n\
#### 4. __Related Keywords__\nartisan coffee cup, ceramic mug gift\n***\n\n\
### Product Description\nEvery mug is **thrown by hand**.\n\n#### Why you'll love it\n- Holds 12 oz\n- Dishwasher safe\n\n\n";
        assert_eq!(parse_product_copy(text).unwrap(), expected());
    }

    #[test]
    fn anchors_on_labels_not_order() {
        let text = "### **Meta Description**\n\nDesc.\n\n---\n\n\
### **Meta Title**\n\nTitle\n\n\
### **Related Keywords**\n\nrel\n\n\
### **SEO Keywords**\n\nseo\n\n\
### **Product Description**\n\nBody.";
        let copy = parse_product_copy(text).unwrap();
        assert_eq!(copy.meta_title, "Title");
        assert_eq!(copy.meta_description, "Desc.");
        assert_eq!(copy.seo_keywords, "seo");
        assert_eq!(copy.related_keywords, "rel");
        assert_eq!(copy.product_description, "Body.");
    }

    #[test]
    fn bold_values_are_content_not_headings() {
        let text = WELL_FORMED
            .replace("Hand-Thrown Stoneware Mug | Clayworks", "**Hand-Thrown Stoneware Mug | Clayworks**")
            .replace("artisan coffee cup, ceramic mug gift", "__artisan coffee cup, ceramic mug gift__");
        let copy = parse_product_copy(&text).unwrap();
        assert_eq!(copy.meta_title, "**Hand-Thrown Stoneware Mug | Clayworks**");
        assert_eq!(copy.related_keywords, "__artisan coffee cup, ceramic mug gift__");
        assert_eq!(copy.meta_description, expected().meta_description);
    }

    #[test]
    fn hashtag_keywords_are_content_not_headings() {
        let text = WELL_FORMED.replace("stoneware mug, handmade mug", "#stonewaremug #handmademug");
        let copy = parse_product_copy(&text).unwrap();
        assert_eq!(copy.seo_keywords, "#stonewaremug #handmademug");
        assert_eq!(copy.related_keywords, expected().related_keywords);
    }

    #[test]
    fn missing_meta_description_fails_whole_parse() {
        let text = WELL_FORMED.replace("Meta Description", "Summary");
        assert_eq!(parse_product_copy(&text), Err(ParseError::MissingSection("meta description")));
    }

    #[test]
    fn empty_section_counts_as_missing() {
        let text = WELL_FORMED.replace("stoneware mug, handmade mug", "");
        assert_eq!(parse_product_copy(&text), Err(ParseError::MissingSection("seo keywords")));
    }

    #[test]
    fn any_single_missing_heading_fails() {
        for label in ["Meta Title", "Meta Description", "SEO Keywords", "Related Keywords", "Product Description"] {
            let text = WELL_FORMED.replace(label, "Notes");
            assert!(parse_product_copy(&text).is_err(), "{label} removed but parse succeeded");
        }
    }
}
