use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use fs_err as fs;
use std::path::{Path, PathBuf};

use crate::parse::ProductCopy;

/// Display titles of the five sections, in export order.
pub const SECTION_TITLES: [&str; 5] = [
    "Meta Title (SEO-Optimized)",
    "Meta Description (SEO-Optimized)",
    "Suggested SEO Keywords",
    "Related Keywords (Semantic & Long-tail)",
    "Product Description (On-Brand & Persuasive)",
];

/// Title/content pairs in export order.
pub fn sections(copy: &ProductCopy) -> [(&'static str, &str); 5] {
    [
        (SECTION_TITLES[0], copy.meta_title.as_str()),
        (SECTION_TITLES[1], copy.meta_description.as_str()),
        (SECTION_TITLES[2], copy.seo_keywords.as_str()),
        (SECTION_TITLES[3], copy.related_keywords.as_str()),
        (SECTION_TITLES[4], copy.product_description.as_str()),
    ]
}

/// The combined text used for both "copy all" and the saved file.
pub fn render_plain_text(copy: &ProductCopy) -> String {
    sections(copy)
        .iter()
        .map(|(title, content)| format!("{title}:\n{content}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn file_name(date: NaiveDate) -> String {
    format!("product_copy_{}.txt", date.format("%Y-%m-%d"))
}

/// Writes the copy into `dir` under today's (local) file name. An export on
/// the same day replaces the earlier file.
pub fn save(dir: &Path, copy: &ProductCopy) -> Result<PathBuf> {
    // Local date, not UTC.
    save_dated(dir, copy, Local::now().date_naive())
}

fn save_dated(dir: &Path, copy: &ProductCopy, date: NaiveDate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name(date));
    fs::write(&path, render_plain_text(copy)).with_context(|| format!("exporting product copy to {}", path.display()))?;
    tracing::info!(path = %path.display(), "product copy exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn copy() -> ProductCopy {
        ProductCopy {
            meta_title: "Linen Apron | Field & Co".into(),
            meta_description: "A sturdy apron for long days.".into(),
            seo_keywords: "linen apron, work apron".into(),
            related_keywords: "washed linen apron, gift for bakers".into(),
            product_description: "Made from **washed linen**.\n\n- Two pockets".into(),
        }
    }

    #[test]
    fn plain_text_uses_fixed_labels_and_blank_line_separators() {
        let expected = "Meta Title (SEO-Optimized):\nLinen Apron | Field & Co\n\n\
Meta Description (SEO-Optimized):\nA sturdy apron for long days.\n\n\
Suggested SEO Keywords:\nlinen apron, work apron\n\n\
Related Keywords (Semantic & Long-tail):\nwashed linen apron, gift for bakers\n\n\
Product Description (On-Brand & Persuasive):\nMade from **washed linen**.\n\n- Two pockets";
        assert_eq!(render_plain_text(&copy()), expected);
    }

    #[test]
    fn file_name_is_dated() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(file_name(date), "product_copy_2024-03-07.txt");
    }

    #[test]
    fn save_names_the_file_after_the_local_date() {
        let tmp = tempfile::tempdir().unwrap();
        let path = save(tmp.path(), &copy()).unwrap();
        assert_eq!(path, tmp.path().join(file_name(Local::now().date_naive())));
    }

    #[test]
    fn save_writes_into_a_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("exports");
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let path = save_dated(&dir, &copy(), date).unwrap();
        assert_eq!(path, dir.join("product_copy_2025-12-31.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), render_plain_text(&copy()));
    }
}
