use crate::config::LayoutConfig;

/// Short citation shown on a label's second line: `"Wang et al., 2024"`.
///
/// `authors` is a `"; "`-separated list of `"Surname, Given"` entries; only
/// surnames are kept. One author prints alone, two are joined with `&`,
/// three or more collapse to `et al.`. The year is truncated to an integer,
/// dropping any disambiguation fraction.
pub fn citation(authors: &str, year: f64) -> String {
    let mut surnames = authors.split("; ").map(surname);
    let first = surnames.next().unwrap_or_default();
    let names = match (surnames.next(), surnames.next()) {
        (None, _) => first.to_string(),
        (Some(second), None) => format!("{first} & {second}"),
        (Some(_), Some(_)) => format!("{first} et al."),
    };
    format!("{names}, {}", year.floor() as i64)
}

fn surname(author: &str) -> &str {
    author.split(", ").next().unwrap_or(author)
}

/// Monospace-advance estimate of a two-line label's rendered width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintEstimator {
    title_char_width: f64,
    author_char_width: f64,
    padding: f64,
}

impl FootprintEstimator {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            title_char_width: config.title_char_width,
            author_char_width: config.author_char_width,
            padding: config.padding,
        }
    }

    /// Width in pixels of the wider label line plus padding on both sides.
    pub fn estimate(&self, title: &str, authors: &str, year: f64) -> f64 {
        let title_width = title.chars().count() as f64 * self.title_char_width;
        let author_width = citation(authors, year).chars().count() as f64 * self.author_char_width;
        title_width.max(author_width) + 2.0 * self.padding
    }
}

impl Default for FootprintEstimator {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}
