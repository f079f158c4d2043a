//! Searchable text extraction from a spooled HTML body.
//!
//! The body is parsed with an HTML5 parser, so broken markup is recovered
//! the way a browser would and parsing never fails. Text is pulled from a
//! fixed, ordered list of regions, each identified by a class name.

use scraper::{Html, Selector};
use tracing::trace;

use crate::error::{Result, SpoolError};

/// Region classes used when nothing else is configured: the sender block
/// first, then the main content.
pub const DEFAULT_REGIONS: [&str; 2] = ["postheader", "main"];

/// One named region and its compiled selector.
#[derive(Debug, Clone)]
struct Region {
    name: String,
    selector: Selector,
}

/// Pulls the text of configured regions out of an HTML body.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    regions: Vec<Region>,
}

impl ContentExtractor {
    /// Build an extractor for the given region class names, in order.
    ///
    /// A region selects the first element whose `class` attribute contains
    /// the name as a substring, so `main` also hits `class="mainwrapper"`.
    pub fn new<I, S>(regions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let regions = regions
            .into_iter()
            .map(|name| compile_region(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { regions })
    }

    /// Region names, in extraction order.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    /// Concatenate the text content of every region, in order.
    ///
    /// A region with no matching element contributes nothing. An empty body
    /// yields an empty string.
    pub fn extract(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        let document = Html::parse_document(html);
        let mut content = String::new();

        for region in &self.regions {
            match document.select(&region.selector).next() {
                Some(element) => {
                    let before = content.len();
                    content.extend(element.text());
                    trace!(region = %region.name, chars = content.len() - before, "Extracted region");
                }
                None => trace!(region = %region.name, "Region not present"),
            }
        }

        content
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_REGIONS).expect("default regions are valid selectors")
    }
}

/// Compile `name` into a `[class*="name"]` attribute selector.
fn compile_region(name: &str) -> Result<Region> {
    if name.is_empty() {
        return Err(SpoolError::InvalidRegion(name.to_string()));
    }

    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    let selector = Selector::parse(&format!("[class*=\"{escaped}\"]"))
        .map_err(|_| SpoolError::InvalidRegion(name.to_string()))?;

    Ok(Region {
        name: name.to_string(),
        selector,
    })
}
