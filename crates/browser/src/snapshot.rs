//! Parser for the driver's textual accessibility snapshot.
//!
//! Interactive lines look like `- button "Sign in" [ref=e3]`, optionally
//! followed by attribute markers such as `[nth=1]` or `[disabled]`. Anything
//! else in the dump (headings, static text, container nodes without refs) is
//! skipped, not treated as an error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ELEMENT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"-\s+(\S+)\s+"([^"]*)"\s+\[ref=([^\]]+)\]"#)
        .expect("element line regex is valid")
});

static NTH_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[nth=(\d+)\]").expect("nth attr regex is valid"));

/// One interactive element pulled out of a snapshot, in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParsedElement {
    pub role: String,
    pub name: String,
    /// Opaque handle for driver calls; only valid against the snapshot it
    /// came from.
    pub ref_id: String,
    /// Position among elements sharing role and name, 0 when unmarked.
    pub nth: usize,
    pub disabled: bool,
}

pub fn parse_snapshot(text: &str) -> Vec<ParsedElement> {
    let mut elements = Vec::new();
    for line in text.lines() {
        let caps = match ELEMENT_LINE.captures(line) {
            Some(c) => c,
            None => continue,
        };
        let nth = NTH_ATTR
            .captures(line)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0);
        elements.push(ParsedElement {
            role: caps[1].to_string(),
            name: caps[2].to_string(),
            ref_id: caps[3].to_string(),
            nth,
            disabled: line.contains("[disabled]"),
        });
    }
    elements
}
