//! Persisted knowledge shapes and the merge that flattens them per URL.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A known element on a site: how we last addressed it, plus free-text notes.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub ref_name: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl ElementInfo {
    /// Overlay the populated fields of `other` onto self.
    pub fn merge_from(&mut self, other: &ElementInfo) {
        if other.selector.is_some() {
            self.selector = other.selector.clone();
        }
        if other.ref_name.is_some() {
            self.ref_name = other.ref_name.clone();
        }
        if other.note.is_some() {
            self.note = other.note.clone();
        }
    }
}

/// Descriptor for a rich-text editor on the page (they rarely behave like
/// plain textboxes, so sites get one structured record of how to drive theirs).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorInfo {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub input_method: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Outcome history for one named task on a site.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub failure_count: u32,
    #[serde(default)]
    pub last_success: Option<String>,
    #[serde(default)]
    pub last_failure: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// One scope of knowledge: either the whole domain (`base`) or one path pattern.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSection {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub elements: BTreeMap<String, ElementInfo>,
    #[serde(default)]
    pub editor: Option<EditorInfo>,
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskRecord>,
    #[serde(default)]
    pub gotchas: Vec<String>,
}

/// A knowledge section scoped to a URL path pattern (`*` = one path segment).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternKnowledge {
    pub pattern: String,
    #[serde(flatten)]
    pub section: KnowledgeSection,
}

/// Everything we know about one domain. Pattern order is significant:
/// merges apply base first, then patterns in stored order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DomainKnowledge {
    pub domain: String,
    #[serde(default)]
    pub updated: String,
    #[serde(default)]
    pub base: KnowledgeSection,
    #[serde(default)]
    pub patterns: Vec<PatternKnowledge>,
}

impl DomainKnowledge {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Default::default()
        }
    }

    /// Mutable access to a section by name ("base" or a pattern string).
    pub fn section_mut(&mut self, name: &str) -> Option<&mut KnowledgeSection> {
        if name == "base" {
            return Some(&mut self.base);
        }
        self.patterns
            .iter_mut()
            .find(|p| p.pattern == name)
            .map(|p| &mut p.section)
    }

    /// Like `section_mut`, but appends a new pattern section when absent.
    pub fn section_mut_or_create(&mut self, name: &str) -> &mut KnowledgeSection {
        if name == "base" {
            return &mut self.base;
        }
        if let Some(idx) = self.patterns.iter().position(|p| p.pattern == name) {
            return &mut self.patterns[idx].section;
        }
        self.patterns.push(PatternKnowledge {
            pattern: name.to_string(),
            section: KnowledgeSection::default(),
        });
        let last = self.patterns.len() - 1;
        &mut self.patterns[last].section
    }
}

/// The flattened view of a domain's knowledge for one concrete URL:
/// base overlaid with every pattern section whose pattern matches the path.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedKnowledge {
    pub domain: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub elements: BTreeMap<String, ElementInfo>,
    #[serde(default)]
    pub editor: Option<EditorInfo>,
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskRecord>,
    #[serde(default)]
    pub gotchas: Vec<String>,
    /// Which sections contributed, in merge order ("base" first).
    #[serde(default)]
    pub matched_patterns: Vec<String>,
}

impl ResolvedKnowledge {
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            ..Default::default()
        }
    }

    /// Overlay one section. Scalar fields (description/editor) and element
    /// entries are overwritten by later sections; tasks keep the earliest
    /// definition; gotchas accumulate in order, skipping exact repeats.
    pub fn merge_section(&mut self, name: &str, section: &KnowledgeSection) {
        if section.description.is_some() {
            self.description = section.description.clone();
        }
        for (key, info) in &section.elements {
            self.elements.insert(key.clone(), info.clone());
        }
        if section.editor.is_some() {
            self.editor = section.editor.clone();
        }
        for (key, task) in &section.tasks {
            self.tasks.entry(key.clone()).or_insert_with(|| task.clone());
        }
        for gotcha in &section.gotchas {
            if !self.gotchas.contains(gotcha) {
                self.gotchas.push(gotcha.clone());
            }
        }
        self.matched_patterns.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section_with_gotchas(gotchas: &[&str]) -> KnowledgeSection {
        KnowledgeSection {
            gotchas: gotchas.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_order_and_matched_patterns() {
        let mut resolved = ResolvedKnowledge::new("example.com");
        resolved.merge_section("base", &section_with_gotchas(&["A"]));
        resolved.merge_section("/x/*", &section_with_gotchas(&["B"]));

        assert_eq!(resolved.gotchas, vec!["A", "B"]);
        assert_eq!(resolved.matched_patterns, vec!["base", "/x/*"]);
    }

    #[test]
    fn test_merge_overwrites_elements_keeps_earliest_task() {
        let mut base = KnowledgeSection::default();
        base.elements.insert(
            "submit".to_string(),
            ElementInfo {
                ref_name: Some("Post".to_string()),
                ..Default::default()
            },
        );
        base.tasks.insert(
            "login".to_string(),
            TaskRecord {
                success_count: 3,
                ..Default::default()
            },
        );

        let mut patterned = KnowledgeSection::default();
        patterned.elements.insert(
            "submit".to_string(),
            ElementInfo {
                ref_name: Some("Publish".to_string()),
                ..Default::default()
            },
        );
        patterned.tasks.insert(
            "login".to_string(),
            TaskRecord {
                success_count: 99,
                ..Default::default()
            },
        );

        let mut resolved = ResolvedKnowledge::new("example.com");
        resolved.merge_section("base", &base);
        resolved.merge_section("/compose", &patterned);

        assert_eq!(
            resolved.elements["submit"].ref_name.as_deref(),
            Some("Publish")
        );
        assert_eq!(resolved.tasks["login"].success_count, 3);
    }

    #[test]
    fn test_merge_skips_duplicate_gotchas() {
        let mut resolved = ResolvedKnowledge::new("example.com");
        resolved.merge_section("base", &section_with_gotchas(&["slow captcha"]));
        resolved.merge_section("/x/*", &section_with_gotchas(&["slow captcha", "B"]));

        assert_eq!(resolved.gotchas, vec!["slow captcha", "B"]);
    }

    #[test]
    fn test_section_mut_or_create_appends_pattern() {
        let mut dk = DomainKnowledge::new("example.com");
        dk.section_mut_or_create("/x/*").gotchas.push("A".to_string());

        assert_eq!(dk.patterns.len(), 1);
        assert_eq!(dk.patterns[0].pattern, "/x/*");
        assert!(dk.section_mut("/missing").is_none());
    }

    #[test]
    fn test_wire_format_round_trip() {
        let raw = r#"{
  "domain": "example.com",
  "updated": "2026-01-10T00:00:00Z",
  "base": {
    "gotchas": ["login button moves after resize"],
    "elements": { "signIn": { "refName": "Sign in", "note": "top right" } }
  },
  "patterns": [
    { "pattern": "/user/*/profile", "gotchas": ["avatar loads late"] }
  ]
}"#;
        let dk: DomainKnowledge = serde_json::from_str(raw).unwrap();
        assert_eq!(dk.patterns[0].pattern, "/user/*/profile");
        assert_eq!(dk.patterns[0].section.gotchas, vec!["avatar loads late"]);
        assert_eq!(
            dk.base.elements["signIn"].ref_name.as_deref(),
            Some("Sign in")
        );

        let out = serde_json::to_string(&dk).unwrap();
        assert!(out.contains("\"refName\""));
        assert!(out.contains("\"/user/*/profile\""));
    }
}
