//! File-per-domain knowledge store.
//!
//! Each registered domain persists as `<dir>/<domain>.json` holding a
//! `DomainKnowledge` record. Reads of missing or corrupt records are soft
//! (logged, reported as absence) so a bad file never blocks an automation
//! run that does not need it.

use chrono::Utc;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::model::{DomainKnowledge, ElementInfo, KnowledgeSection, ResolvedKnowledge};
use crate::urls::{extract_domain, extract_path, path_matches};

pub struct KnowledgeStore {
    dir: PathBuf,
    max_gotchas_per_section: usize,
}

impl KnowledgeStore {
    pub fn new(dir: PathBuf, max_gotchas_per_section: usize) -> Self {
        Self {
            dir,
            max_gotchas_per_section,
        }
    }

    pub fn domain_file(&self, domain: &str) -> PathBuf {
        let safe = domain.replace([':', '/', '\\'], "_");
        self.dir.join(format!("{}.json", safe))
    }

    /// Raw record for one domain. None when absent or unreadable.
    pub fn load_domain(&self, domain: &str) -> Option<DomainKnowledge> {
        let path = self.domain_file(domain);
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(domain, error = %e, "Failed to read knowledge file");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(domain, error = %e, "Malformed knowledge file, treating as absent");
                None
            }
        }
    }

    fn save_domain(&self, record: &mut DomainKnowledge) -> sitepilot_core::Result<()> {
        record.updated = Utc::now().to_rfc3339();
        std::fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(self.domain_file(&record.domain), content)?;
        Ok(())
    }

    /// Flattened knowledge for `url`: base plus every pattern section whose
    /// pattern matches the URL path, merged in stored order. None when the
    /// domain has no record.
    pub fn load_knowledge(&self, url: &str) -> Option<ResolvedKnowledge> {
        let domain = extract_domain(url)?;
        let record = self.load_domain(&domain)?;
        let path = extract_path(url);

        let mut resolved = ResolvedKnowledge::new(&domain);
        resolved.merge_section("base", &record.base);
        for pattern in &record.patterns {
            if path_matches(&path, &pattern.pattern) {
                resolved.merge_section(&pattern.pattern, &pattern.section);
            }
        }
        Some(resolved)
    }

    /// Append a gotcha to one section of the domain's record, creating the
    /// record (and the pattern section) if absent. Returns false without
    /// error when the gotcha already exists in that section, the section is
    /// at its cap, or persisting fails.
    pub fn add_gotcha(&self, url: &str, text: &str, section: Option<&str>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let domain = match extract_domain(url) {
            Some(d) => d,
            None => {
                warn!(url, "Cannot record gotcha for unparseable URL");
                return false;
            }
        };

        let mut record = self
            .load_domain(&domain)
            .unwrap_or_else(|| DomainKnowledge::new(&domain));
        let section_name = section.unwrap_or("base");
        let sect = record.section_mut_or_create(section_name);

        if sect.gotchas.iter().any(|g| g == text) {
            debug!(domain, section = section_name, "Gotcha already recorded");
            return false;
        }
        if sect.gotchas.len() >= self.max_gotchas_per_section {
            debug!(
                domain,
                section = section_name,
                cap = self.max_gotchas_per_section,
                "Gotcha cap reached, not adding"
            );
            return false;
        }
        sect.gotchas.push(text.to_string());

        match self.save_domain(&mut record) {
            Ok(()) => {
                info!(domain, section = section_name, "Recorded gotcha");
                true
            }
            Err(e) => {
                warn!(domain, error = %e, "Failed to persist gotcha");
                false
            }
        }
    }

    /// Merge selector info into the base section's element entry with this
    /// name. Returns false when the domain has no record yet (elements are
    /// only refined for sites we already know).
    pub fn update_element(&self, url: &str, name: &str, info: &ElementInfo) -> bool {
        let domain = match extract_domain(url) {
            Some(d) => d,
            None => return false,
        };
        let mut record = match self.load_domain(&domain) {
            Some(r) => r,
            None => {
                debug!(domain, "No knowledge record, not creating one for element update");
                return false;
            }
        };

        record
            .base
            .elements
            .entry(name.to_string())
            .and_modify(|existing| existing.merge_from(info))
            .or_insert_with(|| info.clone());

        match self.save_domain(&mut record) {
            Ok(()) => {
                info!(domain, element = name, "Updated element knowledge");
                true
            }
            Err(e) => {
                warn!(domain, error = %e, "Failed to persist element update");
                false
            }
        }
    }

    /// Bump the success or failure counter of the first section (base, then
    /// patterns in order) defining this task. Returns false when no section
    /// defines it.
    pub fn record_task_result(&self, url: &str, task_name: &str, success: bool) -> bool {
        let domain = match extract_domain(url) {
            Some(d) => d,
            None => return false,
        };
        let mut record = match self.load_domain(&domain) {
            Some(r) => r,
            None => return false,
        };

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let mut stamp = |section: &mut KnowledgeSection| -> bool {
            match section.tasks.get_mut(task_name) {
                Some(task) => {
                    if success {
                        task.success_count += 1;
                        task.last_success = Some(today.clone());
                    } else {
                        task.failure_count += 1;
                        task.last_failure = Some(today.clone());
                    }
                    true
                }
                None => false,
            }
        };

        let mut found = stamp(&mut record.base);
        if !found {
            for pattern in &mut record.patterns {
                if stamp(&mut pattern.section) {
                    found = true;
                    break;
                }
            }
        }
        if !found {
            debug!(domain, task = task_name, "No section defines this task");
            return false;
        }

        match self.save_domain(&mut record) {
            Ok(()) => {
                info!(domain, task = task_name, success, "Recorded task result");
                true
            }
            Err(e) => {
                warn!(domain, error = %e, "Failed to persist task result");
                false
            }
        }
    }

    /// All domains with a stored record, lexicographically sorted.
    pub fn list_domains(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(e) => e,
            Err(_) => return Vec::new(),
        };
        let mut domains: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    path.file_stem()
                        .and_then(|s| s.to_str())
                        .map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect();
        domains.sort();
        domains
    }

    /// Whole-record write, replacing any stored record for the domain.
    /// Tests seed domain records through this.
    pub fn put_domain(&self, mut record: DomainKnowledge) -> sitepilot_core::Result<()> {
        self.save_domain(&mut record)
    }
}
