//! Finds the element a declarative target describes in a parsed snapshot.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::snapshot::ParsedElement;

/// Declarative element descriptor. Every provided field must match; absent
/// fields are unconstrained. Disabled elements never match.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub role: Option<String>,
    /// Exact accessible-name match.
    #[serde(default)]
    pub name: Option<String>,
    /// Case-insensitive substring match on the accessible name.
    #[serde(default)]
    pub name_contains: Option<String>,
    /// Zero-based index among elements sharing role and name.
    #[serde(default)]
    pub nth: Option<usize>,
}

impl Target {
    /// Human-readable form for step errors and logs.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(role) = &self.role {
            parts.push(format!("role={}", role));
        }
        if let Some(name) = &self.name {
            parts.push(format!("name=\"{}\"", name));
        }
        if let Some(sub) = &self.name_contains {
            parts.push(format!("name~=\"{}\"", sub));
        }
        if let Some(nth) = self.nth {
            parts.push(format!("nth={}", nth));
        }
        if parts.is_empty() {
            "any element".to_string()
        } else {
            parts.join(" ")
        }
    }
}

fn matches(element: &ParsedElement, target: &Target) -> bool {
    if element.disabled {
        return false;
    }
    if let Some(role) = &target.role {
        if element.role != *role {
            return false;
        }
    }
    if let Some(name) = &target.name {
        if element.name != *name {
            return false;
        }
    }
    if let Some(sub) = &target.name_contains {
        if !element.name.to_lowercase().contains(&sub.to_lowercase()) {
            return false;
        }
    }
    if let Some(nth) = target.nth {
        if element.nth != nth {
            return false;
        }
    }
    true
}

/// First element in snapshot order satisfying every constraint of `target`.
pub fn find_element<'a>(
    elements: &'a [ParsedElement],
    target: &Target,
) -> Option<&'a ParsedElement> {
    elements.iter().find(|el| matches(el, target))
}

/// Try the primary target, then each fallback in listed order. A fallback
/// hit is logged with its index and the ref it resolved to.
pub fn find_element_with_fallback<'a>(
    elements: &'a [ParsedElement],
    primary: &Target,
    fallbacks: &[Target],
) -> Option<&'a ParsedElement> {
    if let Some(found) = find_element(elements, primary) {
        return Some(found);
    }
    for (idx, fallback) in fallbacks.iter().enumerate() {
        if let Some(found) = find_element(elements, fallback) {
            debug!(
                fallback = idx,
                target = %fallback.describe(),
                ref_id = %found.ref_id,
                "Primary target missed, fallback resolved"
            );
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(role: &str, name: &str, ref_id: &str) -> ParsedElement {
        ParsedElement {
            role: role.to_string(),
            name: name.to_string(),
            ref_id: ref_id.to_string(),
            nth: 0,
            disabled: false,
        }
    }

    fn page() -> Vec<ParsedElement> {
        vec![
            element("textbox", "Username", "e1"),
            element("textbox", "Password", "e2"),
            element("button", "Sign in", "e3"),
            element("link", "Forgot password?", "e4"),
        ]
    }

    #[test]
    fn test_role_and_exact_name() {
        let elements = page();
        let target = Target {
            role: Some("button".to_string()),
            name: Some("Sign in".to_string()),
            ..Default::default()
        };
        assert_eq!(find_element(&elements, &target).unwrap().ref_id, "e3");
    }

    #[test]
    fn test_name_contains_is_case_insensitive() {
        let elements = page();
        let target = Target {
            name_contains: Some("FORGOT".to_string()),
            ..Default::default()
        };
        assert_eq!(find_element(&elements, &target).unwrap().ref_id, "e4");
    }

    #[test]
    fn test_nth_disambiguates() {
        let mut elements = vec![element("button", "Delete", "e1"), {
            let mut second = element("button", "Delete", "e2");
            second.nth = 1;
            second
        }];
        elements.push(element("button", "Other", "e3"));

        let target = Target {
            role: Some("button".to_string()),
            name: Some("Delete".to_string()),
            nth: Some(1),
            ..Default::default()
        };
        assert_eq!(find_element(&elements, &target).unwrap().ref_id, "e2");
    }

    #[test]
    fn test_disabled_never_matches() {
        let mut elements = page();
        elements[2].disabled = true;
        let target = Target {
            role: Some("button".to_string()),
            ..Default::default()
        };
        assert!(find_element(&elements, &target).is_none());
    }

    #[test]
    fn test_fallback_order() {
        let elements = page();
        let primary = Target {
            role: Some("button".to_string()),
            name: Some("Log in".to_string()),
            ..Default::default()
        };
        let fallbacks = vec![
            Target {
                role: Some("button".to_string()),
                name: Some("Submit".to_string()),
                ..Default::default()
            },
            Target {
                role: Some("button".to_string()),
                name_contains: Some("sign".to_string()),
                ..Default::default()
            },
        ];

        let found = find_element_with_fallback(&elements, &primary, &fallbacks).unwrap();
        assert_eq!(found.ref_id, "e3");

        let none = find_element_with_fallback(&elements, &primary, &[]);
        assert!(none.is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let elements = vec![element("link", "Docs", "e1"), element("link", "Docs", "e2")];
        let target = Target {
            role: Some("link".to_string()),
            ..Default::default()
        };
        assert_eq!(find_element(&elements, &target).unwrap().ref_id, "e1");
    }
}
