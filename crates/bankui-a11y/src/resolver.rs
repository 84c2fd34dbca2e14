//! Focusable Set Resolution
//!
//! Decides which elements inside a container take part in the Tab
//! sequence. Tag eligibility is a declarative table so new interactive
//! element kinds are added by extending [`DEFAULT_RULES`], not by adding
//! branches.

use bankui_dom::NodeId;

use crate::platform::{FocusableElement, PlatformFocusAdapter};

/// Eligibility rule for an interactive tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRule {
    /// Always interactive
    Always,
    /// Interactive unless `disabled`
    UnlessDisabled,
    /// Interactive only with an `href`
    WithHref,
}

impl TagRule {
    fn admits(self, el: &FocusableElement) -> bool {
        match self {
            Self::Always => true,
            Self::UnlessDisabled => !el.is_disabled,
            Self::WithHref => el.has_href,
        }
    }
}

/// Built-in predicate table
pub const DEFAULT_RULES: &[(&str, TagRule)] = &[
    ("button", TagRule::UnlessDisabled),
    ("input", TagRule::UnlessDisabled),
    ("select", TagRule::UnlessDisabled),
    ("textarea", TagRule::UnlessDisabled),
    ("a", TagRule::WithHref),
    ("area", TagRule::WithHref),
    ("summary", TagRule::Always),
];

/// Computes the ordered set of currently focusable elements
#[derive(Debug, Clone)]
pub struct FocusableSetResolver {
    rules: Vec<(String, TagRule)>,
}

impl Default for FocusableSetResolver {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(tag, rule)| (tag.to_string(), *rule))
                .collect(),
        }
    }
}

impl FocusableSetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a tag
    pub fn with_rule(mut self, tag: &str, rule: TagRule) -> Self {
        let tag = tag.to_ascii_lowercase();
        self.rules.retain(|(t, _)| *t != tag);
        self.rules.push((tag, rule));
        self
    }

    fn rule_for(&self, tag: &str) -> Option<TagRule> {
        self.rules.iter().find(|(t, _)| t == tag).map(|(_, r)| *r)
    }

    /// Interactive tag (per table), any `href`, or an explicit non-negative `tabindex`
    pub fn is_interactive(&self, el: &FocusableElement) -> bool {
        self.rule_for(&el.tag).is_some_and(|rule| rule.admits(el))
            || el.has_href
            || el.tab_index.is_some_and(|t| t >= 0)
    }

    /// Member of the Tab sequence
    pub fn is_tabbable(&self, el: &FocusableElement) -> bool {
        self.is_interactive(el) && !el.is_disabled && el.is_visible && el.tab_reachable()
    }

    /// Can take focus programmatically (includes `tabindex="-1"` targets)
    pub fn is_focusable(&self, el: &FocusableElement) -> bool {
        (self.is_interactive(el) || el.tab_index.is_some()) && !el.is_disabled && el.is_visible
    }

    /// Tab sequence inside `container`, in document order
    ///
    /// An empty result is not an error: callers skip focus moves.
    pub fn resolve(
        &self,
        adapter: &dyn PlatformFocusAdapter,
        container: NodeId,
    ) -> Vec<FocusableElement> {
        adapter
            .query_focusable(container)
            .into_iter()
            .filter(|el| self.is_tabbable(el))
            .collect()
    }

    /// Whether a single element can still take focus
    pub fn can_focus(&self, adapter: &dyn PlatformFocusAdapter, element: NodeId) -> bool {
        adapter
            .describe(element)
            .is_some_and(|el| self.is_focusable(&el))
    }
}
