//! ARIA Support
//!
//! The roles, live-region politeness levels and orientations the
//! interaction primitives read and write.

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Alert,
    AlertDialog,
    Button,
    Checkbox,
    Dialog,
    List,
    ListItem,
    Radio,
    RadioGroup,
    Status,
    Switch,
    Tab,
    TabList,
    TabPanel,
    Timer,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "alert" => Self::Alert,
            "alertdialog" => Self::AlertDialog,
            "button" => Self::Button,
            "checkbox" => Self::Checkbox,
            "dialog" => Self::Dialog,
            "list" => Self::List,
            "listitem" => Self::ListItem,
            "radio" => Self::Radio,
            "radiogroup" => Self::RadioGroup,
            "status" => Self::Status,
            "switch" => Self::Switch,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "timer" => Self::Timer,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::AlertDialog => "alertdialog",
            Self::Button => "button",
            Self::Checkbox => "checkbox",
            Self::Dialog => "dialog",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Radio => "radio",
            Self::RadioGroup => "radiogroup",
            Self::Status => "status",
            Self::Switch => "switch",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::Timer => "timer",
        }
    }

    /// Roles whose containers should trap focus while open
    pub fn is_modal_surface(&self) -> bool {
        matches!(self, Self::Dialog | Self::AlertDialog)
    }
}

/// Live region politeness (`aria-live`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Politeness {
    /// Waits for the user to be idle
    Polite,
    /// Interrupts whatever is being spoken
    Assertive,
}

impl Politeness {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polite" => Some(Self::Polite),
            "assertive" => Some(Self::Assertive),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// `aria-orientation`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(AriaRole::parse("switch"), Some(AriaRole::Switch));
        assert_eq!(AriaRole::parse("TabList"), Some(AriaRole::TabList));
        assert_eq!(AriaRole::parse("invalid"), None);
        assert_eq!(AriaRole::AlertDialog.as_str(), "alertdialog");
    }

    #[test]
    fn test_modal_surfaces() {
        assert!(AriaRole::Dialog.is_modal_surface());
        assert!(AriaRole::AlertDialog.is_modal_surface());
        assert!(!AriaRole::TabPanel.is_modal_surface());
    }

    #[test]
    fn test_politeness_parsing() {
        assert_eq!(Politeness::parse("Polite"), Some(Politeness::Polite));
        assert_eq!(Politeness::parse("off"), None);
        assert_eq!(Politeness::Assertive.as_str(), "assertive");
    }
}
