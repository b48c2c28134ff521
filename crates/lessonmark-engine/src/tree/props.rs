use serde::Serialize;

/// How a list derives the ordinals it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListVariant {
    /// `1, 2, 3` for ordered lists, no ordinal for bullets.
    #[default]
    Plain,
    /// `1, 1.1, 1.2, 2`: nested ordinals extend the parent's.
    DecimalNested,
    /// Explicit labels from the source text win over computed ordinals.
    Custom,
}

impl ListVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            ListVariant::Plain => "plain",
            ListVariant::DecimalNested => "decimal-nested",
            ListVariant::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProps {
    pub ordered: bool,
    /// First ordinal of an ordered list, as written in the source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    pub variant: ListVariant,
    pub is_decimal: bool,
    /// Unique within one document render; `None` when no ordinal is shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_id: Option<String>,
}

impl ListProps {
    pub fn ordered(start: u64) -> Self {
        Self {
            ordered: true,
            start: Some(start),
            ..Self::default()
        }
    }

    pub fn bullet() -> Self {
        Self::default()
    }

    /// Whether items of this list render a visible ordinal.
    pub fn shows_ordinal(&self) -> bool {
        self.ordered || self.variant != ListVariant::Plain
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemProps {
    /// Nesting depth derived from source indentation, 0 for top-level items.
    pub level: usize,
    /// Visual column of the item marker, once known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
    /// Explicit label captured from the item text (`1.2`, `b`, `iv`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Number written on an ordered item's own marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}
