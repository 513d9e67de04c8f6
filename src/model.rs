use serde::{Deserialize, Serialize};

pub const ADD_ICON_ID: &str = "add-icon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Bookmark,
    Widget,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Bookmark => "bookmark",
            ItemKind::Widget => "widget",
        }
    }
}

/// One tile of a category grid, as persisted.
///
/// `size_token` keeps whatever string was stored so an untouched collection saves back
/// identically; [`crate::layout::SizeToken::parse`] decides how it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridItem {
    pub kind: ItemKind,
    pub id: String,
    pub title: String,
    pub size_token: String,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hint: Option<String>,
}

impl GridItem {
    pub fn new(kind: ItemKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            id: format!("{}-{}", kind.as_str(), uuid::Uuid::new_v4()),
            title: title.into(),
            size_token: "1x1".to_string(),
            order: 0,
            icon_ref: None,
            target: None,
            color_hint: None,
        }
    }

    pub fn bookmark(title: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::new(ItemKind::Bookmark, title)
        }
    }

    /// Placeholder tile shown in a category that has nothing else, so it never renders empty.
    pub fn add_icon() -> Self {
        Self {
            kind: ItemKind::Widget,
            id: ADD_ICON_ID.to_string(),
            title: "Add".to_string(),
            size_token: "1x1".to_string(),
            order: 0,
            icon_ref: Some("plus".to_string()),
            target: None,
            color_hint: None,
        }
    }

    pub fn is_add_icon(&self) -> bool {
        self.id == ADD_ICON_ID
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_size(mut self, token: impl Into<String>) -> Self {
        self.size_token = token.into();
        self
    }

    pub fn with_icon(mut self, icon_ref: impl Into<String>) -> Self {
        self.icon_ref = Some(icon_ref.into());
        self
    }

    pub fn with_color(mut self, color_hint: impl Into<String>) -> Self {
        self.color_hint = Some(color_hint.into());
        self
    }
}

/// Reassigns `order` to each item's position.
pub fn renumber(items: &mut [GridItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index as u32;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(rename = "icon")]
    pub icon_ref: String,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default)]
    pub is_edited: bool,
}

impl Category {
    pub fn new(id: &str, label: &str, icon_ref: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon_ref: icon_ref.to_string(),
            is_custom: false,
            is_edited: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSettings {
    #[serde(default = "default_icon_size")]
    pub icon_size: f32,
    #[serde(default = "default_icon_border_radius")]
    pub icon_border_radius: f32,
    #[serde(default = "default_icon_spacing")]
    pub icon_spacing: f32,
    #[serde(default = "default_show_name")]
    pub show_name: bool,
    #[serde(default = "default_name_size")]
    pub name_size: f32,
    #[serde(default = "default_max_content_width")]
    pub max_content_width: f32,
}

fn default_icon_size() -> f32 {
    60.0
}

fn default_icon_border_radius() -> f32 {
    14.0
}

fn default_icon_spacing() -> f32 {
    27.0
}

fn default_show_name() -> bool {
    true
}

fn default_name_size() -> f32 {
    12.0
}

fn default_max_content_width() -> f32 {
    1388.0
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            icon_size: default_icon_size(),
            icon_border_radius: default_icon_border_radius(),
            icon_spacing: default_icon_spacing(),
            show_name: default_show_name(),
            name_size: default_name_size(),
            max_content_width: default_max_content_width(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpenMethod {
    CurrentTab,
    #[default]
    NewTab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarSettings {
    #[serde(default = "default_sidebar_visible")]
    pub visible: bool,
    #[serde(default = "default_sidebar_width")]
    pub width: f32,
}

fn default_sidebar_visible() -> bool {
    true
}

fn default_sidebar_width() -> f32 {
    72.0
}

impl Default for SidebarSettings {
    fn default() -> Self {
        Self {
            visible: default_sidebar_visible(),
            width: default_sidebar_width(),
        }
    }
}
