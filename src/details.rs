use serde::{Deserialize, Serialize};

pub(crate) const LOADING_DESCRIPTION: &str = "Loading...";

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AppIcon {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl AppIcon {
    /// Only non-empty jpeg or png payloads are handed to the image decoder.
    pub(crate) fn is_displayable(&self) -> bool {
        !self.data.is_empty() && matches!(self.format.as_str(), "jpeg" | "png")
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppDetails {
    pub description: String,
    pub icon: Option<AppIcon>,
}

impl AppDetails {
    pub(crate) fn displayable_icon(&self) -> Option<&AppIcon> {
        self.icon.as_ref().filter(|icon| icon.is_displayable())
    }
}

/// Detail panel contents for the current selection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum DetailView {
    Loading,
    Loaded(AppDetails),
}

impl DetailView {
    pub(crate) fn description(&self) -> &str {
        match self {
            DetailView::Loading => LOADING_DESCRIPTION,
            DetailView::Loaded(details) => &details.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_needs_known_format_and_data() {
        let png = AppIcon {
            format: "png".to_string(),
            data: vec![0x89, 0x50],
        };
        assert!(png.is_displayable());

        let empty = AppIcon {
            format: "jpeg".to_string(),
            data: Vec::new(),
        };
        assert!(!empty.is_displayable());

        let gif = AppIcon {
            format: "gif".to_string(),
            data: vec![1, 2, 3],
        };
        assert!(!gif.is_displayable());

        let details = AppDetails {
            description: "drives around".to_string(),
            icon: Some(gif),
        };
        assert!(details.displayable_icon().is_none());
    }

    #[test]
    fn loading_view_shows_placeholder() {
        assert_eq!(DetailView::Loading.description(), "Loading...");
    }
}
