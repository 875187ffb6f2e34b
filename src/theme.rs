use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Light => Palette {
                primary: "#0077C2",
                primary_light: "#59a5f5",
                secondary: "#00BFFF",
                background: "#FFFFFF",
                paper: "#f5f5f5",
                text: "#333333",
                text_muted: "#5c5c5c",
            },
            Theme::Dark => Palette {
                primary: "#1F3A5F",
                primary_light: "#4d648d",
                secondary: "#cee8ff",
                background: "#0F1C2E",
                paper: "#1f2b3e",
                text: "#FFFFFF",
                text_muted: "#e0e0e0",
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub primary_light: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub paper: &'static str,
    pub text: &'static str,
    pub text_muted: &'static str,
}

impl Palette {
    /// Inline style exposing the palette as CSS variables for the whole tree.
    pub fn style(&self) -> String {
        format!(
            "--color-primary: {}; --color-primary-light: {}; --color-secondary: {}; \
             --color-background: {}; --color-paper: {}; --color-text: {}; --color-text-muted: {}; \
             background-color: {}; color: {};",
            self.primary,
            self.primary_light,
            self.secondary,
            self.background,
            self.paper,
            self.text,
            self.text_muted,
            self.background,
            self.text,
        )
    }
}

pub fn load_theme(store: &impl KeyValueStore) -> Theme {
    store
        .get(THEME_KEY)
        .and_then(|raw| Theme::parse(&raw))
        .unwrap_or_default()
}

pub fn save_theme(store: &impl KeyValueStore, theme: Theme) {
    store.set(THEME_KEY, theme.as_str());
}

/// Flips the theme and persists the new value before returning it.
pub fn toggle_theme(store: &impl KeyValueStore, current: Theme) -> Theme {
    let next = current.toggled();
    save_theme(store, next);
    log::info!("theme switched to {}", next.as_str());
    next
}

/// Mirrors the theme on `<html>` so stylesheet rules can key off `.dark`.
pub fn apply_to_document(theme: Theme) {
    let Some(root) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.document_element())
    else {
        return;
    };
    let classes = root.class_list();
    let _ = match theme {
        Theme::Dark => classes.add_1("dark"),
        Theme::Light => classes.remove_1("dark"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
        let store = MemoryStore::default();
        assert_eq!(load_theme(&store), Theme::Dark);
        store.set(THEME_KEY, "purple");
        assert_eq!(load_theme(&store), Theme::Dark);
    }

    #[test]
    fn toggle_writes_the_new_value() {
        let store = MemoryStore::default();
        let next = toggle_theme(&store, Theme::Dark);
        assert_eq!(next, Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));

        let back = toggle_theme(&store, next);
        assert_eq!(back, Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn stored_value_survives_reload() {
        let store = MemoryStore::default();
        toggle_theme(&store, Theme::Dark);
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn palettes_differ() {
        let light = Theme::Light.palette();
        let dark = Theme::Dark.palette();
        assert_ne!(light, dark);
        assert!(dark.style().contains("background-color: #0F1C2E"));
    }
}
