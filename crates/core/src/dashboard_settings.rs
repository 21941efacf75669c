//! Default values for per-user dashboard settings.
//!
//! Each settings row holds five free-form JSON sections. The shapes below
//! are what a fresh dashboard renders with; stored values are not validated
//! against them and callers may persist any JSON structure.

use serde_json::{json, Value};

/// Default widget visibility and ordering.
pub fn default_widgets() -> Value {
    json!([
        { "id": "stats-overview",   "type": "stats",            "enabled": true,  "order": 0 },
        { "id": "recent-posts",     "type": "recent-posts",     "enabled": true,  "order": 1 },
        { "id": "traffic-sources",  "type": "traffic-sources",  "enabled": true,  "order": 2 },
        { "id": "real-time",        "type": "real-time",        "enabled": true,  "order": 3 },
        { "id": "system-health",    "type": "system-health",    "enabled": true,  "order": 4 },
        { "id": "security-events",  "type": "security-events",  "enabled": false, "order": 5 },
        { "id": "notifications",    "type": "notifications",    "enabled": true,  "order": 6 },
    ])
}

/// Default overall layout options.
pub fn default_layout() -> Value {
    json!({
        "columns": 3,
        "compact": false,
        "sidebar_collapsed": false,
    })
}

/// Default theme-customizer appearance.
pub fn default_appearance() -> Value {
    json!({
        "theme": "system",
        "primary_color": "#3B82F6",
        "font_size": "medium",
        "border_radius": "md",
        "animations": true,
    })
}

/// Default data refresh and range preferences.
pub fn default_data() -> Value {
    json!({
        "refresh_interval_secs": 60,
        "date_range": "7d",
        "timezone": "UTC",
    })
}

/// Default drag-and-drop grid positions on a 12-column grid.
pub fn default_grid_layout() -> Value {
    json!([
        { "i": "stats-overview",  "x": 0, "y": 0, "w": 12, "h": 2 },
        { "i": "recent-posts",    "x": 0, "y": 2, "w": 8,  "h": 4 },
        { "i": "traffic-sources", "x": 8, "y": 2, "w": 4,  "h": 4 },
        { "i": "real-time",       "x": 0, "y": 6, "w": 4,  "h": 3 },
        { "i": "system-health",   "x": 4, "y": 6, "w": 4,  "h": 3 },
        { "i": "notifications",   "x": 8, "y": 6, "w": 4,  "h": 3 },
    ])
}

/// All five sections at their defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsDefaults {
    pub widgets: Value,
    pub layout: Value,
    pub appearance: Value,
    pub data: Value,
    pub grid_layout: Value,
}

impl Default for SettingsDefaults {
    fn default() -> Self {
        Self {
            widgets: default_widgets(),
            layout: default_layout(),
            appearance: default_appearance(),
            data: default_data(),
            grid_layout: default_grid_layout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_entries_reference_known_widgets() {
        let widgets = default_widgets();
        let ids: Vec<&str> = widgets
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["id"].as_str().unwrap())
            .collect();

        for cell in default_grid_layout().as_array().unwrap() {
            let i = cell["i"].as_str().unwrap();
            assert!(ids.contains(&i), "grid cell '{i}' has no widget");
        }
    }

    #[test]
    fn defaults_are_stable() {
        assert_eq!(SettingsDefaults::default(), SettingsDefaults::default());
        assert_eq!(default_appearance()["theme"], "system");
    }
}
