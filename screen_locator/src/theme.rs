//! Named screen-color variants.
//!
//! Each phone asset paints its screen in a slightly different hand-tuned color.
//! Rather than hard-coding one test per asset, the variants live in a table keyed
//! by theme name, so supporting a new mockup is a data entry (builtin or JSON).

use crate::core_modules::color_predicate::ColorPredicate;
use crate::core_modules::pixel::pixel::Rgb;
use crate::core_modules::remapper::{RemapPlan, RemapRule};
use crate::error::{LocatorError, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Nokia LCD green, the shared screen color the remapper converges on.
pub const NOKIA_GREEN: Rgb = Rgb::new(155, 188, 15);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    /// Any of these marks a screen pixel. The first one is used for detection.
    pub predicates: Vec<ColorPredicate>,
    /// Replacement color when this theme is remapped on its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Rgb>,
}

impl Theme {
    pub fn new(predicate: ColorPredicate) -> Self {
        Self {
            predicates: vec![predicate],
            target: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTable {
    pub default_target: Rgb,
    pub themes: BTreeMap<String, Theme>,
}

impl Default for ThemeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeTable {
    /// The variants found in the shipped phone mockups.
    pub fn builtin() -> Self {
        let themes = [
            ("dark", ColorPredicate::dark_green()),
            ("nokia", ColorPredicate::nokia_lcd()),
            ("light", ColorPredicate::light_cyan()),
            ("black", ColorPredicate::black_gray()),
            ("pink", ColorPredicate::pink_blue()),
        ]
        .into_iter()
        .map(|(name, predicate)| (name.to_string(), Theme::new(predicate)))
        .collect();

        Self {
            default_target: NOKIA_GREEN,
            themes,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: ThemeTable = serde_json::from_str(json)?;
        for (name, theme) in &table.themes {
            if theme.predicates.is_empty() {
                warn!("theme '{}' has no predicates and will never match", name);
            }
        }
        Ok(table)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Result<&Theme> {
        self.themes
            .get(name)
            .ok_or_else(|| LocatorError::UnknownTheme(name.to_string()))
    }

    /// The detection predicate for a theme: its first entry.
    pub fn predicate(&self, name: &str) -> Result<ColorPredicate> {
        self.get(name)?
            .predicates
            .first()
            .copied()
            .ok_or_else(|| LocatorError::UnknownTheme(name.to_string()))
    }

    /// One plan covering every predicate of the named themes, in the order
    /// given. An empty `names` selects the whole table.
    ///
    /// The target is `target_override`, else the theme's own target when exactly
    /// one theme is selected, else the table default.
    pub fn remap_plan(&self, names: &[String], target_override: Option<Rgb>) -> Result<RemapPlan> {
        let selected: Vec<(&str, &Theme)> = if names.is_empty() {
            self.themes.iter().map(|(n, t)| (n.as_str(), t)).collect()
        } else {
            names
                .iter()
                .map(|n| self.get(n).map(|t| (n.as_str(), t)))
                .collect::<Result<_>>()?
        };

        let own_target = match selected.as_slice() {
            [(_, theme)] => theme.target,
            _ => None,
        };
        let target = target_override.or(own_target).unwrap_or(self.default_target);

        let rules = selected
            .iter()
            .flat_map(|(name, theme)| {
                theme.predicates.iter().enumerate().map(move |(i, predicate)| RemapRule {
                    name: if i == 0 {
                        name.to_string()
                    } else {
                        format!("{name}#{i}")
                    },
                    predicate: *predicate,
                })
            })
            .collect();

        Ok(RemapPlan { rules, target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_every_asset() {
        let table = ThemeTable::builtin();
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["black", "dark", "light", "nokia", "pink"]);
        assert_eq!(table.predicate("dark").unwrap(), ColorPredicate::dark_green());
        assert_eq!(table.default_target, Rgb::new(155, 188, 15));
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let table = ThemeTable::builtin();
        assert!(matches!(table.predicate("teal"), Err(LocatorError::UnknownTheme(n)) if n == "teal"));
        assert!(table.remap_plan(&["dark".into(), "teal".into()], None).is_err());
    }

    #[test]
    fn plan_for_all_themes_uses_default_target() {
        let plan = ThemeTable::builtin().remap_plan(&[], None).unwrap();
        assert_eq!(plan.rules.len(), 5);
        assert_eq!(plan.target, NOKIA_GREEN);
    }

    #[test]
    fn plan_target_precedence() {
        let mut table = ThemeTable::builtin();
        let own = Rgb::new(1, 2, 3);
        table.themes.get_mut("pink").unwrap().target = Some(own);

        let single = table.remap_plan(&["pink".into()], None).unwrap();
        assert_eq!(single.target, own);

        let pair = table.remap_plan(&["pink".into(), "light".into()], None).unwrap();
        assert_eq!(pair.target, NOKIA_GREEN);
        assert_eq!(pair.rules[0].name, "pink");
        assert_eq!(pair.rules[1].name, "light");

        let forced = table.remap_plan(&["pink".into()], Some(Rgb::new(9, 9, 9))).unwrap();
        assert_eq!(forced.target, Rgb::new(9, 9, 9));
    }

    #[test]
    fn json_table_adds_a_theme_by_data_only() {
        let json = r##"{
            "default_target": "#9bbc0f",
            "themes": {
                "teal": {
                    "predicates": [
                        {"red": [0, 10], "green": [120, 130], "blue": [120, 130]},
                        {"red": [0, 10], "green": [131, 140], "blue": [131, 140]}
                    ],
                    "target": "#579e2a"
                }
            }
        }"##;
        let table = ThemeTable::from_json_str(json).unwrap();
        let plan = table.remap_plan(&["teal".into()], None).unwrap();
        assert_eq!(plan.target, Rgb::new(0x57, 0x9e, 0x2a));
        assert_eq!(plan.rules.len(), 2);
        assert_eq!(plan.rules[1].name, "teal#1");
    }

    #[test]
    fn builtin_table_survives_json() {
        let table = ThemeTable::builtin();
        let json = table.to_json_string().unwrap();
        assert_eq!(ThemeTable::from_json_str(&json).unwrap(), table);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let bad = r#"{"default_target": "green", "themes": {}}"#;
        assert!(matches!(ThemeTable::from_json_str(bad), Err(LocatorError::Config(_))));
    }
}
