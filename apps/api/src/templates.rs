use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE: &str = "1";

/// Experience level a layout is aimed at. `All` layouts match every filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateLevel {
    All,
    Fresher,
    Experienced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateCard {
    pub id: &'static str,
    pub name: &'static str,
    pub level: TemplateLevel,
}

pub const CATALOG: &[TemplateCard] = &[
    TemplateCard {
        id: "1",
        name: "Classic",
        level: TemplateLevel::All,
    },
    TemplateCard {
        id: "2",
        name: "Modern",
        level: TemplateLevel::Fresher,
    },
    TemplateCard {
        id: "3",
        name: "Executive",
        level: TemplateLevel::Experienced,
    },
    TemplateCard {
        id: "4",
        name: "Compact",
        level: TemplateLevel::Fresher,
    },
];

/// Cards shown for a dashboard filter. `None` means the "all" filter.
pub fn filter(level: Option<TemplateLevel>) -> Vec<TemplateCard> {
    CATALOG
        .iter()
        .copied()
        .filter(|card| match level {
            None | Some(TemplateLevel::All) => true,
            Some(selected) => card.level == selected || card.level == TemplateLevel::All,
        })
        .collect()
}

/// Maps a requested template id onto a known layout.
pub fn resolve(id: Option<&str>) -> &'static str {
    let id = id.map(str::trim).unwrap_or_default();
    CATALOG
        .iter()
        .find(|card| card.id == id)
        .map(|card| card.id)
        .unwrap_or(DEFAULT_TEMPLATE)
}
