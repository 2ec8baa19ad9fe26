use serde::{Deserialize, Serialize};

/// Root of the location table, matching the `nepal_locations.json` layout
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDataset {
    pub province_list: Vec<Province>,
}

/// Province (pradesh)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Province {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub district_list: Vec<District>,
}

/// District (jilla)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct District {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub municipality_list: Vec<Municipality>,
}

/// Municipality or rural municipality (palika)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Municipality {
    pub id: u32,
    pub name: String,
}
