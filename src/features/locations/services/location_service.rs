use std::collections::HashSet;

use crate::core::error::{AppError, Result};
use crate::features::locations::models::{District, LocationDataset, Municipality, Province};

const EMBEDDED_DATASET: &str = include_str!("../data/nepal_locations.json");

/// Read-only lookups over the province → district → municipality table
pub struct LocationService {
    dataset: LocationDataset,
}

impl LocationService {
    /// Parse and check a dataset in the `provinceList` JSON layout
    pub fn from_json(raw: &str) -> Result<Self> {
        let dataset: LocationDataset = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("Invalid location dataset: {}", e)))?;
        check_dataset(&dataset)?;
        Ok(Self { dataset })
    }

    /// Dataset compiled into the binary
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_DATASET)
    }

    /// Load the dataset from `path`, falling back to the embedded one when unset
    pub async fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    AppError::Internal(format!("Failed to read location dataset {}: {}", path, e))
                })?;
                let service = Self::from_json(&raw)?;
                tracing::info!("Location dataset loaded from {}", path);
                Ok(service)
            }
            None => Self::embedded(),
        }
    }

    pub fn province_count(&self) -> usize {
        self.dataset.province_list.len()
    }

    // ==================== Province Methods ====================

    /// List all provinces with optional search
    pub fn list_provinces(&self, search: Option<&str>) -> Vec<&Province> {
        filter_by_name(&self.dataset.province_list, search, |p| p.name.as_str())
    }

    pub fn get_province(&self, name: &str) -> Result<&Province> {
        let name = name.trim();
        self.dataset
            .province_list
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| AppError::NotFound(format!("Province '{}' not found", name)))
    }

    // ==================== District Methods ====================

    /// List districts of a province with optional search
    pub fn list_districts(&self, province: &str, search: Option<&str>) -> Result<Vec<&District>> {
        let province = self.get_province(province)?;
        Ok(filter_by_name(&province.district_list, search, |d| d.name.as_str()))
    }

    pub fn get_district(&self, province: &str, district: &str) -> Result<&District> {
        let district = district.trim();
        self.get_province(province)?
            .district_list
            .iter()
            .find(|d| d.name == district)
            .ok_or_else(|| AppError::NotFound(format!("District '{}' not found", district)))
    }

    // ==================== Municipality Methods ====================

    /// List municipalities of a district with optional search
    pub fn list_municipalities(
        &self,
        province: &str,
        district: &str,
        search: Option<&str>,
    ) -> Result<Vec<&Municipality>> {
        let district = self.get_district(province, district)?;
        Ok(filter_by_name(
            &district.municipality_list,
            search,
            |m| m.name.as_str(),
        ))
    }

    /// Check that the three names form a path through the table
    pub fn validate_selection(
        &self,
        province: &str,
        district: &str,
        municipality: &str,
    ) -> Result<()> {
        let province_node = self
            .get_province(province)
            .map_err(|_| AppError::Validation(format!("Unknown province '{}'", province)))?;

        let district_node = province_node
            .district_list
            .iter()
            .find(|d| d.name == district)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "District '{}' is not in {}",
                    district, province_node.name
                ))
            })?;

        if !district_node
            .municipality_list
            .iter()
            .any(|m| m.name == municipality)
        {
            return Err(AppError::Validation(format!(
                "Municipality '{}' is not in {} district",
                municipality, district_node.name
            )));
        }

        Ok(())
    }
}

fn filter_by_name<'a, T>(
    items: &'a [T],
    search: Option<&str>,
    name: impl Fn(&T) -> &str,
) -> Vec<&'a T> {
    match search.map(str::trim) {
        Some(term) if !term.is_empty() => {
            let term = term.to_lowercase();
            items
                .iter()
                .filter(|item| name(item).to_lowercase().contains(&term))
                .collect()
        }
        _ => items.iter().collect(),
    }
}

fn check_unique_ids<T>(level: &str, parent: &str, items: &[T], id: impl Fn(&T) -> u32) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(id(item)) {
            return Err(AppError::Internal(format!(
                "Duplicate {} id {} under {}",
                level,
                id(item),
                parent
            )));
        }
    }
    Ok(())
}

fn check_dataset(dataset: &LocationDataset) -> Result<()> {
    if dataset.province_list.is_empty() {
        return Err(AppError::Internal(
            "Location dataset has no provinces".to_string(),
        ));
    }

    check_unique_ids("province", "dataset", &dataset.province_list, |p| p.id)?;
    for province in &dataset.province_list {
        check_unique_ids("district", &province.name, &province.district_list, |d| {
            d.id
        })?;
        for district in &province.district_list {
            check_unique_ids(
                "municipality",
                &district.name,
                &district.municipality_list,
                |m| m.id,
            )?;
        }
    }
    Ok(())
}
