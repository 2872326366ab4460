use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use validator::Validate;

use crate::constants::*;

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum AppleStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

/// Descriptive attributes of a cultivar. Every spreadsheet alias is resolved
/// into these canonical fields once, unrecognized columns land in `metadata`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AppleDetails {
    pub acno: String,
    pub accession: String,
    pub origin_country: String,
    pub origin_province: String,
    pub origin_city: String,
    pub genus: String,
    pub species: String,
    pub pedigree: String,
    pub breeder: String,
    pub collector: String,
    pub description: String,
    pub taste: String,
    pub texture: String,
    pub uses: String,
    pub harvest_season: String,
    pub hardiness: String,
    pub storage: String,
    pub color: String,
    pub metadata: BTreeMap<String, String>,
}

/// Reduce a header to lowercase alphanumerics so `E_Origin Country`,
/// `eOriginCountry` and `e_origin_country` compare equal
fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

impl AppleDetails {
    /// Build details from `(header, value)` pairs in column order.
    /// When several columns map to the same field the first non-empty one wins.
    pub fn from_columns<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut details = Self::default();
        for (header, value) in columns {
            let value = value.trim();
            let slot = match header_key(header).as_str() {
                "acno" | "accessionnumber" => &mut details.acno,
                "accession" => &mut details.accession,
                "eorigincountry" | "origincountry" | "country" => &mut details.origin_country,
                "eoriginprovince" | "originprovince" | "province" | "state" => {
                    &mut details.origin_province
                }
                "eorigincity" | "origincity" | "city" => &mut details.origin_city,
                "egenus" | "genus" => &mut details.genus,
                "especies" | "species" => &mut details.species,
                "epedigree" | "pedigree" => &mut details.pedigree,
                "ebreeder" | "breeder" => &mut details.breeder,
                "ecollector" | "collector" => &mut details.collector,
                "description" => &mut details.description,
                "taste" => &mut details.taste,
                "texture" => &mut details.texture,
                "uses" => &mut details.uses,
                "harvestseason" => &mut details.harvest_season,
                "hardiness" => &mut details.hardiness,
                "storage" => &mut details.storage,
                "color" | "colour" => &mut details.color,
                _ => {
                    if !value.is_empty() {
                        details
                            .metadata
                            .entry(header.to_owned())
                            .or_insert_with(|| value.to_owned());
                    }
                    continue;
                }
            };
            if slot.is_empty() {
                *slot = value.to_owned();
            }
        }
        details.with_defaults()
    }

    /// Fill in the taxonomy every apple shares when it was left blank
    pub fn with_defaults(mut self) -> Self {
        if self.genus.is_empty() {
            self.genus = DEFAULT_GENUS.to_owned();
        }
        if self.species.is_empty() {
            self.species = DEFAULT_SPECIES.to_owned();
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Apple {
    pub id: u32,
    pub cultivar_name: String,
    #[serde(flatten)]
    pub details: AppleDetails,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub status: AppleStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u32>,
    pub created_ts: u64,
    pub updated_ts: u64,
}

/// Fields required to create an apple record
#[derive(Debug, Clone, PartialEq)]
pub struct NewApple {
    pub cultivar_name: String,
    pub details: AppleDetails,
    pub images: Vec<String>,
    pub created_by: Option<u32>,
}

/// Partial update, only the fields present are written
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplePatch {
    #[validate(length(min = 1, max = 200))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cultivar_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AppleDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppleStatus>,
}

impl ApplePatch {
    pub fn is_empty(&self) -> bool {
        self.cultivar_name.is_none()
            && self.details.is_none()
            && self.images.is_none()
            && self.status.is_none()
    }
}
