use crate::records::record::Record;
use serde::Serialize;

/// Entry of the breed picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedSummary {
    pub id: String,
    pub name: String,
}

impl BreedSummary {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.id()?.to_string(),
            name: record.name()?.to_string(),
        })
    }
}

/// Card shown for a breed, either in the list or as the single breed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreedCard {
    pub name: String,
    pub description: Option<String>,
    pub temperament: Option<String>,
    pub image_url: Option<String>,
}

/// CDN location of TheCatAPI images by id.
pub const IMAGE_CDN: &str = "https://cdn2.thecatapi.com/images";

impl BreedCard {
    /// Builds a list card from a breed record of the `/breeds` listing. When
    /// the record has no embedded `image`, the picture is derived from its
    /// `reference_image_id`.
    pub fn from_breed(record: &Record) -> Self {
        let image_url = record
            .get("image")
            .and_then(|image| image.get("url"))
            .and_then(|url| url.as_str())
            .map(str::to_string)
            .or_else(|| {
                record
                    .text("reference_image_id")
                    .map(|id| format!("{IMAGE_CDN}/{id}.jpg"))
            });

        Self {
            name: record.name().unwrap_or("Unknown breed").to_string(),
            description: record.text("description").map(str::to_string),
            temperament: record.text("temperament").map(str::to_string),
            image_url,
        }
    }

    /// Builds a card from an `/images/search` result, which nests the breed
    /// under `breeds[0]` and carries the picture in `url`.
    pub fn from_image(record: &Record) -> Option<Self> {
        let breed = record
            .get("breeds")
            .and_then(|breeds| breeds.as_array())
            .and_then(|breeds| breeds.first())
            .cloned()
            .and_then(|breed| Record::try_from(breed).ok())?;

        let mut card = Self::from_breed(&breed);
        card.image_url = record.text("url").map(str::to_string);
        Some(card)
    }
}
