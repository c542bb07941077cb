#![allow(dead_code)]

use async_trait::async_trait;
use connectors::{error::NetworkError, source::BreedSource};
use model::records::record::Record;
use serde_json::json;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

pub mod utils;

/// In-memory stand-in for TheCatAPI. Breeds can be swapped and failures
/// injected between calls.
#[derive(Default)]
pub struct FakeCatApi {
    breeds: Mutex<Vec<Record>>,
    failure: Mutex<Option<NetworkError>>,
    breed_calls: AtomicUsize,
}

impl FakeCatApi {
    pub fn with_breeds(breeds: Vec<Record>) -> Self {
        Self {
            breeds: Mutex::new(breeds),
            ..Self::default()
        }
    }

    pub fn set_breeds(&self, breeds: Vec<Record>) {
        *self.breeds.lock().unwrap() = breeds;
    }

    pub fn fail_with(&self, err: Option<NetworkError>) {
        *self.failure.lock().unwrap() = err;
    }

    pub fn breed_calls(&self) -> usize {
        self.breed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BreedSource for FakeCatApi {
    async fn fetch_all_breeds(&self) -> Result<Vec<Record>, NetworkError> {
        self.breed_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.breeds.lock().unwrap().clone())
    }

    async fn fetch_breed_image(&self, breed_id: &str) -> Result<Vec<Record>, NetworkError> {
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }

        let breeds = self.breeds.lock().unwrap();
        Ok(breeds
            .iter()
            .filter(|breed| breed.id() == Some(breed_id))
            .map(|breed| {
                Record::new()
                    .with("id", json!(format!("{breed_id}-img")))
                    .with("url", json!(format!("https://cdn2.thecatapi.com/images/{breed_id}.jpg")))
                    .with("breeds", json!([breed.as_map()]))
            })
            .collect())
    }
}

/// A few breeds shaped like the `/breeds` payload.
pub fn sample_breeds() -> Vec<Record> {
    let raw = json!([
        {
            "id": "abys", "name": "Abyssinian", "origin": "Egypt",
            "temperament": "Active, Energetic, Independent, Intelligent, Gentle",
            "description": "The Abyssinian is easy to care for.",
            "adaptability": 5, "affection_level": 5, "child_friendly": 3,
            "energy_level": 5, "intelligence": 5, "grooming": 1,
            "indoor": 0, "hairless": 0, "rare": 0, "hypoallergenic": 0,
            "image": {"id": "0XYvRd7oD", "url": "https://cdn2.thecatapi.com/images/0XYvRd7oD.jpg"}
        },
        {
            "id": "beng", "name": "Bengal", "origin": "United States",
            "temperament": "Alert, Agile, Energetic, Demanding, Intelligent",
            "adaptability": 5, "affection_level": 5, "child_friendly": 4,
            "energy_level": 5, "intelligence": 5, "grooming": 1,
            "indoor": 0, "hairless": 0, "rare": 0, "hypoallergenic": 1
        },
        {
            "id": "bsho", "name": "British Shorthair", "origin": "United Kingdom",
            "adaptability": 5, "affection_level": 4, "child_friendly": 4,
            "energy_level": 2, "intelligence": 3, "grooming": 2,
            "indoor": 0, "hairless": 0, "rare": 0, "hypoallergenic": 0
        },
        {
            "id": "sphy", "name": "Sphynx", "origin": "Canada",
            "adaptability": 5, "affection_level": 5, "child_friendly": 4,
            "energy_level": 3, "intelligence": 5, "grooming": 2,
            "indoor": 0, "hairless": 1, "rare": 0, "hypoallergenic": 1
        },
        {
            "id": "kora", "name": "Korat", "origin": "Thailand",
            "adaptability": 5, "affection_level": 5, "child_friendly": 4,
            "energy_level": 3, "intelligence": 5, "grooming": 1,
            "indoor": 0, "hairless": 0, "rare": 1, "hypoallergenic": 0
        },
        {
            "id": "pers", "name": "Persian", "origin": "Iran (Persia)",
            "adaptability": 5, "affection_level": 5, "child_friendly": 2,
            "energy_level": 1, "intelligence": 3, "grooming": 5,
            "indoor": 0, "hairless": 0, "rare": 0, "hypoallergenic": 0
        },
        {
            "id": "munc", "name": "Munchkin", "origin": "United States",
            "adaptability": 5, "affection_level": 5, "child_friendly": 4,
            "energy_level": 4, "grooming": 2,
            "indoor": 0, "hairless": 0, "rare": 0, "short_legs": 1
        }
    ]);

    serde_json::from_value(raw).unwrap()
}

/// `n` breeds `b0..b{n-1}` whose adaptability cycles through 1..=5.
pub fn numbered_breeds(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            Record::new()
                .with("id", json!(format!("b{i}")))
                .with("name", json!(format!("Breed {i}")))
                .with("adaptability", json!((i % 5) + 1))
        })
        .collect()
}
