//! Sample pet sent by the lifecycle scenarios.

use crate::model::{Category, Pet, PetStatus, Tag};

pub const SAMPLE_PET_ID: i64 = 123123;
pub const UPDATED_PET_NAME: &str = "UPDATEDName";

pub fn sample_pet() -> Pet {
    Pet {
        id: SAMPLE_PET_ID,
        category: Category {
            id: 1111,
            name: "thisIsCategory".to_string(),
        },
        name: "thisIsPetName".to_string(),
        photo_urls: vec!["helloTest.jpg".to_string()],
        tags: vec![Tag {
            id: 2222,
            name: "thisIsTag".to_string(),
        }],
        status: PetStatus::Available,
    }
}
