use serde::{Deserialize, Serialize};

use crate::error::CoverError;

/// The seven forest cover classes of the study area.
/// Discriminants are the classifier's class codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverType {
    SpruceFir = 1,
    LodgepolePine = 2,
    PonderosaPine = 3,
    CottonwoodWillow = 4,
    Aspen = 5,
    DouglasFir = 6,
    Krummholz = 7,
}

impl CoverType {
    pub const ALL: [CoverType; 7] = [
        CoverType::SpruceFir,
        CoverType::LodgepolePine,
        CoverType::PonderosaPine,
        CoverType::CottonwoodWillow,
        CoverType::Aspen,
        CoverType::DouglasFir,
        CoverType::Krummholz,
    ];

    /// The classifier's class code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Map a classifier class code back to a cover type. Total over
    /// 1..=7; anything else indicates a model/label mismatch.
    pub fn from_code(code: u8) -> Result<Self, CoverError> {
        match code {
            1 => Ok(CoverType::SpruceFir),
            2 => Ok(CoverType::LodgepolePine),
            3 => Ok(CoverType::PonderosaPine),
            4 => Ok(CoverType::CottonwoodWillow),
            5 => Ok(CoverType::Aspen),
            6 => Ok(CoverType::DouglasFir),
            7 => Ok(CoverType::Krummholz),
            other => Err(CoverError::UnknownClassCode(other)),
        }
    }

    /// Human-readable display label.
    pub fn label(self) -> &'static str {
        match self {
            CoverType::SpruceFir => "Spruce/Fir",
            CoverType::LodgepolePine => "Lodgepole Pine",
            CoverType::PonderosaPine => "Ponderosa Pine",
            CoverType::CottonwoodWillow => "Cottonwood/Willow",
            CoverType::Aspen => "Aspen",
            CoverType::DouglasFir => "Douglas-fir",
            CoverType::Krummholz => "Krummholz",
        }
    }
}
