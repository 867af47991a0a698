//! Categorical inputs and their indicator encoding.
//!
//! The form submits display labels ("Wilderness Area 2", "Soil Type 17");
//! the trailing whitespace-delimited token carries the 1-based index.
//! Parsing is hardened: a missing or non-numeric token is
//! `InvalidChoiceFormat`, an index outside the group is `IndexOutOfRange`.
//! An *absent* choice is not an error — it encodes as an all-zero group.

use serde::{Deserialize, Serialize};

use crate::error::CoverError;

/// Number of wilderness area indicator columns.
pub const WILDERNESS_AREAS: usize = 4;
/// Number of soil type indicator columns.
pub const SOIL_TYPES: usize = 40;

/// The four wilderness area designations of the study area.
/// Declaration order matches the indicator column order, so
/// "Wilderness Area 1" is Rawah and "Wilderness Area 4" is Cache la Poudre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildernessArea {
    Rawah,
    Neota,
    ComanchePeak,
    CacheLaPoudre,
}

impl WildernessArea {
    pub const ALL: [WildernessArea; WILDERNESS_AREAS] = [
        WildernessArea::Rawah,
        WildernessArea::Neota,
        WildernessArea::ComanchePeak,
        WildernessArea::CacheLaPoudre,
    ];

    /// Zero-based indicator column within the wilderness group.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Display label used by the form.
    pub fn label(self) -> String {
        format!("Wilderness Area {}", self.slot() + 1)
    }

    /// Parse a form label by its trailing 1-based index.
    pub fn from_label(label: &str) -> Result<Self, CoverError> {
        let index = parse_choice_index(label)?;
        index
            .checked_sub(1)
            .and_then(|slot| Self::ALL.get(slot).copied())
            .ok_or(CoverError::IndexOutOfRange {
                group: "wilderness area",
                index,
                len: WILDERNESS_AREAS,
            })
    }
}

/// One of the 40 soil type designations, numbered 1..=40 as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoilType(u8);

impl SoilType {
    /// Validated constructor over the displayed 1-based numbering.
    pub fn new(number: usize) -> Result<Self, CoverError> {
        if (1..=SOIL_TYPES).contains(&number) {
            Ok(SoilType(number as u8))
        } else {
            Err(CoverError::IndexOutOfRange {
                group: "soil type",
                index: number,
                len: SOIL_TYPES,
            })
        }
    }

    /// The displayed 1-based number.
    pub fn number(self) -> usize {
        self.0 as usize
    }

    /// Zero-based indicator column within the soil group.
    pub fn slot(self) -> usize {
        self.0 as usize - 1
    }

    /// Display label used by the form.
    pub fn label(self) -> String {
        format!("Soil Type {}", self.0)
    }

    /// Parse a form label by its trailing 1-based index.
    pub fn from_label(label: &str) -> Result<Self, CoverError> {
        Self::new(parse_choice_index(label)?)
    }
}

/// Trailing-token rule shared by both categorical groups: split on
/// whitespace, take the last token, parse as a 1-based index.
fn parse_choice_index(choice: &str) -> Result<usize, CoverError> {
    choice
        .split_whitespace()
        .last()
        .and_then(|token| token.parse::<usize>().ok())
        .ok_or_else(|| CoverError::InvalidChoiceFormat {
            choice: choice.to_string(),
        })
}

/// Indicator encoding: `len` zeros with a single 1.0 at `slot`.
/// `None` means "no selection" and encodes as all zeros.
pub fn one_hot(slot: Option<usize>, len: usize) -> Vec<f32> {
    let mut group = vec![0.0f32; len];
    if let Some(slot) = slot {
        debug_assert!(slot < len, "slot {slot} outside indicator group of {len}");
        group[slot] = 1.0;
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wilderness_labels_round_trip() {
        for (k, area) in WildernessArea::ALL.iter().enumerate() {
            let label = area.label();
            assert_eq!(label, format!("Wilderness Area {}", k + 1));
            assert_eq!(WildernessArea::from_label(&label).unwrap(), *area);
            assert_eq!(area.slot(), k);
        }
    }

    #[test]
    fn soil_labels_round_trip() {
        for k in 1..=SOIL_TYPES {
            let soil = SoilType::new(k).unwrap();
            assert_eq!(soil.label(), format!("Soil Type {k}"));
            assert_eq!(SoilType::from_label(&soil.label()).unwrap(), soil);
            assert_eq!(soil.slot(), k - 1);
        }
    }

    #[test]
    fn malformed_labels_are_rejected() {
        for bad in ["Wilderness Area", "Soil", "", "Area one", "Soil Type x"] {
            let err = WildernessArea::from_label(bad).unwrap_err();
            assert!(
                matches!(err, CoverError::InvalidChoiceFormat { .. }),
                "{bad:?} should be InvalidChoiceFormat, got {err}"
            );
        }
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        for bad in ["Wilderness Area 0", "Wilderness Area 5"] {
            let err = WildernessArea::from_label(bad).unwrap_err();
            assert!(matches!(err, CoverError::IndexOutOfRange { .. }), "{bad:?}: {err}");
        }
        for bad in ["Soil Type 0", "Soil Type 41", "Soil Type 400"] {
            let err = SoilType::from_label(bad).unwrap_err();
            assert!(matches!(err, CoverError::IndexOutOfRange { .. }), "{bad:?}: {err}");
        }
    }

    #[test]
    fn one_hot_sets_exactly_one_indicator() {
        for k in 0..WILDERNESS_AREAS {
            let group = one_hot(Some(k), WILDERNESS_AREAS);
            assert_eq!(group.len(), WILDERNESS_AREAS);
            for (i, v) in group.iter().enumerate() {
                assert_eq!(*v, if i == k { 1.0 } else { 0.0 }, "slot {k}, column {i}");
            }
        }
    }

    #[test]
    fn one_hot_without_selection_is_all_zero() {
        let group = one_hot(None, SOIL_TYPES);
        assert_eq!(group.len(), SOIL_TYPES);
        assert!(group.iter().all(|&v| v == 0.0));
    }
}
