//! Population-average surface measurements.
//!
//! A single 2D front photo cannot measure circumferences, ear geometry or
//! cheek-guard clearances. The surface schema seeds those entries from a
//! fixed per-gender table; any dynamically computed value for the same key
//! takes precedence over its static default.

use std::collections::BTreeMap;

use crate::gender::Gender;
use crate::measure::keys;

/// Static surface measurements, millimeters, adult male averages.
pub const MALE_SURFACE_MM: [(&str, f64); 11] = [
    (keys::HEAD_CIRCUMFERENCE_A, 570.0),
    (keys::FOREHEAD_TO_BACK_B, 197.0),
    (keys::CROSS_MEASUREMENT_C, 355.0),
    (keys::UNDER_CHIN_D, 330.0),
    (keys::EYEBROW_TO_EARLOBE_E, 96.0),
    (keys::EYE_CORNER_TO_EAR_F, 72.0),
    (keys::EAR_HEIGHT_G, 63.0),
    (keys::EAR_WIDTH_H, 36.0),
    (keys::CHEEK_GUARD_CLEARANCE_L, 110.0),
    (keys::CHEEK_GUARD_HEIGHT_M, 95.0),
    (keys::CHEEK_GUARD_WIDTH_N, 140.0),
];

/// Static surface measurements, millimeters, adult female averages.
pub const FEMALE_SURFACE_MM: [(&str, f64); 11] = [
    (keys::HEAD_CIRCUMFERENCE_A, 550.0),
    (keys::FOREHEAD_TO_BACK_B, 187.0),
    (keys::CROSS_MEASUREMENT_C, 340.0),
    (keys::UNDER_CHIN_D, 315.0),
    (keys::EYEBROW_TO_EARLOBE_E, 92.0),
    (keys::EYE_CORNER_TO_EAR_F, 68.0),
    (keys::EAR_HEIGHT_G, 59.0),
    (keys::EAR_WIDTH_H, 33.0),
    (keys::CHEEK_GUARD_CLEARANCE_L, 105.0),
    (keys::CHEEK_GUARD_HEIGHT_M, 90.0),
    (keys::CHEEK_GUARD_WIDTH_N, 132.0),
];

/// The full static table for one gender.
pub fn surface_defaults(gender: Gender) -> BTreeMap<&'static str, f64> {
    let table = match gender {
        Gender::Male => &MALE_SURFACE_MM,
        Gender::Female => &FEMALE_SURFACE_MM,
    };
    table.iter().copied().collect()
}

/// Static defaults overlaid with dynamically measured entries.
pub fn merge_dynamic(
    gender: Gender,
    dynamic: &BTreeMap<&'static str, f64>,
) -> BTreeMap<&'static str, f64> {
    let mut merged = surface_defaults(gender);
    for (key, value) in dynamic {
        merged.insert(*key, *value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_cover_full_vocabulary() {
        for gender in [Gender::Male, Gender::Female] {
            let table = surface_defaults(gender);
            assert_eq!(table.len(), keys::SURFACE.len());
            for key in keys::SURFACE {
                assert!(table.contains_key(key), "missing {key}");
            }
        }
    }

    #[test]
    fn test_dynamic_values_take_precedence() {
        let mut dynamic = BTreeMap::new();
        dynamic.insert(keys::EYEBROW_TO_EARLOBE_E, 101.5);

        let merged = merge_dynamic(Gender::Male, &dynamic);
        assert_eq!(merged[keys::EYEBROW_TO_EARLOBE_E], 101.5);
        // Untouched keys keep their static defaults
        assert_eq!(merged[keys::HEAD_CIRCUMFERENCE_A], 570.0);
    }

    #[test]
    fn test_gender_selects_table() {
        let male = surface_defaults(Gender::Male);
        let female = surface_defaults(Gender::Female);
        assert!(male[keys::HEAD_CIRCUMFERENCE_A] > female[keys::HEAD_CIRCUMFERENCE_A]);
    }
}
