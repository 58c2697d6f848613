/// Location registry for the Hyderabad air-quality monitoring network.
///
/// Defines the canonical list of sensor sites monitored by this service.
/// This is the single source of truth for device ids — all other modules
/// should reference locations from here rather than hardcoding ids.

use crate::model::{Location, LocationType};

/// All monitored sites, in registry order. Snapshots and summaries
/// preserve this order.
pub static LOCATION_REGISTRY: &[Location] = &[
    Location {
        id: "charsense_001",
        name: "Hyderabad Central",
        lat: 17.385044,
        lng: 78.486671,
        location_type: LocationType::Highway,
    },
    Location {
        id: "charsense_002",
        name: "Banjara Hills",
        lat: 17.402760,
        lng: 78.474578,
        location_type: LocationType::Residential,
    },
    Location {
        id: "charsense_003",
        name: "Industrial Area",
        lat: 17.360589,
        lng: 78.478890,
        location_type: LocationType::Industrial,
    },
    Location {
        id: "charsense_004",
        name: "Jubilee Hills",
        lat: 17.425288,
        lng: 78.450549,
        location_type: LocationType::Residential,
    },
    Location {
        id: "charsense_005",
        name: "KBR Park",
        lat: 17.373819,
        lng: 78.500671,
        location_type: LocationType::Park,
    },
    Location {
        id: "charsense_006",
        name: "Airport Road",
        lat: 17.453285,
        lng: 78.384997,
        location_type: LocationType::Highway,
    },
    Location {
        id: "charsense_007",
        name: "Secunderabad",
        lat: 17.396454,
        lng: 78.520654,
        location_type: LocationType::Residential,
    },
    Location {
        id: "charsense_008",
        name: "Gachibowli",
        lat: 17.342534,
        lng: 78.455213,
        location_type: LocationType::Residential,
    },
];

/// Returns the device ids of all registered locations.
pub fn all_device_ids() -> Vec<&'static str> {
    LOCATION_REGISTRY.iter().map(|l| l.id).collect()
}

/// Looks up a location by device id. Returns `None` if not found.
pub fn find_location(device_id: &str) -> Option<&'static Location> {
    LOCATION_REGISTRY.iter().find(|l| l.id == device_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_eight_sites() {
        assert_eq!(LOCATION_REGISTRY.len(), 8);
        assert_eq!(all_device_ids().len(), LOCATION_REGISTRY.len());
    }

    #[test]
    fn test_no_duplicate_device_ids() {
        let mut seen = std::collections::HashSet::new();
        for location in LOCATION_REGISTRY {
            assert!(
                seen.insert(location.id),
                "duplicate device id '{}' found in LOCATION_REGISTRY",
                location.id
            );
        }
    }

    #[test]
    fn test_coordinates_are_within_hyderabad() {
        for location in LOCATION_REGISTRY {
            assert!(
                (17.0..18.0).contains(&location.lat) && (78.0..79.0).contains(&location.lng),
                "'{}' has coordinates outside the metro area",
                location.name
            );
        }
    }

    #[test]
    fn test_every_location_type_is_represented() {
        for kind in [
            LocationType::Highway,
            LocationType::Residential,
            LocationType::Industrial,
            LocationType::Park,
        ] {
            assert!(
                LOCATION_REGISTRY.iter().any(|l| l.location_type == kind),
                "registry has no '{}' site",
                kind
            );
        }
    }

    #[test]
    fn test_find_location_returns_correct_entry() {
        let location = find_location("charsense_003").expect("Industrial Area should be in registry");
        assert_eq!(location.name, "Industrial Area");
        assert_eq!(location.location_type, LocationType::Industrial);
    }

    #[test]
    fn test_find_location_returns_none_for_unknown_id() {
        assert!(find_location("nonexistent").is_none());
    }
}
