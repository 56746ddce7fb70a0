use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Travel mode passed to the directions service. Trips are always planned
/// for heavy goods vehicles.
#[derive(Debug, Deserialize, Serialize, Copy, Clone, Hash, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum VehicleProfile {
    #[default]
    DrivingHgv,
}

impl VehicleProfile {
    /// Short label shown next to route summaries.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleProfile::DrivingHgv => "HGV",
        }
    }
}

impl Display for VehicleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                VehicleProfile::DrivingHgv => "driving-hgv",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_path_segment() {
        assert_eq!(VehicleProfile::DrivingHgv.to_string(), "driving-hgv");
        assert_eq!(VehicleProfile::default(), VehicleProfile::DrivingHgv);
    }

    #[test]
    fn test_profile_serde_matches_path_segment() {
        let json = serde_json::to_string(&VehicleProfile::DrivingHgv).unwrap();
        assert_eq!(json, "\"driving-hgv\"");
    }

    #[test]
    fn test_only_hgv_deserializes() {
        let profile: VehicleProfile = serde_json::from_str("\"driving-hgv\"").unwrap();
        assert_eq!(profile, VehicleProfile::DrivingHgv);

        assert!(serde_json::from_str::<VehicleProfile>("\"driving-car\"").is_err());
    }
}
