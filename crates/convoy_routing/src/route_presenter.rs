use std::fmt::Display;

use crate::{
    error::RouteError,
    route::{RouteCandidate, RouteResult},
    vehicle_profile::VehicleProfile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// The first candidate, active by default
    Primary,

    /// A candidate explicitly picked by the user
    Selected,
}

/// Human-facing figures of the active candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSummary {
    pub kind: SelectionKind,
    pub profile: VehicleProfile,

    /// Kilometers rounded to 2 decimals
    pub distance_km: Option<f64>,

    /// Whole minutes
    pub duration_minutes: Option<u64>,

    pub no_alternatives: bool,
}

impl RouteSummary {
    fn new(
        kind: SelectionKind,
        candidate: &RouteCandidate,
        result: &RouteResult,
    ) -> Self {
        Self {
            kind,
            profile: result.profile(),
            distance_km: candidate.distance_meters().map(meters_to_display_km),
            duration_minutes: candidate.duration_seconds().map(seconds_to_display_minutes),
            no_alternatives: result.len() == 1,
        }
    }

    /// Distance formatted for the trip's distance field, e.g. `"123.46"`.
    pub fn distance_field(&self) -> Option<String> {
        self.distance_km.map(|km| format!("{:.2}", km))
    }
}

impl Display for RouteSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = match self.kind {
            SelectionKind::Primary => "Main route",
            SelectionKind::Selected => "Selected route",
        };
        write!(f, "{} ({}) → ", title, self.profile.label())?;

        match self.distance_km {
            Some(km) => write!(f, "{:.2} km", km)?,
            None => write!(f, "distance unknown")?,
        }

        if let Some(minutes) = self.duration_minutes {
            write!(f, " · {} min", minutes)?;
        }

        if self.no_alternatives {
            write!(f, " · No alternatives for this leg ({})", self.profile.label())?;
        }

        Ok(())
    }
}

/// The candidate currently shown as active, with its summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSelection {
    pub index: usize,
    pub candidate_count: usize,
    pub summary: RouteSummary,
}

/// Makes the first candidate active.
pub fn present(result: &RouteResult) -> ActiveSelection {
    let candidate = &result.candidates()[0];

    ActiveSelection {
        index: 0,
        candidate_count: result.len(),
        summary: RouteSummary::new(SelectionKind::Primary, candidate, result),
    }
}

/// Makes the candidate at `index` active. An index past the end is a caller
/// bug and is rejected as is.
pub fn select(result: &RouteResult, index: usize) -> Result<ActiveSelection, RouteError> {
    let candidate = result
        .candidate(index)
        .ok_or(RouteError::SelectionOutOfRange {
            index,
            count: result.len(),
        })?;

    Ok(ActiveSelection {
        index,
        candidate_count: result.len(),
        summary: RouteSummary::new(SelectionKind::Selected, candidate, result),
    })
}

fn meters_to_display_km(meters: f64) -> f64 {
    (meters / 10.0).round() / 100.0
}

fn seconds_to_display_minutes(seconds: f64) -> u64 {
    (seconds / 60.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coordinate::Coordinate, route::RouteStrategy};

    fn candidate(distance: Option<f64>, duration: Option<f64>) -> RouteCandidate {
        RouteCandidate::new(
            vec![
                Coordinate::new(-34.60, -58.38).unwrap(),
                Coordinate::new(-34.92, -57.95).unwrap(),
            ],
            distance,
            duration,
        )
        .unwrap()
    }

    fn result(candidates: Vec<RouteCandidate>, strategy: RouteStrategy) -> RouteResult {
        RouteResult::new(candidates, strategy, VehicleProfile::DrivingHgv).unwrap()
    }

    #[test]
    fn test_present_defaults_to_first_candidate() {
        let result = result(
            vec![
                candidate(Some(61_234.0), Some(3_629.0)),
                candidate(Some(58_000.0), Some(4_100.0)),
            ],
            RouteStrategy::Alternatives,
        );

        let selection = present(&result);

        assert_eq!(selection.index, 0);
        assert_eq!(selection.candidate_count, 2);
        assert_eq!(selection.summary.kind, SelectionKind::Primary);
        assert_eq!(selection.summary.distance_km, Some(61.23));
        assert_eq!(selection.summary.duration_minutes, Some(60));
        assert!(!selection.summary.no_alternatives);
        assert_eq!(
            selection.summary.to_string(),
            "Main route (HGV) → 61.23 km · 60 min"
        );
        assert_eq!(selection.summary.distance_field().as_deref(), Some("61.23"));
    }

    #[test]
    fn test_select_switches_candidate() {
        let result = result(
            vec![
                candidate(Some(61_234.0), Some(3_629.0)),
                candidate(Some(58_005.0), Some(4_110.0)),
            ],
            RouteStrategy::Alternatives,
        );

        let selection = select(&result, 1).unwrap();

        assert_eq!(selection.index, 1);
        assert_eq!(selection.summary.kind, SelectionKind::Selected);
        assert_eq!(selection.summary.distance_km, Some(58.01));
        assert_eq!(selection.summary.duration_minutes, Some(69));
        assert_eq!(
            selection.summary.to_string(),
            "Selected route (HGV) → 58.01 km · 69 min"
        );
    }

    #[test]
    fn test_select_out_of_range_is_rejected() {
        let result = result(
            vec![candidate(Some(1_000.0), Some(60.0))],
            RouteStrategy::Simple,
        );

        assert_eq!(
            select(&result, 1),
            Err(RouteError::SelectionOutOfRange { index: 1, count: 1 })
        );
    }

    #[test]
    fn test_single_candidate_flags_no_alternatives_for_any_strategy() {
        for strategy in [
            RouteStrategy::Alternatives,
            RouteStrategy::Simple,
            RouteStrategy::MultiWaypoint,
        ] {
            let result = result(vec![candidate(Some(1_000.0), Some(60.0))], strategy);

            let selection = present(&result);
            assert!(selection.summary.no_alternatives);
            assert_eq!(
                selection.summary.to_string(),
                "Main route (HGV) → 1.00 km · 1 min · No alternatives for this leg (HGV)"
            );
        }
    }

    #[test]
    fn test_unknown_measurements() {
        let result = result(
            vec![candidate(None, None), candidate(Some(2_000.0), None)],
            RouteStrategy::Alternatives,
        );

        let primary = present(&result);
        assert_eq!(primary.summary.distance_field(), None);
        assert_eq!(primary.summary.to_string(), "Main route (HGV) → distance unknown");

        let selected = select(&result, 1).unwrap();
        assert_eq!(selected.summary.to_string(), "Selected route (HGV) → 2.00 km");
    }
}
