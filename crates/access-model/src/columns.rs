//! Well-known column names and naming conventions.

/// Join key shared by profile and feedback records.
pub const PATIENT_ID: &str = "patient_id";

/// Score column filled by mean imputation.
pub const SATISFACTION_SCORE: &str = "satisfaction_score";

/// Surrogate identifier emitted by document stores.
pub const SURROGATE_ID: &str = "_id";

pub const COUNTRY: &str = "country";
pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
pub const ACCESSIBILITY_TYPE: &str = "accessibility_type";
pub const DEVICE_TYPE: &str = "device_type";
pub const ISSUE_TYPE: &str = "issue_type";

/// Suffix applied to profile-side columns whose names collide.
pub const PROFILE_SUFFIX: &str = "_profile";

/// Suffix applied to feedback-side columns whose names collide.
pub const FEEDBACK_SUFFIX: &str = "_feedback";

/// Default persisted table for the joined dataset.
pub const DEFAULT_MERGED_TABLE: &str = "merged_access_data";

/// Default table used when profile CSVs are staged into SQLite.
pub const DEFAULT_PROFILES_TABLE: &str = "patient_profiles";

/// Default SQLite database file.
pub const DEFAULT_DATABASE: &str = "access_project.db";

pub const DEFAULT_PROFILES_CSV: &str = "patient_profiles_europe.csv";
pub const DEFAULT_FEEDBACK_CSV: &str = "feedback_flattened.csv";

/// Returns the profile-side name for a colliding column.
pub fn profile_column(name: &str) -> String {
    format!("{name}{PROFILE_SUFFIX}")
}

/// Returns the feedback-side name for a colliding column.
pub fn feedback_column(name: &str) -> String {
    format!("{name}{FEEDBACK_SUFFIX}")
}

/// Returns the first candidate present in `names`.
///
/// Used to resolve columns that may or may not have been suffixed by the
/// join, e.g. `country_profile` before `country`.
pub fn resolve_column<'a, S: AsRef<str>>(names: &[S], candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|candidate| names.iter().any(|name| name.as_ref() == *candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_are_applied() {
        assert_eq!(profile_column(COUNTRY), "country_profile");
        assert_eq!(feedback_column(COUNTRY), "country_feedback");
    }

    #[test]
    fn resolve_prefers_earlier_candidates() {
        let names = vec!["patient_id", "country", "country_profile"];
        assert_eq!(
            resolve_column(&names, &["country_profile", COUNTRY]),
            Some("country_profile")
        );
        assert_eq!(resolve_column(&names, &["missing", COUNTRY]), Some(COUNTRY));
        assert_eq!(resolve_column(&names, &["missing"]), None);
    }
}
