/// Tests for the clinical report schema boundary
///
/// Tests cover:
/// - Strict deserialization (unknown fields, required patient sex)
/// - One-of flag-group normalization (exit code, consciousness, skin, breathing)
/// - Oxygen liters/min dependent-value clearing
/// - Age derivation from birth date + call date
/// - Range validation rules
///
/// Note: these tests exercise pure schema logic, no I/O involved.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use report_schema::{normalize, validate, Authority, ClinicalReport, ExitCode};
    use serde_json::json;

fn parse(value: serde_json::Value) -> ClinicalReport {
    serde_json::from_value(value).expect("fixture must deserialize")
}

fn minimal() -> serde_json::Value {
    json!({ "patient": { "sex": "M" } })
}

// =============================================================================
// UNIT TESTS - STRICT DESERIALIZATION
// =============================================================================

#[test]
fn test_minimal_report_parses_with_defaults() {
    let report = parse(minimal());

    assert!(report.reporter_source.is_none());
    assert!(report.authorities_present.is_empty());
    assert_eq!(report.call_info.exit_code.count_set(), 0);
    assert!(!report.death_info.died);
    assert!(report.vitals.pulse.is_none());
    assert!(!report.interventions.breathing.oxygen);
}

#[test]
fn test_unknown_top_level_field_is_rejected() {
    let result = serde_json::from_value::<ClinicalReport>(json!({
        "patient": { "sex": "F" },
        "inventedSection": { "foo": 1 }
    }));
    assert!(result.is_err());
}

#[test]
fn test_unknown_nested_field_is_rejected() {
    let result = serde_json::from_value::<ClinicalReport>(json!({
        "patient": { "sex": "F", "nickname": "Gio" }
    }));
    assert!(result.is_err());
}

#[test]
fn test_missing_patient_sex_is_rejected() {
    let result = serde_json::from_value::<ClinicalReport>(json!({
        "patient": { "firstName": "Mario", "lastName": "Rossi" }
    }));
    assert!(result.is_err());
}

#[test]
fn test_sex_accepts_only_two_codes() {
    let result = serde_json::from_value::<ClinicalReport>(json!({
        "patient": { "sex": "X" }
    }));
    assert!(result.is_err());
}

#[test]
fn test_negative_pulse_is_rejected_by_type() {
    let result = serde_json::from_value::<ClinicalReport>(json!({
        "patient": { "sex": "M" },
        "vitals": { "pulse": -10 }
    }));
    assert!(result.is_err());
}

#[test]
fn test_duplicate_authority_tags_collapse_into_set() {
    let report = parse(json!({
        "patient": { "sex": "M" },
        "authoritiesPresent": ["police", "police", "fireBrigade"]
    }));

    assert_eq!(report.authorities_present.len(), 2);
    assert!(report.authorities_present.contains(&Authority::Police));
    assert!(report.authorities_present.contains(&Authority::FireBrigade));
}

#[test]
fn test_unknown_authority_tag_is_rejected() {
    let result = serde_json::from_value::<ClinicalReport>(json!({
        "patient": { "sex": "M" },
        "authoritiesPresent": ["coastGuard"]
    }));
    assert!(result.is_err());
}

// =============================================================================
// UNIT TESTS - EXIT CODE NORMALIZATION
// =============================================================================

#[test]
fn test_multiple_exit_codes_keep_most_severe() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "callInfo": { "exitCode": { "green": true, "red": true } }
    }));

    let notes = normalize(&mut report);

    assert_eq!(report.call_info.exit_code.count_set(), 1);
    assert!(report.call_info.exit_code.red);
    assert!(!report.call_info.exit_code.green);
    assert!(notes.iter().any(|n| n.contains("exit code")));
}

#[test]
fn test_yellow_beats_green_and_white() {
    let mut report = parse(json!({
        "patient": { "sex": "F" },
        "callInfo": { "exitCode": { "white": true, "green": true, "yellow": true } }
    }));

    normalize(&mut report);

    assert_eq!(report.call_info.exit_code.selected(), Some(ExitCode::Yellow));
}

#[test]
fn test_zero_exit_codes_default_to_white() {
    let mut report = parse(minimal());

    let notes = normalize(&mut report);

    assert_eq!(report.call_info.exit_code.selected(), Some(ExitCode::White));
    assert_eq!(report.call_info.exit_code.count_set(), 1);
    assert!(notes.iter().any(|n| n.contains("white")));
}

#[test]
fn test_single_exit_code_left_untouched() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "callInfo": { "exitCode": { "yellow": true } }
    }));

    let notes = normalize(&mut report);

    assert_eq!(report.call_info.exit_code.selected(), Some(ExitCode::Yellow));
    assert!(notes.is_empty());
}

#[test]
fn test_exit_code_severity_ordering() {
    assert!(ExitCode::Red > ExitCode::Yellow);
    assert!(ExitCode::Yellow > ExitCode::Green);
    assert!(ExitCode::Green > ExitCode::White);
    assert_eq!(ExitCode::Red.as_str(), "red");
}

#[test]
fn test_red_exit_code_marks_report_critical() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "callInfo": { "exitCode": { "red": true } }
    }));
    normalize(&mut report);

    assert!(report.is_critical());
}

// =============================================================================
// UNIT TESTS - VITALS FLAG GROUPS
// =============================================================================

#[test]
fn test_conflicting_consciousness_flags_keep_most_severe() {
    let mut report = parse(json!({
        "patient": { "sex": "F" },
        "vitals": { "consciousness": { "alert": true, "unresponsive": true } }
    }));

    normalize(&mut report);

    assert!(report.vitals.consciousness.unresponsive);
    assert!(!report.vitals.consciousness.alert);
}

#[test]
fn test_conflicting_skin_flags_keep_most_severe() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "vitals": { "skin": { "normal": true, "pale": true, "cyanotic": true } }
    }));

    normalize(&mut report);

    assert!(report.vitals.skin.cyanotic);
    assert!(!report.vitals.skin.pale);
    assert!(!report.vitals.skin.normal);
}

#[test]
fn test_conflicting_breathing_flags_keep_most_severe() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "vitals": { "breathing": { "tachypneic": true, "absent": true } }
    }));

    normalize(&mut report);

    assert!(report.vitals.breathing.absent);
    assert!(!report.vitals.breathing.tachypneic);
}

#[test]
fn test_unreported_vitals_groups_stay_empty() {
    let mut report = parse(minimal());

    normalize(&mut report);

    // Unlike the exit code, observation groups are not required.
    assert!(!report.vitals.consciousness.alert);
    assert!(!report.vitals.skin.normal);
    assert!(!report.vitals.breathing.normal);
}

// =============================================================================
// UNIT TESTS - DEPENDENT VALUES AND AGE
// =============================================================================

#[test]
fn test_oxygen_liters_cleared_when_oxygen_flag_unset() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "interventions": { "breathing": { "oxygenLitersPerMin": 6.0 } }
    }));

    let notes = normalize(&mut report);

    assert!(report.interventions.breathing.oxygen_liters_per_min.is_none());
    assert!(notes.iter().any(|n| n.contains("oxygen")));
}

#[test]
fn test_oxygen_liters_kept_when_oxygen_flag_set() {
    let mut report = parse(json!({
        "patient": { "sex": "M" },
        "interventions": { "breathing": { "oxygen": true, "oxygenLitersPerMin": 6.0 } }
    }));

    normalize(&mut report);

    assert_eq!(
        report.interventions.breathing.oxygen_liters_per_min,
        Some(6.0)
    );
}

#[test]
fn test_age_derived_from_birth_and_call_dates() {
    let mut report = parse(json!({
        "patient": { "sex": "F", "birthDate": "1979-03-20" },
        "callInfo": { "callDate": "2024-06-15" }
    }));

    normalize(&mut report);

    assert_eq!(report.patient.age, Some(45));
}

#[test]
fn test_age_counts_whole_years_at_call_date() {
    let mut report = parse(json!({
        "patient": { "sex": "F", "birthDate": "1979-09-20" },
        "callInfo": { "callDate": "2024-06-15" }
    }));

    normalize(&mut report);

    assert_eq!(report.patient.age, Some(44));
}

#[test]
fn test_extracted_age_is_not_overwritten() {
    let mut report = parse(json!({
        "patient": { "sex": "M", "age": 50, "birthDate": "1979-03-20" },
        "callInfo": { "callDate": "2024-06-15" }
    }));

    normalize(&mut report);

    assert_eq!(report.patient.age, Some(50));
}

#[test]
fn test_age_stays_missing_without_call_date() {
    let mut report = parse(json!({
        "patient": { "sex": "M", "birthDate": "1979-03-20" }
    }));

    normalize(&mut report);

    assert!(report.patient.age.is_none());
}

// =============================================================================
// UNIT TESTS - RANGE VALIDATION
// =============================================================================

#[test]
fn test_saturation_above_100_fails_validation() {
    let report = parse(json!({
        "patient": { "sex": "M" },
        "vitals": { "oxygenSaturation": 110 }
    }));

    assert!(validate(&report).is_err());
}

#[test]
fn test_saturation_at_bounds_passes_validation() {
    let report = parse(json!({
        "patient": { "sex": "M" },
        "vitals": { "oxygenSaturation": 100 }
    }));

    assert!(validate(&report).is_ok());
}

#[test]
fn test_negative_oxygen_liters_fail_validation() {
    let report = parse(json!({
        "patient": { "sex": "M" },
        "interventions": { "breathing": { "oxygen": true, "oxygenLitersPerMin": -2.0 } }
    }));

    assert!(validate(&report).is_err());
}

#[test]
fn test_report_round_trips_through_json() {
    let mut report = parse(json!({
        "reporterSource": "relative",
        "patient": {
            "sex": "M",
            "firstName": "Mario",
            "lastName": "Rossi",
            "birthDate": "1979-03-20"
        },
        "callInfo": {
            "callDate": "2024-06-15",
            "location": "Via Roma 1",
            "exitCode": { "red": true }
        },
        "authoritiesPresent": ["police"],
        "vitals": { "pulse": 118, "oxygenSaturation": 91 }
    }));
    normalize(&mut report);

    let encoded = serde_json::to_value(&report).expect("report must serialize");
    let decoded: ClinicalReport =
        serde_json::from_value(encoded).expect("serialized report must deserialize");

    assert_eq!(decoded, report);
    assert_eq!(
        decoded.patient.birth_date,
        NaiveDate::from_ymd_opt(1979, 3, 20)
    );
}

} // end tests module
