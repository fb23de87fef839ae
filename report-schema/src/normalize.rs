use crate::report::ClinicalReport;

/// Collapses every one-of flag group to a single winner, clears values that
/// only make sense alongside a flag that is not set, and derives the age
/// when it can be computed from other fields.
///
/// Pure with respect to the outside world: no clock, no I/O. Returns one
/// human-readable note per adjustment so callers can log what was changed.
/// Applied exactly once, at the extraction boundary, so downstream consumers
/// always see normalized data.
pub fn normalize(report: &mut ClinicalReport) -> Vec<String> {
    let mut notes = Vec::new();

    normalize_exit_code(report, &mut notes);

    if keep_most_severe(report.vitals.consciousness.ranked_mut()) {
        notes.push("multiple consciousness flags set, kept the most severe".to_string());
    }
    if keep_most_severe(report.vitals.skin.ranked_mut()) {
        notes.push("multiple skin flags set, kept the most severe".to_string());
    }
    if keep_most_severe(report.vitals.breathing.ranked_mut()) {
        notes.push("multiple breathing flags set, kept the most severe".to_string());
    }

    let breathing = &mut report.interventions.breathing;
    if !breathing.oxygen && breathing.oxygen_liters_per_min.is_some() {
        breathing.oxygen_liters_per_min = None;
        notes.push("oxygen liters/min cleared because the oxygen flag is not set".to_string());
    }

    derive_age(report, &mut notes);

    notes
}

/// The exit code must end up with exactly one flag set: the most severe one
/// wins a tie, and a record that arrives with none is classified White.
fn normalize_exit_code(report: &mut ClinicalReport, notes: &mut Vec<String>) {
    let flags = &mut report.call_info.exit_code;
    match flags.count_set() {
        0 => {
            flags.white = true;
            notes.push("no exit code flag set, defaulted to white".to_string());
        }
        1 => {}
        n => {
            keep_most_severe(flags.ranked_mut());
            notes.push(format!(
                "{} exit code flags set, kept the most severe",
                n
            ));
        }
    }
}

/// Keeps only the first set flag of a group ordered most severe first.
/// Returns true when any flag was cleared.
fn keep_most_severe(ranked: [&mut bool; 4]) -> bool {
    let mut winner_seen = false;
    let mut changed = false;
    for flag in ranked {
        if *flag {
            if winner_seen {
                *flag = false;
                changed = true;
            } else {
                winner_seen = true;
            }
        }
    }
    changed
}

/// Age in whole years at the call date, when the model left it out but both
/// dates are present.
fn derive_age(report: &mut ClinicalReport, notes: &mut Vec<String>) {
    if report.patient.age.is_some() {
        return;
    }
    let (Some(birth_date), Some(call_date)) =
        (report.patient.birth_date, report.call_info.call_date)
    else {
        return;
    };
    if let Some(years) = call_date.years_since(birth_date) {
        if let Ok(age) = u16::try_from(years) {
            report.patient.age = Some(age);
            notes.push(format!("age {} derived from birth date and call date", age));
        }
    }
}
