//! Instruction payloads sent to the generation model.
//!
//! The extraction prompt carries three parts: the extraction policy, a
//! machine-checkable schema description, and the transcript itself. The
//! model is told to answer with a single JSON object; the parser still
//! tolerates fenced or prose-wrapped output (see [`crate::parse`]).

const EXTRACTION_POLICY: &str = r#"You extract structured emergency-medical records from ambulance crew voice reports.
Rules:
1. The transcript comes from speech recognition and may contain mistakes; correct obvious ones from context.
2. Extract only what is stated or clearly implied. Never invent values.
3. When information is missing use null for scalars and false for booleans.
4. Dates are ISO format YYYY-MM-DD. Do not confuse the birth place with the birth date.
5. Age is in whole years at the call date; when not stated, derive it from the birth date and the call date.
6. Set exactly one exit code flag. When the code is not stated, infer it from the severity of the case.
7. Route clinical actions into the matching interventions sub-object; list drugs in interventions.medications.
8. patient.sex is required and must be "M" or "F".
9. Answer with the JSON object only: no markdown fences, no commentary."#;

const SCHEMA_DESCRIPTION: &str = r#"{
  "reporterSource": "string or null",
  "callInfo": {
    "callDate": "YYYY-MM-DD or null",
    "callTime": "string or null",
    "arrivalTime": "string or null",
    "location": "string or null",
    "reportedCondition": "string or null",
    "exitCode": { "white": false, "green": false, "yellow": false, "red": false }
  },
  "authoritiesPresent": ["police", "trafficPolice", "municipalPolice", "fireBrigade", "onCallDoctor", "secondAmbulance"],
  "patient": {
    "firstName": "string or null",
    "lastName": "string or null",
    "sex": "M or F",
    "age": "integer or null",
    "birthDate": "YYYY-MM-DD or null",
    "birthPlace": "string or null",
    "residence": "string or null"
  },
  "deathInfo": { "died": false, "timeOfDeath": "string or null" },
  "vitals": {
    "consciousness": { "alert": false, "respondsToVoice": false, "respondsToPain": false, "unresponsive": false },
    "skin": { "normal": false, "pale": false, "cyanotic": false, "sweaty": false },
    "breathing": { "normal": false, "tachypneic": false, "bradypneic": false, "absent": false },
    "bloodPressure": "string or null",
    "pulse": "integer or null",
    "oxygenSaturation": "integer 0-100 or null"
  },
  "interventions": {
    "breathing": { "suction": false, "oropharyngealAirway": false, "spo2Monitor": false, "oxygen": false, "oxygenLitersPerMin": "number or null", "ventilation": false, "intubation": false },
    "circulation": { "hemostasis": false, "venousAccess": false, "ecgMonitor": false, "nibpMonitor": false },
    "immobilization": { "cervicalCollar": false, "scoopStretcher": false, "spinalBoard": false, "splint": false },
    "other": "string or null",
    "medications": "string or null"
  },
  "notes": "string or null"
}"#;

/// Full instruction payload for one extraction call.
pub fn build_extraction_prompt(transcript: &str) -> String {
    format!(
        "{policy}\n\nTarget schema (authoritiesPresent lists the allowed tags; boolean fields default to false):\n{schema}\n\nTranscript:\n\"\"\"\n{transcript}\n\"\"\"",
        policy = EXTRACTION_POLICY,
        schema = SCHEMA_DESCRIPTION,
        transcript = transcript,
    )
}

/// Instruction payload asking the model for a fictional emergency narrative,
/// used by the synthetic-report surface.
pub fn build_synthetic_narrative_prompt(scenario_hint: &str) -> String {
    format!(
        "Invent a fictional Italian emergency-medical voice report, as an ambulance crew \
member would dictate it: first person, spoken register, 100-180 words, one paragraph. \
Scenario: {scenario_hint}. Include plausible fictional patient details (name, sex, age or \
birth date), the intervention location, the observed vital signs, the actions performed \
and a triage severity. Every detail must be invented. Answer with the narrative text \
only."
    )
}
