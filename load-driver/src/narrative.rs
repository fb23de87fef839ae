//! Local synthetic narrative generation.
//!
//! Load runs must not depend on the generation model, so narratives come
//! from weighted templates instead. The text deliberately reads like a
//! spoken radio report: name, age, place, condition and a triage color.

use rand::seq::SliceRandom;
use rand::Rng;

use report_schema::ExitCode;

const FIRST_NAMES: &[&str] = &[
    "Mario", "Anna", "Luca", "Giulia", "Franco", "Elena", "Paolo", "Sara", "Marco", "Chiara",
];

const LAST_NAMES: &[&str] = &[
    "Rossi", "Bianchi", "Ferrari", "Esposito", "Romano", "Colombo", "Ricci", "Greco", "Conti",
    "Gallo",
];

const LOCATIONS: &[&str] = &[
    "Via Garibaldi 12, Bologna",
    "Piazza Maggiore, Bologna",
    "A14 altezza km 40",
    "Via Roma 3, Modena",
    "Stazione centrale, binario 2",
    "Cantiere di Via Stalingrado",
];

const CONDITIONS_RED: &[&str] = &[
    "arresto cardiaco, paziente incosciente, non respira",
    "politrauma da incidente stradale, emorragia massiva",
    "grave difficolta respiratoria, cianosi diffusa",
];

const CONDITIONS_YELLOW: &[&str] = &[
    "trauma cranico con perdita di coscienza transitoria",
    "dolore toracico persistente, paziente sudato e pallido",
    "frattura esposta alla gamba dopo caduta",
];

const CONDITIONS_GREEN: &[&str] = &[
    "contusione al braccio dopo caduta dalla bicicletta",
    "ferita superficiale alla mano, paziente cosciente",
    "lieve reazione allergica, parametri stabili",
];

const CONDITIONS_WHITE: &[&str] = &[
    "richiesta di assistenza, nessuna lesione apparente",
    "malessere generico, parametri nella norma",
];

/// One generated case: the spoken narrative and the severity the templates
/// encoded into it, kept so runs can report the intended mix.
#[derive(Debug, Clone)]
pub struct GeneratedCase {
    pub narrative: String,
    pub severity: ExitCode,
}

/// Weighted template generator; the red share is configurable, the
/// remainder splits across yellow, green and white.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeGenerator {
    red_percent: u8,
}

impl NarrativeGenerator {
    pub fn new(red_percent: u8) -> Self {
        Self {
            red_percent: red_percent.min(100),
        }
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> GeneratedCase {
        let severity = self.pick_severity(rng);
        let condition = match severity {
            ExitCode::Red => CONDITIONS_RED,
            ExitCode::Yellow => CONDITIONS_YELLOW,
            ExitCode::Green => CONDITIONS_GREEN,
            ExitCode::White => CONDITIONS_WHITE,
        };

        let first_name = pick(rng, FIRST_NAMES);
        let last_name = pick(rng, LAST_NAMES);
        let age: u8 = rng.gen_range(18..90);
        let sex = if rng.gen_bool(0.5) { "maschio" } else { "femmina" };
        let location = pick(rng, LOCATIONS);
        let condition = pick(rng, condition);
        let color = match severity {
            ExitCode::Red => "rosso",
            ExitCode::Yellow => "giallo",
            ExitCode::Green => "verde",
            ExitCode::White => "bianco",
        };

        let narrative = format!(
            "Paziente {} {}, {}, {} anni. Intervento in {}. {}. Codice {}.",
            first_name, last_name, sex, age, location, condition, color
        );

        GeneratedCase {
            narrative,
            severity,
        }
    }

    fn pick_severity<R: Rng>(&self, rng: &mut R) -> ExitCode {
        if rng.gen_range(0u32..100) < u32::from(self.red_percent) {
            return ExitCode::Red;
        }
        match rng.gen_range(0u8..3) {
            0 => ExitCode::Yellow,
            1 => ExitCode::Green,
            _ => ExitCode::White,
        }
    }
}

fn pick<'a, R: Rng>(rng: &mut R, options: &[&'a str]) -> &'a str {
    options.choose(rng).copied().unwrap_or("sconosciuto")
}
