//! Keyword rules used when the model cannot answer. First match wins, in table order.

use super::types::PredictionResponse;

pub const RESPIRATORY: (&str, f64) = ("Possible respiratory infection", 0.75);
pub const TENSION_HEADACHE: (&str, f64) = ("Tension headache", 0.65);
pub const GENERAL: (&str, f64) = ("General consultation needed", 0.7);

pub fn diagnose(symptoms: &str) -> PredictionResponse {
    let s = symptoms.to_lowercase();
    let (diagnosis, confidence) = if s.contains("fever") && s.contains("cough") {
        RESPIRATORY
    } else if s.contains("headache") {
        TENSION_HEADACHE
    } else {
        GENERAL
    };
    PredictionResponse::heuristic(diagnosis, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(symptoms: &str) -> (String, f64) {
        let r = diagnose(symptoms);
        assert!(!r.model_used);
        (r.diagnosis, r.confidence)
    }

    #[test]
    fn fever_and_cough() {
        assert_eq!(pair("I have a fever and cough"), ("Possible respiratory infection".into(), 0.75));
        assert_eq!(pair("COUGH since monday, FEVER today"), ("Possible respiratory infection".into(), 0.75));
    }

    #[test]
    fn respiratory_outranks_headache() {
        assert_eq!(pair("fever, cough and a headache").0, "Possible respiratory infection");
    }

    #[test]
    fn headache() {
        assert_eq!(pair("bad headache"), ("Tension headache".into(), 0.65));
        assert_eq!(pair("fever with headache").0, "Tension headache");
    }

    #[test]
    fn everything_else() {
        assert_eq!(pair("tired"), ("General consultation needed".into(), 0.7));
        assert_eq!(pair("only a fever").0, "General consultation needed");
        assert_eq!(pair("").0, "General consultation needed");
    }
}
