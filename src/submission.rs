//! Questionnaire submissions and boundary validation
//!
//! Raw request bodies deserialize into [`SubmissionRequest`], whose fields are
//! all optional so that every problem can be reported at once. A successful
//! [`Submission::try_from`] yields a fully typed record; nothing downstream
//! re-checks it.

use crate::{AssessmentError, RATING_MAX, RATING_MIN};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Number of questions in the questionnaire
pub const QUESTION_COUNT: usize = 18;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

/// Submission body as received on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Answers keyed `q1`..`q18`
    #[serde(default)]
    pub responses: Option<Map<String, Value>>,
}

/// Answers to the 18 questions, each on the 0-4 maturity scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Responses {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub q4: f64,
    pub q5: f64,
    pub q6: f64,
    pub q7: f64,
    pub q8: f64,
    pub q9: f64,
    pub q10: f64,
    pub q11: f64,
    pub q12: f64,
    pub q13: f64,
    pub q14: f64,
    pub q15: f64,
    pub q16: f64,
    pub q17: f64,
    pub q18: f64,
}

impl Responses {
    /// Build from answers in question order (`values[0]` is q1)
    pub fn from_array(values: [f64; QUESTION_COUNT]) -> Self {
        let [q1, q2, q3, q4, q5, q6, q7, q8, q9, q10, q11, q12, q13, q14, q15, q16, q17, q18] =
            values;
        Self {
            q1,
            q2,
            q3,
            q4,
            q5,
            q6,
            q7,
            q8,
            q9,
            q10,
            q11,
            q12,
            q13,
            q14,
            q15,
            q16,
            q17,
            q18,
        }
    }

    /// Every question answered with the same value
    pub fn uniform(value: f64) -> Self {
        Self::from_array([value; QUESTION_COUNT])
    }

    /// Answers in question order (`[0]` is q1)
    pub fn as_array(&self) -> [f64; QUESTION_COUNT] {
        [
            self.q1, self.q2, self.q3, self.q4, self.q5, self.q6, self.q7, self.q8, self.q9,
            self.q10, self.q11, self.q12, self.q13, self.q14, self.q15, self.q16, self.q17,
            self.q18,
        ]
    }

    /// Answer to a 1-indexed question, or None outside 1..=18
    pub fn get(&self, question: usize) -> Option<f64> {
        question
            .checked_sub(1)
            .and_then(|i| self.as_array().get(i).copied())
    }

    /// Validate and collect answers from a `q1`..`q18` keyed map
    fn from_map(map: &Map<String, Value>, problems: &mut Vec<String>) -> Option<Self> {
        let mut values = [0.0; QUESTION_COUNT];
        let mut ok = true;

        for (i, slot) in values.iter_mut().enumerate() {
            let key = format!("q{}", i + 1);
            match map.get(&key) {
                None | Some(Value::Null) => {
                    problems.push(format!("response {} is missing", key));
                    ok = false;
                }
                Some(value) => match value.as_f64() {
                    Some(v) if !v.is_finite() => {
                        problems.push(format!("response {} must be a finite number", key));
                        ok = false;
                    }
                    Some(v) if !(RATING_MIN..=RATING_MAX).contains(&v) => {
                        problems.push(format!(
                            "response {} is {} but must be between {} and {}",
                            key, v, RATING_MIN, RATING_MAX
                        ));
                        ok = false;
                    }
                    Some(v) => *slot = v,
                    None => {
                        problems.push(format!("response {} must be a number, got {}", key, value));
                        ok = false;
                    }
                },
            }
        }

        let extra: Vec<&str> = map
            .keys()
            .map(String::as_str)
            .filter(|k| !is_question_key(k))
            .collect();
        if !extra.is_empty() {
            log::debug!("ignoring unknown response keys: {}", extra.join(", "));
        }

        ok.then(|| Self::from_array(values))
    }
}

fn is_question_key(key: &str) -> bool {
    key.strip_prefix('q')
        .and_then(|n| n.parse::<usize>().ok())
        .is_some_and(|n| (1..=QUESTION_COUNT).contains(&n) && key == format!("q{}", n))
}

/// A validated questionnaire submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub business_name: String,
    pub email: String,
    pub responses: Responses,
}

impl Submission {
    /// Parse and validate a JSON request body
    pub fn from_json(body: &[u8]) -> Result<Self, AssessmentError> {
        let request: SubmissionRequest = serde_json::from_slice(body)?;
        Self::try_from(request)
    }

    /// Parse and validate a JSON string (e.g. a submission file)
    pub fn from_json_str(body: &str) -> Result<Self, AssessmentError> {
        Self::from_json(body.as_bytes())
    }

    /// A filled-in example, used by `posture template`
    pub fn sample() -> Self {
        Self {
            business_name: "Example Corp".to_string(),
            email: "compliance@example.com".to_string(),
            responses: Responses::from_array([
                3.0, 3.0, 4.0, 3.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0, 3.0, 1.0, 2.0, 2.0, 2.0, 3.0,
                2.0, 2.0,
            ]),
        }
    }
}

impl TryFrom<SubmissionRequest> for Submission {
    type Error = AssessmentError;

    fn try_from(request: SubmissionRequest) -> Result<Self, Self::Error> {
        let mut problems = Vec::new();

        let business_name = match request.business_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(name.to_string()),
            _ => {
                problems.push("businessName is required".to_string());
                None
            }
        };

        let email = match request.email.as_deref().map(str::trim) {
            Some(email) if email.is_empty() => {
                problems.push("email is required".to_string());
                None
            }
            Some(email) if !email_pattern().is_match(email) => {
                problems.push(format!("email '{}' is not a valid address", email));
                None
            }
            Some(email) => Some(email.to_string()),
            None => {
                problems.push("email is required".to_string());
                None
            }
        };

        let responses = match request.responses {
            Some(ref map) => Responses::from_map(map, &mut problems),
            None => {
                problems.push("responses are required".to_string());
                None
            }
        };

        match (business_name, email, responses) {
            (Some(business_name), Some(email), Some(responses)) if problems.is_empty() => {
                Ok(Submission {
                    business_name,
                    email,
                    responses,
                })
            }
            _ => Err(AssessmentError::InvalidSubmission { problems }),
        }
    }
}
