//! Trip request model

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Result, TripAiError};

/// Default upper bound on trip length, matching the form slider
pub const DEFAULT_MAX_DAYS: u32 = 14;

/// User-submitted trip parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city or region
    pub destination: String,
    /// Total budget in the user's currency
    pub budget: f64,
    /// Trip length in days
    pub duration_days: u32,
    /// Interests, kept sorted so prompts are stable
    #[serde(default)]
    pub interests: BTreeSet<String>,
}

impl TripRequest {
    /// Build and validate a trip request against the default day limit
    pub fn new<I, S>(
        destination: &str,
        budget: f64,
        duration_days: u32,
        interests: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_limit(destination, budget, duration_days, interests, DEFAULT_MAX_DAYS)
    }

    /// Build and validate a trip request against a configured day limit
    pub fn with_limit<I, S>(
        destination: &str,
        budget: f64,
        duration_days: u32,
        interests: I,
        max_days: u32,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = Self {
            destination: destination.trim().to_string(),
            budget,
            duration_days,
            interests: interests
                .into_iter()
                .map(|interest| interest.as_ref().trim().to_string())
                .filter(|interest| !interest.is_empty())
                .collect(),
        };
        request.validate(max_days)?;
        Ok(request)
    }

    /// Check every field; called before any network traffic
    pub fn validate(&self, max_days: u32) -> Result<()> {
        if self.destination.trim().is_empty() {
            return Err(TripAiError::validation("Destination cannot be empty"));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(TripAiError::validation(
                "Budget must be a positive amount",
            ));
        }
        if self.duration_days == 0 || self.duration_days > max_days {
            return Err(TripAiError::validation(format!(
                "Trip length must be between 1 and {max_days} days"
            )));
        }
        if self.interests.iter().any(|interest| interest.trim().is_empty()) {
            return Err(TripAiError::validation("Interests cannot be blank"));
        }
        Ok(())
    }

    /// Budget formatted without trailing zeros
    #[must_use]
    pub fn format_budget(&self) -> String {
        if self.budget.fract() == 0.0 {
            format!("{:.0}", self.budget)
        } else {
            format!("{:.2}", self.budget)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_new_trims_and_sorts_interests() {
        let request =
            TripRequest::new("  Paris ", 1000.0, 3, ["Food", " Heritage", "", "Art"]).unwrap();
        assert_eq!(request.destination, "Paris");
        assert_eq!(
            request.interests.iter().cloned().collect::<Vec<_>>(),
            vec!["Art", "Food", "Heritage"]
        );
    }

    #[rstest]
    #[case("", 1000.0, 3, "Destination")]
    #[case("Paris", 0.0, 3, "Budget")]
    #[case("Paris", f64::NAN, 3, "Budget")]
    #[case("Paris", 1000.0, 0, "between 1 and 14")]
    #[case("Paris", 1000.0, 15, "between 1 and 14")]
    fn test_invalid_requests(
        #[case] destination: &str,
        #[case] budget: f64,
        #[case] days: u32,
        #[case] expected: &str,
    ) {
        let err = TripRequest::new(destination, budget, days, Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, TripAiError::Validation { .. }));
        assert!(err.to_string().contains(expected), "{err}");
    }

    #[test]
    fn test_validate_respects_custom_limit() {
        let request = TripRequest::new("Lisbon", 800.0, 10, ["Food"]).unwrap();
        assert!(request.validate(7).is_err());
        assert!(request.validate(10).is_ok());
    }

    #[test]
    fn test_format_budget() {
        let mut request = TripRequest::new("Rome", 1500.0, 2, ["Food"]).unwrap();
        assert_eq!(request.format_budget(), "1500");
        request.budget = 99.5;
        assert_eq!(request.format_budget(), "99.50");
    }
}
