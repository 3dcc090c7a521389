//! Expected vs. observed access outcomes

use cfaccess_sdk::DebugEntitlementAccessResponse;
use std::fmt;
use std::str::FromStr;

/// One of the three ways an entitlement request can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessOutcome {
    /// Can be requested and is granted without human approval
    AutoApproved,
    /// Can be requested but needs approval
    RequiresApproval,
    /// Cannot be requested
    NoAccess,
}

impl AccessOutcome {
    pub const ALL: [AccessOutcome; 3] = [
        AccessOutcome::AutoApproved,
        AccessOutcome::RequiresApproval,
        AccessOutcome::NoAccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessOutcome::AutoApproved => "auto-approved",
            AccessOutcome::RequiresApproval => "requires-approval",
            AccessOutcome::NoAccess => "no-access",
        }
    }

    /// Derive the outcome from the debug endpoint's two flags
    ///
    /// `auto_approved` only counts when the entitlement can be requested.
    pub fn from_flags(can_request: bool, auto_approved: bool) -> Self {
        match (can_request, auto_approved) {
            (true, true) => AccessOutcome::AutoApproved,
            (true, false) => AccessOutcome::RequiresApproval,
            (false, _) => AccessOutcome::NoAccess,
        }
    }

    /// Compare an expected outcome against what the platform reported
    pub fn check(self, observed: AccessOutcome) -> Result<(), OutcomeMismatch> {
        if self == observed {
            Ok(())
        } else {
            Err(OutcomeMismatch {
                expected: self,
                observed,
            })
        }
    }
}

impl From<&DebugEntitlementAccessResponse> for AccessOutcome {
    fn from(res: &DebugEntitlementAccessResponse) -> Self {
        Self::from_flags(res.can_request, res.auto_approved)
    }
}

impl fmt::Display for AccessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An `expected-result` value that is not one of the known outcomes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value for expected-result: {0:?} - must be one of ['auto-approved', 'requires-approval', 'no-access']")]
pub struct InvalidExpectedResult(pub String);

impl FromStr for AccessOutcome {
    type Err = InvalidExpectedResult;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| InvalidExpectedResult(s.to_string()))
    }
}

/// The platform reported a different outcome than expected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("got {observed}")]
pub struct OutcomeMismatch {
    pub expected: AccessOutcome,
    pub observed: AccessOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(AccessOutcome::from_flags(true, true), AccessOutcome::AutoApproved);
        assert_eq!(
            AccessOutcome::from_flags(true, false),
            AccessOutcome::RequiresApproval
        );
        assert_eq!(AccessOutcome::from_flags(false, false), AccessOutcome::NoAccess);
        // auto_approved without can_request still means no access
        assert_eq!(AccessOutcome::from_flags(false, true), AccessOutcome::NoAccess);
    }

    #[test]
    fn test_check_every_combination() {
        let flags = [(true, true), (true, false), (false, false), (false, true)];

        for expected in AccessOutcome::ALL {
            for (can_request, auto_approved) in flags {
                let observed = AccessOutcome::from_flags(can_request, auto_approved);
                let result = expected.check(observed);

                if expected == observed {
                    assert!(result.is_ok());
                } else {
                    let err = result.unwrap_err();
                    assert_eq!(err.to_string(), format!("got {}", observed));
                }
            }
        }
    }

    #[test]
    fn test_mismatch_messages() {
        let err = AccessOutcome::AutoApproved
            .check(AccessOutcome::from_flags(true, false))
            .unwrap_err();
        assert_eq!(err.to_string(), "got requires-approval");

        let err = AccessOutcome::RequiresApproval
            .check(AccessOutcome::from_flags(false, true))
            .unwrap_err();
        assert_eq!(err.to_string(), "got no-access");

        let err = AccessOutcome::NoAccess
            .check(AccessOutcome::from_flags(true, true))
            .unwrap_err();
        assert_eq!(err.to_string(), "got auto-approved");
    }

    #[test]
    fn test_parse_outcomes() {
        assert_eq!("auto-approved".parse(), Ok(AccessOutcome::AutoApproved));
        assert_eq!("requires-approval".parse(), Ok(AccessOutcome::RequiresApproval));
        assert_eq!("no-access".parse(), Ok(AccessOutcome::NoAccess));
    }

    #[test]
    fn test_parse_invalid_outcome() {
        let err = "Auto-Approved".parse::<AccessOutcome>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for expected-result: \"Auto-Approved\" - must be one of ['auto-approved', 'requires-approval', 'no-access']"
        );
        assert!("".parse::<AccessOutcome>().is_err());
    }

    #[test]
    fn test_from_response() {
        let res = DebugEntitlementAccessResponse {
            can_request: true,
            auto_approved: false,
        };
        assert_eq!(AccessOutcome::from(&res), AccessOutcome::RequiresApproval);
    }
}
