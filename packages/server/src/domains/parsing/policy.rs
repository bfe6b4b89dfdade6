//! Soft rules the classification prompt asks for but the schema accepts.
//!
//! Violations are reported, never rejected: a result with five suggestions is
//! still valid and renderable.

use std::fmt;

use super::models::ActionType;

/// Most follow-up suggestions the prompt allows in one `suggestions` action.
pub const MAX_SUGGESTIONS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    TooManySuggestions { index: usize, count: usize },
    MultipleConfirms { count: usize },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::TooManySuggestions { index, count } => write!(
                f,
                "actions[{}] has {} suggestions (at most {})",
                index, count, MAX_SUGGESTIONS
            ),
            PolicyViolation::MultipleConfirms { count } => {
                write!(f, "{} confirm actions in one message (at most 1)", count)
            }
        }
    }
}

pub fn policy_violations(actions: &[ActionType]) -> Vec<PolicyViolation> {
    let mut violations: Vec<PolicyViolation> = actions
        .iter()
        .enumerate()
        .filter_map(|(index, action)| match action {
            ActionType::Suggestions { items } if items.len() > MAX_SUGGESTIONS => {
                Some(PolicyViolation::TooManySuggestions {
                    index,
                    count: items.len(),
                })
            }
            _ => None,
        })
        .collect();

    let confirms = actions
        .iter()
        .filter(|a| matches!(a, ActionType::Confirm { .. }))
        .count();
    if confirms > 1 {
        violations.push(PolicyViolation::MultipleConfirms { count: confirms });
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestions(n: usize) -> ActionType {
        ActionType::Suggestions {
            items: (0..n).map(|i| format!("idea {}", i)).collect(),
        }
    }

    fn confirm() -> ActionType {
        ActionType::Confirm {
            title: "t".into(),
            description: "d".into(),
            confirm_label: "Yes".into(),
            cancel_label: "No".into(),
        }
    }

    #[test]
    fn four_suggestions_is_fine() {
        assert!(policy_violations(&[suggestions(4)]).is_empty());
    }

    #[test]
    fn five_suggestions_is_flagged() {
        assert_eq!(
            policy_violations(&[confirm(), suggestions(5)]),
            vec![PolicyViolation::TooManySuggestions { index: 1, count: 5 }]
        );
    }

    #[test]
    fn second_confirm_is_flagged() {
        assert_eq!(
            policy_violations(&[confirm(), confirm()]),
            vec![PolicyViolation::MultipleConfirms { count: 2 }]
        );
    }
}
