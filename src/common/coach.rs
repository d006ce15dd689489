/// Coaching moments, one per kind of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoachAction {
    CleanUp,
    Organize,
    Optimize,
    Monitor,
    Backup,
}

impl CoachAction {
    pub fn tip(self) -> &'static str {
        match self {
            CoachAction::CleanUp => {
                "Let's improve your stroke efficiency by removing unused packages."
            }
            CoachAction::Organize => {
                "Good file organization is like proper body alignment - essential for peak performance."
            }
            CoachAction::Optimize => {
                "Let's fine-tune your system for better performance, just like optimizing your stroke technique."
            }
            CoachAction::Monitor => {
                "Regular system monitoring is like tracking your split times - crucial for improvement."
            }
            CoachAction::Backup => {
                "Always have a backup plan, just like having multiple race strategies."
            }
        }
    }
}

/// Tip line as printed to the terminal
pub fn coach_says(action: CoachAction) -> String {
    format!("🏊 SwimCoach says: {}", action.tip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_has_a_tip() {
        for action in [
            CoachAction::CleanUp,
            CoachAction::Organize,
            CoachAction::Optimize,
            CoachAction::Monitor,
            CoachAction::Backup,
        ] {
            assert!(!action.tip().is_empty());
            assert!(coach_says(action).starts_with("🏊 SwimCoach says: "));
        }
    }
}
