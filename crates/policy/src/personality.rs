use serde::{Deserialize, Serialize};

/// Tunable character of the agent. Every trait lives in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityTraits {
    /// Drives plan rejection and stop-on-error.
    pub cautiousness: f32,
    pub creativity: f32,
    /// Drives how much reasoning is echoed back to the user.
    pub verbosity: f32,
    /// Drives follow-up suggestions after a task.
    pub proactivity: f32,
}

/// Partial update, only the `Some` fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalityUpdate {
    pub cautiousness: Option<f32>,
    pub creativity: Option<f32>,
    pub verbosity: Option<f32>,
    pub proactivity: Option<f32>,
}

impl PersonalityTraits {
    pub fn apply(&mut self, update: PersonalityUpdate) {
        if let Some(v) = update.cautiousness {
            self.cautiousness = clamp_unit(v);
        }
        if let Some(v) = update.creativity {
            self.creativity = clamp_unit(v);
        }
        if let Some(v) = update.verbosity {
            self.verbosity = clamp_unit(v);
        }
        if let Some(v) = update.proactivity {
            self.proactivity = clamp_unit(v);
        }
    }

    /// Clamp every trait into the unit interval. Used after deserializing
    /// hand-edited profiles.
    pub fn normalized(self) -> Self {
        Self {
            cautiousness: clamp_unit(self.cautiousness),
            creativity: clamp_unit(self.creativity),
            verbosity: clamp_unit(self.verbosity),
            proactivity: clamp_unit(self.proactivity),
        }
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            cautiousness: 0.7,
            creativity: 0.8,
            verbosity: 0.6,
            proactivity: 0.9,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update() {
        let mut traits = PersonalityTraits::default();
        traits.apply(PersonalityUpdate {
            cautiousness: Some(0.9),
            ..Default::default()
        });

        assert_eq!(traits.cautiousness, 0.9);
        assert_eq!(traits.verbosity, 0.6);
        assert_eq!(traits.proactivity, 0.9);
    }

    #[test]
    fn test_update_is_clamped() {
        let mut traits = PersonalityTraits::default();
        traits.apply(PersonalityUpdate {
            verbosity: Some(3.0),
            creativity: Some(-1.0),
            ..Default::default()
        });

        assert_eq!(traits.verbosity, 1.0);
        assert_eq!(traits.creativity, 0.0);
    }
}
