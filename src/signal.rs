//! Signal strength derivation
//!
//! Maps an accuracy radius (meters) onto a 0-100 signal strength using
//! piecewise-linear bands. Used when a producer reports an accuracy level but
//! no signal strength.

use crate::confidence::round2;
use serde::{Deserialize, Serialize};

/// Signal quality band, keyed on accuracy radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTier {
    /// <= 10 m (90-100)
    Excellent,
    /// <= 50 m (80-89)
    VeryGood,
    /// <= 100 m (70-79)
    Good,
    /// <= 500 m (50-69)
    Fair,
    /// <= 2000 m (20-49)
    Poor,
    /// > 2000 m (1-20)
    VeryPoor,
}

impl SignalTier {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy <= 10.0 {
            SignalTier::Excellent
        } else if accuracy <= 50.0 {
            SignalTier::VeryGood
        } else if accuracy <= 100.0 {
            SignalTier::Good
        } else if accuracy <= 500.0 {
            SignalTier::Fair
        } else if accuracy <= 2000.0 {
            SignalTier::Poor
        } else {
            SignalTier::VeryPoor
        }
    }
}

/// Signal strength (0-100, two decimals) for an accuracy radius
pub fn signal_strength_from_accuracy(accuracy: f64) -> f64 {
    let strength = match SignalTier::from_accuracy(accuracy) {
        SignalTier::Excellent => 90.0 + (10.0 - accuracy).min(10.0),
        SignalTier::VeryGood => 80.0 + ((50.0 - accuracy) / 4.5).min(9.0),
        SignalTier::Good => 70.0 + ((100.0 - accuracy) / 5.6).min(9.0),
        SignalTier::Fair => 50.0 + ((500.0 - accuracy) / 21.1).min(19.0),
        SignalTier::Poor => 20.0 + ((2000.0 - accuracy) / 51.7).min(29.0),
        SignalTier::VeryPoor => (20.0 - (accuracy - 2000.0) / 500.0).max(1.0),
    };
    round2(strength)
}
