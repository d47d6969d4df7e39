use serde::{Deserialize, Serialize};

/// Pre-frontier personal-best record: only the highest-value play and the
/// highest-rate play were kept. Superseded by the full frontier; loaders
/// convert with [`crate::PersonalBests::from_legacy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyBests<V> {
    pub best: (V, f32),
    pub fastest: (V, f32),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PersonalBests;

    #[test]
    fn test_migration_keeps_both_points() {
        let legacy = LegacyBests {
            best: (120, 1.0),
            fastest: (90, 1.3),
        };
        let bests = PersonalBests::from_legacy(&legacy);
        assert_eq!(bests.entries(), &[(90, 1.3), (120, 1.0)]);
    }

    #[test]
    fn test_migration_collapses_dominated_points() {
        // The "fastest" play also had the better value: one entry survives.
        let legacy = LegacyBests {
            best: (100, 1.0),
            fastest: (110, 1.2),
        };
        let bests = PersonalBests::from_legacy(&legacy);
        assert_eq!(bests.entries(), &[(110, 1.2)]);
    }

    #[test]
    fn test_legacy_shape_deserializes() {
        let json = r#"{"best":[120,1.0],"fastest":[90,1.3]}"#;
        let legacy: LegacyBests<i32> = serde_json::from_str(json).unwrap();
        assert_eq!(legacy.best, (120, 1.0));
        assert_eq!(legacy.fastest, (90, 1.3));
    }
}
