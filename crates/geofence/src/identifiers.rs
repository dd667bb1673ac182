//! Type-safe identifiers for games and waypoints.
//!
//! All identifiers use Arc<str> so waypoints can be cloned into trigger
//! events and results without copying the underlying string.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! define_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        // Lets HashMaps keyed by identifier be queried with a plain &str
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

define_identifier!(
    /// A game, as assigned by the storage layer.
    GameIdentifier
);

define_identifier!(
    /// A waypoint within one game's course.
    WaypointIdentifier
);

impl WaypointIdentifier {
    /// Provisional id for a freshly generated waypoint: `{game}/{sequence}`.
    ///
    /// Storage layers are free to replace it with their own stable id.
    pub fn for_sequence(game_id: &GameIdentifier, sequence_number: u32) -> Self {
        Self::new(format!("{game_id}/{sequence_number}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_identifier_equality() {
        let id1 = WaypointIdentifier::new("wp_123");
        let id2 = WaypointIdentifier::new("wp_123");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
        assert_ne!(id1, WaypointIdentifier::new("wp_124"));
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(GameIdentifier::new("game"), 42);

        assert_eq!(map.get(&GameIdentifier::new("game")), Some(&42));
        assert_eq!(map.get("game"), Some(&42));
    }

    #[test]
    fn test_sequence_identifier() {
        let game = GameIdentifier::new("harbor-hunt");
        let id = WaypointIdentifier::for_sequence(&game, 3);
        assert_eq!(id.to_string(), "harbor-hunt/3");
        assert_eq!(id.as_ref(), "harbor-hunt/3");
    }

    #[test]
    fn test_identifiers_order_lexically() {
        let mut ids = vec![
            WaypointIdentifier::new("g/2"),
            WaypointIdentifier::new("g/0"),
            WaypointIdentifier::new("g/1"),
        ];
        ids.sort();
        assert_eq!(
            ids.iter().map(WaypointIdentifier::as_str).collect::<Vec<_>>(),
            ["g/0", "g/1", "g/2"]
        );
    }
}
