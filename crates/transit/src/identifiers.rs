//! Ids of upstream records.
//!
//! Each id is an `Arc<str>` newtype: clones are shared, and maps keyed by an
//! id can be queried with the plain `&str` found in relationship linkage.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(id: impl AsRef<str>) -> Self {
                Self(Arc::from(id.as_ref()))
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

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(Arc::from(id))
            }
        }

        #[cfg(feature = "serialize")]
        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }
    };
}

identifier! {
    /// Route id, e.g. `Red` or `CR-Worcester`
    RouteIdentifier
}

identifier! {
    /// Trip id; one matrix column per trip
    TripIdentifier
}

identifier! {
    /// Stop id: a parent station (`place-alfcl`) or a platform (`70061`)
    StopIdentifier
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use super::*;

    #[test]
    fn test_clones_share_storage() {
        let platform = StopIdentifier::new("70061");
        let copy = platform.clone();

        assert_eq!(platform, copy);
        assert!(Arc::ptr_eq(&platform.0, &copy.0));
        assert_eq!(platform, StopIdentifier::from(String::from("70061")));
    }

    #[test]
    fn test_map_lookup_by_linkage_id() {
        let mut columns = HashMap::new();
        columns.insert(TripIdentifier::new("CR-Weekday-101"), 0usize);
        columns.insert(TripIdentifier::from("CR-Weekday-103"), 1);

        assert_eq!(columns.get("CR-Weekday-103"), Some(&1));
        assert_eq!(columns.get(&TripIdentifier::new("CR-Weekday-101")), Some(&0));
        assert_eq!(columns.get("CR-Weekday-105"), None);
    }

    #[test]
    fn test_ordering_and_display() {
        let routes: BTreeSet<RouteIdentifier> =
            ["Red", "Blue", "Orange"].into_iter().map(RouteIdentifier::from).collect();
        let names: Vec<String> = routes.iter().map(ToString::to_string).collect();

        assert_eq!(names, vec!["Blue", "Orange", "Red"]);
        assert_eq!(RouteIdentifier::new("Red").as_ref(), "Red");
    }
}
