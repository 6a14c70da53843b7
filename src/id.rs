//! Code for handling the names of schedule objects.
//!
//! Every IDF schedule object is identified by name and referenced by name from other objects.
//! IDs are cheap to clone and borrowable as `&str` for registry lookups.

macro_rules! define_id_type {
    ($name:ident) => {
        #[derive(
            Clone, std::hash::Hash, PartialEq, Eq, serde::Deserialize, Debug, serde::Serialize,
        )]
        /// An ID type (e.g. `DayScheduleID`, `ScheduleID`, etc.)
        pub struct $name(pub std::rc::Rc<str>);

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(std::rc::Rc::from(s))
            }
        }

        impl $name {
            /// Create a new ID from a string slice
            pub fn new(id: &str) -> Self {
                $name(std::rc::Rc::from(id))
            }
        }
    };
}
pub(crate) use define_id_type;

#[cfg(test)]
define_id_type!(GenericID);

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Borrow;

    #[test]
    fn test_id_round_trip() {
        let id = GenericID::new("Medium Office Bldg Occ");
        assert_eq!(id.to_string(), "Medium Office Bldg Occ");
        assert_eq!(Borrow::<str>::borrow(&id), "Medium Office Bldg Occ");
        assert_eq!(id, "Medium Office Bldg Occ".into());
    }
}
