//! Read-only reference collections.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Reference data used only to turn a foreign key into a display label.
pub trait Lookup: Clone + Send + Sync + DeserializeOwned + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    fn label(&self) -> &str;
}

macro_rules! lookup {
    ($name:ident, $collection:literal, $id:ident, $label:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub $id: i64,
            pub $label: String,
        }

        impl Lookup for $name {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> i64 {
                self.$id
            }

            fn label(&self) -> &str {
                &self.$label
            }
        }
    };
}

lookup!(Category, "Category", category_id, category);
lookup!(Difficulty, "Difficulty", difficulty_id, difficulty);
lookup!(Country, "Country", country_id, country);
lookup!(Gender, "Gender", gender_id, gender);
lookup!(UserType, "UserType", user_type_id, user_type);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_decode_wire_names() {
        let category: Category =
            serde_json::from_str(r#"{"categoryId":2,"category":"Postres"}"#).unwrap();
        assert_eq!(category.id(), 2);
        assert_eq!(category.label(), "Postres");

        let user_type: UserType =
            serde_json::from_str(r#"{"userTypeId":5,"userType":"Chef"}"#).unwrap();
        assert_eq!(user_type.id(), 5);
        assert_eq!(UserType::COLLECTION, "UserType");
    }
}
