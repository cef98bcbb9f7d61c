//! Key layout of the persisted key-value data.
//!
//! These strings are shared with existing device data and must stay stable.

use tracker_core::model::{Category, StudentName};

/// Key holding the JSON array of registered student names.
pub const STUDENT_LIST_KEY: &str = "student_list";

/// Key holding one (student, category) partition, e.g. `data_Ana_BTM`.
#[must_use]
pub fn partition_key(student: &StudentName, category: Category) -> String {
    format!("data_{}_{}", student.as_str(), category.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_key_uses_canonical_category_spelling() {
        let student = StudentName::new("John").unwrap();
        assert_eq!(partition_key(&student, Category::Btm), "data_John_BTM");
        assert_eq!(partition_key(&student, Category::English), "data_John_English");
    }
}
