//! Embedded built-in dictionaries.
//!
//! The source-of-truth lives in `metre-aruco/data/*_CODES.json`.

#![allow(clippy::unreadable_literal, non_upper_case_globals)]

use crate::dictionary::Dictionary;

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apriltag_36h11_is_embedded() {
        let dict = builtin_dictionary("DICT_APRILTAG_36h11").expect("dict");
        assert_eq!(dict.marker_size, 6);
        assert_eq!(dict.len(), 587);
        assert_eq!(dict.code(0), Some(0x47b7310b));
        assert!(BUILTIN_DICTIONARY_NAMES.contains(&"DICT_4X4_50"));
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(builtin_dictionary("DICT_7X7_1000").is_none());
    }
}
