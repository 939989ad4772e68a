mod parse_utils_tests;
