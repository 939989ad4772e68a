mod descriptor_tests;
mod loader_tests;
