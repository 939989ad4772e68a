mod resolver_tests;
mod footprint_tests;
mod stretch_tests;
mod compositor_tests;
