mod sector_tests;
mod pixel_rect_tests;
