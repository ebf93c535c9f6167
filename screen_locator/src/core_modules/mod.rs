pub mod bounding_box;
pub mod color_census;
pub mod color_predicate;
pub mod column_scan;
pub mod inscribed_rect;
pub mod layout;
pub mod match_mask;
pub mod pixel;
pub mod pixel_grid;
pub mod remapper;
