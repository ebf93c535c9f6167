pub mod image_io {
    use crate::core_modules::pixel_grid::pixel_grid::{ChannelLayout, PixelGrid};
    use crate::error::Result;
    use image::ExtendedColorType;
    use log::debug;
    use std::path::Path;

    /// Decodes an image file into a grid. Sources with an alpha channel keep it,
    /// everything else is normalized to 8-bit RGB.
    pub fn load_grid(path: impl AsRef<Path>) -> Result<PixelGrid> {
        let path = path.as_ref();
        let decoded = image::open(path)?;
        let (width, height) = (decoded.width(), decoded.height());

        let grid = if decoded.color().has_alpha() {
            PixelGrid::from_raw(width, height, ChannelLayout::Rgba, decoded.to_rgba8().as_raw())?
        } else {
            PixelGrid::from_raw(width, height, ChannelLayout::Rgb, decoded.to_rgb8().as_raw())?
        };
        debug!("loaded {} ({}x{}, {:?})", path.display(), width, height, grid.layout());
        Ok(grid)
    }

    /// Encodes `grid` in its own channel layout. The format follows the
    /// file extension.
    pub fn save_grid(path: impl AsRef<Path>, grid: &PixelGrid) -> Result<()> {
        let color_type = match grid.layout() {
            ChannelLayout::Rgb => ExtendedColorType::Rgb8,
            ChannelLayout::Rgba => ExtendedColorType::Rgba8,
        };
        image::save_buffer(path.as_ref(), &grid.to_raw(), grid.width(), grid.height(), color_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::image_io::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::pixel_grid::pixel_grid::{ChannelLayout, PixelGrid};
    use crate::error::LocatorError;

    #[test]
    fn rgba_png_round_trip() {
        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let path = dir.path().join("phone.png");

        let mut grid = PixelGrid::filled(12, 8, ChannelLayout::Rgba, Pixel::new(0, 0, 0, 0));
        grid.fill_rect(2, 2, 9, 5, Pixel::new(87, 159, 42, 200));
        save_grid(&path, &grid).expect("Error Saving File.");

        let loaded = load_grid(&path).expect("Error Loading File.");
        assert_eq!(loaded, grid);
    }

    #[test]
    fn rgb_png_stays_rgb() {
        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let path = dir.path().join("flat.png");

        let grid = PixelGrid::filled(5, 5, ChannelLayout::Rgb, Pixel::opaque(155, 188, 15));
        save_grid(&path, &grid).expect("Error Saving File.");

        let loaded = load_grid(&path).expect("Error Loading File.");
        assert_eq!(loaded.layout(), ChannelLayout::Rgb);
        assert_eq!(loaded.get(4, 4), Some(&Pixel::opaque(155, 188, 15)));
    }

    #[test]
    fn missing_file_is_a_hard_failure() {
        let dir = tempfile::tempdir().expect("Error creating temp dir.");
        let err = load_grid(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, LocatorError::Image(_) | LocatorError::Io(_)));
    }
}
