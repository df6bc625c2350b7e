//! Plain-text dump of image metadata and contents.

use std::io::Write;

use crate::error::ImageResult;
use crate::image::Image;

/// Write a human-readable summary of `image` to `out`, followed by every
/// pixel's unscaled and scaled value when `with_contents` is set.
pub fn dump_image<W: Write>(image: &Image, out: &mut W, with_contents: bool) -> ImageResult<()> {
    let data = image.data();

    writeln!(
        out,
        "{} ch.id: {} sp.id: {}",
        image.time(),
        image.channel_id(),
        image.spacecraft_id()
    )?;
    writeln!(out, " proj: {}", image.projection())?;
    writeln!(
        out,
        " size: {}x{} factor: {}x{} offset: {}x{} crop: ({}, {})",
        data.columns(),
        data.lines(),
        image.column_res(),
        image.line_res(),
        image.column_offset(),
        image.line_offset(),
        image.x0(),
        image.y0()
    )?;
    writeln!(
        out,
        " data: {}bpp *{}+{} decscale: {} psize: {:.4} km dx: {} dy: {}",
        data.bpp(),
        data.slope(),
        data.offset(),
        data.decimal_scale(),
        image.pixel_size(),
        image.seviri_dx(),
        image.seviri_dy()
    )?;

    if with_contents {
        writeln!(out, "coord\tunscaled\tscaled")?;
        for line in 0..data.lines() {
            for column in 0..data.columns() {
                writeln!(
                    out,
                    "{}x{}\t{}\t{}",
                    column,
                    line,
                    data.unscaled(column, line)?,
                    data.scaled(column, line)?
                )?;
            }
        }
    }

    Ok(())
}
