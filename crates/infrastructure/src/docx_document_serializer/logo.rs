use docforge_application::{LogoImage, LogoSizing};

const EMUS_PER_PIXEL: u64 = 9_525;
const EMUS_PER_POINT: u64 = 12_700;

/// Raster format recognized from leading magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// Detects the format, falling back to PNG.
    pub(super) fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Self::Gif
        } else if bytes.starts_with(b"BM") {
            Self::Bmp
        } else {
            Self::Png
        }
    }

    pub(super) fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub(super) fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Logo bytes with their resolved on-page extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct LogoPlacement<'a> {
    pub(super) bytes: &'a [u8],
    pub(super) format: ImageFormat,
    pub(super) width_emu: u64,
    pub(super) height_emu: u64,
}

impl<'a> LogoPlacement<'a> {
    pub(super) fn measure(logo: &'a LogoImage) -> Self {
        let (width_emu, height_emu) = match logo.sizing {
            LogoSizing::FixedBox {
                width_px,
                height_px,
            } => (
                u64::from(width_px) * EMUS_PER_PIXEL,
                u64::from(height_px) * EMUS_PER_PIXEL,
            ),
            LogoSizing::ProportionalHeight { height_pt } => {
                let height_emu = u64::from(height_pt) * EMUS_PER_POINT;
                (proportional_width(&logo.bytes, height_emu), height_emu)
            }
        };

        Self {
            bytes: &logo.bytes,
            format: ImageFormat::detect(&logo.bytes),
            width_emu,
            height_emu,
        }
    }
}

/// Width matching the image's aspect ratio. Unreadable headers yield a square.
fn proportional_width(bytes: &[u8], height_emu: u64) -> u64 {
    match imagesize::blob_size(bytes) {
        Ok(size) if size.width > 0 && size.height > 0 => {
            let width = u64::try_from(size.width).unwrap_or(1);
            let height = u64::try_from(size.height).unwrap_or(1);
            height_emu.saturating_mul(width) / height
        }
        _ => height_emu,
    }
}
