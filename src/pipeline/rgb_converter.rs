use anyhow::{Result, anyhow};
use image::RgbImage;
#[cfg(feature = "camera-nokhwa")]
use nokhwa::{Buffer, utils::FrameFormat};
use rayon::prelude::*;
use yuv::{
    YuvBiPlanarImage, YuvConversionMode, YuvPackedImage, YuvRange, YuvStandardMatrix,
    yuv_nv12_to_rgb, yuyv422_to_rgb,
};
use zune_jpeg::{
    JpegDecoder,
    zune_core::{bytestream::ZCursor, colorspace::ColorSpace, options::DecoderOptions},
};

#[cfg(feature = "camera-nokhwa")]
pub fn convert_camera_frame(frame: &Buffer) -> Result<RgbImage> {
    let resolution = frame.resolution();
    let width = resolution.width_x;
    let height = resolution.height_y;
    let data = frame.buffer();

    match frame.source_frame_format() {
        FrameFormat::NV12 => nv12_to_rgb(data, width, height),
        FrameFormat::YUYV => yuyv_to_rgb(data, width, height),
        FrameFormat::MJPEG => mjpeg_to_rgb(data),
        FrameFormat::RAWRGB => packed_to_rgb(data, width, height, false),
        FrameFormat::RAWBGR => packed_to_rgb(data, width, height, true),
        FrameFormat::GRAY => gray_to_rgb(data, width, height),
    }
}

fn into_image(rgb: Vec<u8>, width: u32, height: u32) -> Result<RgbImage> {
    RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| anyhow!("decoded buffer does not fit {width}x{height}"))
}

fn ensure_len(kind: &str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(anyhow!(
            "{kind} buffer too small: got {}, expected {}",
            data.len(),
            expected
        ));
    }
    Ok(())
}

pub fn nv12_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let y_plane_len = width as usize * height as usize;
    let uv_plane_len = y_plane_len / 2;
    ensure_len("NV12", data, y_plane_len + uv_plane_len)?;

    let image = YuvBiPlanarImage {
        y_plane: &data[..y_plane_len],
        y_stride: width,
        uv_plane: &data[y_plane_len..y_plane_len + uv_plane_len],
        uv_stride: width,
        width,
        height,
    };

    let mut rgb = vec![0u8; y_plane_len * 3];
    yuv_nv12_to_rgb(
        &image,
        &mut rgb,
        width * 3,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
        YuvConversionMode::Balanced,
    )
    .map_err(|err| anyhow!("NV12→RGB failed: {err:?}"))?;

    into_image(rgb, width, height)
}

pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let pixels = width as usize * height as usize;
    ensure_len("YUYV", data, pixels * 2)?;

    let packed = YuvPackedImage {
        yuy: data,
        yuy_stride: width * 2,
        width,
        height,
    };

    let mut rgb = vec![0u8; pixels * 3];
    yuyv422_to_rgb(
        &packed,
        &mut rgb,
        width * 3,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
    )
    .map_err(|err| anyhow!("YUYV422→RGB failed: {err:?}"))?;

    into_image(rgb, width, height)
}

pub fn mjpeg_to_rgb(data: &[u8]) -> Result<RgbImage> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(ZCursor::new(data), options);
    let rgb = decoder
        .decode()
        .map_err(|err| anyhow!("MJPEG decode failed: {err:?}"))?;
    let info = decoder
        .info()
        .ok_or_else(|| anyhow!("MJPEG decoder returned no image info"))?;

    let width = u32::try_from(info.width).map_err(|_| anyhow!("MJPEG width out of range"))?;
    let height = u32::try_from(info.height).map_err(|_| anyhow!("MJPEG height out of range"))?;

    into_image(rgb, width, height)
}

pub fn packed_to_rgb(data: &[u8], width: u32, height: u32, swap_rb: bool) -> Result<RgbImage> {
    let pixels = width as usize * height as usize;
    ensure_len("RGB", data, pixels * 3)?;

    let mut rgb = data[..pixels * 3].to_vec();
    if swap_rb {
        rgb.par_chunks_exact_mut(3).for_each(|px| px.swap(0, 2));
    }

    into_image(rgb, width, height)
}

pub fn gray_to_rgb(data: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    let pixels = width as usize * height as usize;
    ensure_len("GRAY", data, pixels)?;

    let mut rgb = vec![0u8; pixels * 3];
    rgb.par_chunks_exact_mut(3)
        .zip(data.par_iter().copied())
        .for_each(|(dst, value)| dst.fill(value));

    into_image(rgb, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn bgr_is_swapped_to_rgb() {
        let data = [1, 2, 3, 4, 5, 6];
        let img = packed_to_rgb(&data, 2, 1, true).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([3, 2, 1]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([6, 5, 4]));

        let img = packed_to_rgb(&data, 2, 1, false).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([1, 2, 3]));
    }

    #[test]
    fn gray_expands_to_three_channels() {
        let img = gray_to_rgb(&[10, 200], 2, 1).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([10, 10, 10]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([200, 200, 200]));
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert!(packed_to_rgb(&[0; 5], 2, 1, false).is_err());
        assert!(gray_to_rgb(&[0; 3], 2, 2).is_err());
        assert!(yuyv_to_rgb(&[0; 7], 2, 2).is_err());
        assert!(nv12_to_rgb(&[0; 5], 2, 2).is_err());
    }

    #[test]
    fn mid_gray_yuyv_stays_gray() {
        // Y=128, U=V=128 is neutral gray in full range.
        let data = [128u8; 4 * 2 * 2];
        let img = yuyv_to_rgb(&data, 4, 2).unwrap();
        for px in img.pixels() {
            for channel in px.0 {
                assert!((i32::from(channel) - 128).abs() <= 2, "{px:?}");
            }
        }
    }

    #[test]
    fn garbage_mjpeg_is_an_error() {
        assert!(mjpeg_to_rgb(&[0, 1, 2, 3]).is_err());
    }
}
