//! Transient Image Files
//!
//! Binary container for (time bin × pixel) intensity histograms. All fields
//! are little-endian. Every version ends with a free-form properties blob
//! whose length is whatever remains of the file after the fixed structures.

mod error;
mod legacy;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::borrow::Cow;
use std::fs;
use std::io::{self, Cursor, Read, Write};

// Re-export
pub use error::*;
pub use legacy::*;

/// Magic value of the oldest format with rotated header fields.
pub const MAGIC_V00: [u8; 4] = *b"TI00";

/// Magic value of the legacy format.
pub const MAGIC_V01: [u8; 4] = *b"TI01";

/// Magic value of the current format.
pub const MAGIC_V04: [u8; 4] = *b"TI04";

/// Version written by `TransientImage::write_file`.
pub const CURRENT_FILE_VERSION: u32 = 4;

/// Pixel mode whose pixels form a regular grid on the reflector, described
/// by a `PixelInterpretationBlock`.
pub const PIXEL_MODE_REFLECTOR_GRID: u32 = 10;

/// On-disk size of `PixelInterpretationBlock`: 2 `u32` and 5 `[f32; 3]`.
pub const PIXEL_INTERPRETATION_BLOCK_SIZE: u32 = 2 * 4 + 5 * 12;

/// Returns the file format version (0, 1 or 4) from the magic value.
///
/// * `filename` - The file.
pub fn read_file_version(filename: &str) -> Result<u32, TransientImageError> {
    let mut magic = [0_u8; 4];
    fs::File::open(filename)
        .and_then(|mut f| f.read_exact(&mut magic))
        .map_err(|e| TransientImageError::read(filename, e))?;
    version_from_magic(&magic).map_err(|e| TransientImageError::read(filename, e))
}

/// Maps a magic value to its version number.
///
/// * `magic` - The magic value.
pub fn version_from_magic(magic: &[u8; 4]) -> Result<u32, FormatError> {
    match *magic {
        MAGIC_V00 => Ok(0),
        MAGIC_V01 => Ok(1),
        MAGIC_V04 => Ok(4),
        _ => Err(FormatError::UnknownVersion(magic_to_string(magic))),
    }
}

/// TI04 file header.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransientImageHeader {
    /// Pixel interpretation mode; only `PIXEL_MODE_REFLECTOR_GRID` is supported.
    pub pixel_mode: u32,

    /// Number of pixels.
    pub num_pixels: u32,

    /// Number of time bins per pixel.
    pub num_bins: u32,

    /// Time of the first bin.
    pub t_min: f32,

    /// Width of a time bin.
    pub t_delta: f32,

    /// Size in bytes of the interpretation block following the data.
    pub pixel_interpretation_block_size: u32,
}

impl Default for TransientImageHeader {
    fn default() -> Self {
        Self {
            pixel_mode: PIXEL_MODE_REFLECTOR_GRID,
            num_pixels: 0,
            num_bins: 0,
            t_min: 0.0,
            t_delta: 0.0,
            pixel_interpretation_block_size: PIXEL_INTERPRETATION_BLOCK_SIZE,
        }
    }
}

impl TransientImageHeader {
    /// Size of the header in bytes, including the magic value.
    pub const SIZE: usize = 28;

    /// Number of pixel values described by the header.
    pub fn num_values(&self) -> Option<usize> {
        (self.num_pixels as usize).checked_mul(self.num_bins as usize)
    }

    fn read_from<R: Read>(r: &mut R) -> Result<Self, FormatError> {
        let mut magic = [0_u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC_V04 {
            return Err(FormatError::UnknownVersion(magic_to_string(&magic)));
        }
        Ok(Self {
            pixel_mode: r.read_u32::<LittleEndian>()?,
            num_pixels: r.read_u32::<LittleEndian>()?,
            num_bins: r.read_u32::<LittleEndian>()?,
            t_min: r.read_f32::<LittleEndian>()?,
            t_delta: r.read_f32::<LittleEndian>()?,
            pixel_interpretation_block_size: r.read_u32::<LittleEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC_V04)?;
        w.write_u32::<LittleEndian>(self.pixel_mode)?;
        w.write_u32::<LittleEndian>(self.num_pixels)?;
        w.write_u32::<LittleEndian>(self.num_bins)?;
        w.write_f32::<LittleEndian>(self.t_min)?;
        w.write_f32::<LittleEndian>(self.t_delta)?;
        w.write_u32::<LittleEndian>(self.pixel_interpretation_block_size)
    }
}

/// Describes how pixels map onto the relay surface.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PixelInterpretationBlock {
    /// Horizontal resolution.
    pub u_resolution: u32,

    /// Vertical resolution.
    pub v_resolution: u32,

    /// World position of the top-left pixel corner.
    pub top_left: [f32; 3],

    /// World position of the top-right pixel corner.
    pub top_right: [f32; 3],

    /// World position of the bottom-left pixel corner.
    pub bottom_left: [f32; 3],

    /// World position of the bottom-right pixel corner.
    pub bottom_right: [f32; 3],

    /// World position of the light source.
    pub laser_position: [f32; 3],
}

impl PixelInterpretationBlock {
    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let u_resolution = r.read_u32::<LittleEndian>()?;
        let v_resolution = r.read_u32::<LittleEndian>()?;
        let mut vec3 = || -> io::Result<[f32; 3]> {
            Ok([
                r.read_f32::<LittleEndian>()?,
                r.read_f32::<LittleEndian>()?,
                r.read_f32::<LittleEndian>()?,
            ])
        };
        Ok(Self {
            u_resolution,
            v_resolution,
            top_left: vec3()?,
            top_right: vec3()?,
            bottom_left: vec3()?,
            bottom_right: vec3()?,
            laser_position: vec3()?,
        })
    }

    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.u_resolution)?;
        w.write_u32::<LittleEndian>(self.v_resolution)?;
        for v in [
            &self.top_left,
            &self.top_right,
            &self.bottom_left,
            &self.bottom_right,
            &self.laser_position,
        ] {
            for c in v {
                w.write_f32::<LittleEndian>(*c)?;
            }
        }
        Ok(())
    }
}

/// A transient image in the current (TI04, pixel mode 10) format.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransientImage {
    /// File header.
    pub header: TransientImageHeader,

    /// Pixel data indexed by `t + num_bins * (u + u_resolution * v)`.
    pub data: Vec<f32>,

    /// Pixel layout on the relay surface.
    pub pixel_interpretation: PixelInterpretationBlock,

    /// Trailing free-form properties.
    pub image_properties: Vec<u8>,
}

impl TransientImage {
    /// Returns a zero filled image.
    ///
    /// * `u_resolution` - Horizontal resolution.
    /// * `v_resolution` - Vertical resolution.
    /// * `num_bins`     - Number of time bins.
    /// * `t_min`        - Time of the first bin.
    /// * `t_delta`      - Width of a time bin.
    pub fn new(u_resolution: u32, v_resolution: u32, num_bins: u32, t_min: f32, t_delta: f32) -> Self {
        let num_pixels = u_resolution * v_resolution;
        Self {
            header: TransientImageHeader {
                num_pixels,
                num_bins,
                t_min,
                t_delta,
                ..Default::default()
            },
            data: vec![0.0; num_pixels as usize * num_bins as usize],
            pixel_interpretation: PixelInterpretationBlock {
                u_resolution,
                v_resolution,
                ..Default::default()
            },
            image_properties: vec![],
        }
    }

    /// Returns the properties blob as text.
    pub fn properties(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.image_properties)
    }

    /// Returns the flat index of a bin.
    ///
    /// * `t` - Time bin.
    /// * `u` - Horizontal pixel coordinate.
    /// * `v` - Vertical pixel coordinate.
    #[inline]
    pub fn index(&self, t: usize, u: usize, v: usize) -> usize {
        let num_bins = self.header.num_bins as usize;
        let u_res = self.pixel_interpretation.u_resolution as usize;
        t + num_bins * (u + u_res * v)
    }

    /// Returns the value of a bin.
    ///
    /// * `t` - Time bin.
    /// * `u` - Horizontal pixel coordinate.
    /// * `v` - Vertical pixel coordinate.
    pub fn pixel(&self, t: usize, u: usize, v: usize) -> f32 {
        self.data[self.index(t, u, v)]
    }

    /// Returns a mutable reference to a bin.
    ///
    /// * `t` - Time bin.
    /// * `u` - Horizontal pixel coordinate.
    /// * `v` - Vertical pixel coordinate.
    pub fn pixel_mut(&mut self, t: usize, u: usize, v: usize) -> &mut f32 {
        let i = self.index(t, u, v);
        &mut self.data[i]
    }

    /// Parses any supported version from a byte buffer. Legacy versions are
    /// converted.
    ///
    /// * `bytes` - The complete file content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let magic: [u8; 4] = bytes
            .get(0..4)
            .and_then(|m| m.try_into().ok())
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))?;

        match version_from_magic(&magic)? {
            0 | 1 => LegacyTransientImage::from_bytes(bytes).map(Self::from),
            _ => Self::from_bytes_v04(bytes),
        }
    }

    fn from_bytes_v04(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut cursor = Cursor::new(bytes);
        let header = TransientImageHeader::read_from(&mut cursor)?;

        if header.pixel_mode != PIXEL_MODE_REFLECTOR_GRID {
            return Err(FormatError::UnsupportedPixelMode {
                expected: PIXEL_MODE_REFLECTOR_GRID,
                found: header.pixel_mode,
            });
        }

        let n = header.num_values().ok_or(FormatError::DataLength {
            expected: usize::MAX,
            actual: 0,
        })?;
        let data = read_f32s(&mut cursor, n)?;
        let pixel_interpretation = PixelInterpretationBlock::read_from(&mut cursor)?;
        let image_properties = remaining_bytes(&cursor);

        Ok(Self {
            header,
            data,
            pixel_interpretation,
            image_properties,
        })
    }

    /// Reads a transient image file of any supported version.
    ///
    /// * `filename` - The file.
    pub fn read_file(filename: &str) -> Result<Self, TransientImageError> {
        let bytes = fs::read(filename).map_err(|e| TransientImageError::read(filename, e))?;
        Self::from_bytes(&bytes).map_err(|e| TransientImageError::read(filename, e))
    }

    /// Validates and serializes the image in the TI04 format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        if self.header.pixel_mode != PIXEL_MODE_REFLECTOR_GRID {
            return Err(FormatError::UnsupportedPixelMode {
                expected: PIXEL_MODE_REFLECTOR_GRID,
                found: self.header.pixel_mode,
            });
        }
        if self.header.pixel_interpretation_block_size != PIXEL_INTERPRETATION_BLOCK_SIZE {
            return Err(FormatError::BlockSize {
                expected: PIXEL_INTERPRETATION_BLOCK_SIZE,
                found: self.header.pixel_interpretation_block_size,
            });
        }
        let expected = self.header.num_values().unwrap_or(usize::MAX);
        if self.data.len() != expected {
            return Err(FormatError::DataLength {
                expected,
                actual: self.data.len(),
            });
        }

        let mut out = Vec::with_capacity(
            TransientImageHeader::SIZE
                + 4 * self.data.len()
                + PIXEL_INTERPRETATION_BLOCK_SIZE as usize
                + self.image_properties.len(),
        );
        self.header.write_to(&mut out)?;
        write_f32s(&mut out, &self.data)?;
        self.pixel_interpretation.write_to(&mut out)?;
        out.extend_from_slice(&self.image_properties);
        Ok(out)
    }

    /// Writes the image in the TI04 format.
    ///
    /// * `filename` - The file.
    pub fn write_file(&self, filename: &str) -> Result<(), TransientImageError> {
        let bytes = self
            .to_bytes()
            .map_err(|e| TransientImageError::write(filename, e))?;
        fs::write(filename, bytes).map_err(|e| TransientImageError::write(filename, e))
    }
}

/// Reads `n` floats, failing before allocation if the stream is too short.
fn read_f32s(cursor: &mut Cursor<&[u8]>, n: usize) -> Result<Vec<f32>, FormatError> {
    let available = cursor.get_ref().len().saturating_sub(cursor.position() as usize);
    if n.checked_mul(4).map_or(true, |len| len > available) {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("file truncated: expected {n} pixel values"),
        )
        .into());
    }

    let mut data = vec![0.0; n];
    cursor.read_f32_into::<LittleEndian>(&mut data)?;
    Ok(data)
}

fn write_f32s<W: Write>(w: &mut W, data: &[f32]) -> io::Result<()> {
    for v in data {
        w.write_f32::<LittleEndian>(*v)?;
    }
    Ok(())
}

fn remaining_bytes(cursor: &Cursor<&[u8]>) -> Vec<u8> {
    let pos = cursor.position() as usize;
    cursor.get_ref()[pos..].to_vec()
}

fn magic_to_string(magic: &[u8; 4]) -> String {
    String::from_utf8_lossy(magic).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn temp_file(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("nlos-{}-{name}", std::process::id()))
            .to_string_lossy()
            .into_owned()
    }

    fn synthetic_image() -> TransientImage {
        let mut img = TransientImage::new(3, 3, 4, 1.5, 0.25);
        for (i, v) in img.data.iter_mut().enumerate() {
            *v = i as f32 * 0.5 + 0.125;
        }
        img.pixel_interpretation.top_left = [-1.0, 0.0, 1.0];
        img.pixel_interpretation.top_right = [1.0, 0.0, 1.0];
        img.pixel_interpretation.bottom_left = [-1.0, 0.0, -1.0];
        img.pixel_interpretation.bottom_right = [1.0, 0.0, -1.0];
        img.pixel_interpretation.laser_position = [0.0, 2.0, 0.0];
        img.image_properties = b"Renderer: nlos-pbrt\nSceneName: wall \xe2\x9c\x93\n".to_vec();
        img
    }

    #[test]
    fn block_size_matches_serialized_length() {
        let mut out = vec![];
        PixelInterpretationBlock::default().write_to(&mut out).unwrap();
        assert_eq!(out.len(), PIXEL_INTERPRETATION_BLOCK_SIZE as usize);
        assert_eq!(PIXEL_INTERPRETATION_BLOCK_SIZE, 68);
    }

    #[test]
    fn ti04_file_round_trip() {
        let img = synthetic_image();
        let file = temp_file("round-trip.ti");
        img.write_file(&file).unwrap();

        assert_eq!(read_file_version(&file).unwrap(), 4);
        let back = TransientImage::read_file(&file).unwrap();
        std::fs::remove_file(&file).ok();

        assert_eq!(back.header, img.header);
        assert_eq!(back.pixel_interpretation, img.pixel_interpretation);
        assert_eq!(back.image_properties, img.image_properties);
        assert_eq!(back.data.len(), 36);
        for (a, b) in back.data.iter().zip(img.data.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(back.pixel(3, 2, 1), img.data[3 + 4 * (2 + 3 * 1)]);
    }

    #[test]
    fn empty_properties_round_trip() {
        let mut img = synthetic_image();
        img.image_properties.clear();
        let back = TransientImage::from_bytes(&img.to_bytes().unwrap()).unwrap();
        assert!(back.image_properties.is_empty());
        assert_eq!(back, img);
    }

    fn legacy_bytes(magic: [u8; 4], fields: [u32; 3], data: &[f32], props: &[u8]) -> Vec<u8> {
        let mut out = vec![];
        out.extend_from_slice(&magic);
        for f in fields {
            out.write_u32::<LittleEndian>(f).unwrap();
        }
        out.write_f32::<LittleEndian>(0.5).unwrap();
        out.write_f32::<LittleEndian>(2.5).unwrap();
        for v in data {
            out.write_f32::<LittleEndian>(*v).unwrap();
        }
        out.extend_from_slice(props);
        out
    }

    #[test]
    fn ti00_fields_are_unswapped_like_ti01() {
        // 4 bins, 3 x 2 pixels.
        let (num_bins, u_res, v_res) = (4_u32, 3_u32, 2_u32);
        let data: Vec<f32> = (0..num_bins * u_res * v_res).map(|i| i as f32 * 1.5).collect();

        let ti01 = legacy_bytes(MAGIC_V01, [num_bins, u_res, v_res], &data, b"props");
        // TI00 stored (vRes, numBins, uRes) in the (numBins, uRes, vRes) slots.
        let ti00 = legacy_bytes(MAGIC_V00, [v_res, num_bins, u_res], &data, b"props");

        let old = LegacyTransientImage::from_bytes(&ti00).unwrap();
        let new = LegacyTransientImage::from_bytes(&ti01).unwrap();
        assert_eq!(old.header.num_bins, num_bins);
        assert_eq!(old.header.u_resolution, u_res);
        assert_eq!(old.header.v_resolution, v_res);
        assert_eq!(old.header.magic, MAGIC_V00);
        assert_eq!(old.data, new.data);
        assert_eq!(old.image_properties, new.image_properties);

        let old04 = TransientImage::from_bytes(&ti00).unwrap();
        let new04 = TransientImage::from_bytes(&ti01).unwrap();
        assert_eq!(old04, new04);
    }

    #[test]
    fn legacy_images_convert_to_current_header() {
        let data = vec![1.0_f32; 2 * 3 * 5];
        let ti01 = legacy_bytes(MAGIC_V01, [5, 2, 3], &data, b"");
        let img = TransientImage::from_bytes(&ti01).unwrap();

        assert_eq!(img.header.pixel_mode, PIXEL_MODE_REFLECTOR_GRID);
        assert_eq!(img.header.num_pixels, 6);
        assert_eq!(img.header.num_bins, 5);
        assert!(approx_eq!(f32, img.header.t_min, 0.5));
        assert!(approx_eq!(f32, img.header.t_delta, 0.4));
        assert_eq!(
            img.header.pixel_interpretation_block_size,
            PIXEL_INTERPRETATION_BLOCK_SIZE
        );
        assert_eq!(img.pixel_interpretation.u_resolution, 2);
        assert_eq!(img.pixel_interpretation.v_resolution, 3);
        assert_eq!(img.pixel_interpretation.top_left, [0.0; 3]);

        // Converted images can be written in the current format.
        assert!(img.to_bytes().is_ok());
    }

    #[test]
    fn unknown_magic_is_rejected() {
        let bytes = b"TI02\0\0\0\0".to_vec();
        match TransientImage::from_bytes(&bytes) {
            Err(FormatError::UnknownVersion(m)) => assert_eq!(m, "TI02"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn truncated_file_error_names_file() {
        let img = synthetic_image();
        let mut bytes = img.to_bytes().unwrap();
        bytes.truncate(TransientImageHeader::SIZE + 10);
        let file = temp_file("truncated.ti");
        std::fs::write(&file, &bytes).unwrap();

        let err = TransientImage::read_file(&file).unwrap_err();
        std::fs::remove_file(&file).ok();

        assert!(matches!(err.cause(), FormatError::Io(_)));
        assert!(err.to_string().contains("truncated.ti"));
    }

    #[test]
    fn writing_checks_pixel_mode_and_block_size() {
        let mut img = synthetic_image();
        img.header.pixel_mode = 3;
        assert!(matches!(
            img.to_bytes(),
            Err(FormatError::UnsupportedPixelMode { found: 3, .. })
        ));

        let mut img = synthetic_image();
        img.header.pixel_interpretation_block_size = 12;
        assert!(matches!(img.to_bytes(), Err(FormatError::BlockSize { found: 12, .. })));

        let mut img = synthetic_image();
        img.data.pop();
        assert!(matches!(img.to_bytes(), Err(FormatError::DataLength { .. })));
    }

    #[test]
    fn reading_rejects_other_pixel_modes() {
        let mut img = synthetic_image();
        img.header.pixel_mode = 3;
        let mut bytes = vec![];
        img.header.write_to(&mut bytes).unwrap();
        write_f32s(&mut bytes, &img.data).unwrap();
        img.pixel_interpretation.write_to(&mut bytes).unwrap();
        assert!(matches!(
            TransientImage::from_bytes(&bytes),
            Err(FormatError::UnsupportedPixelMode { found: 3, .. })
        ));
    }
}
