//! Legacy TI00 / TI01 transient images

use super::*;

/// Fixed header of the TI00 and TI01 formats.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegacyHeader {
    /// Magic value as stored in the file.
    pub magic: [u8; 4],

    /// Number of time bins.
    pub num_bins: u32,

    /// Horizontal resolution.
    pub u_resolution: u32,

    /// Vertical resolution.
    pub v_resolution: u32,

    /// Time of the first bin.
    pub t_min: f32,

    /// End of the time range.
    pub t_max: f32,
}

impl LegacyHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 24;

    /// Returns a TI01 header.
    ///
    /// * `num_bins`     - Number of time bins.
    /// * `u_resolution` - Horizontal resolution.
    /// * `v_resolution` - Vertical resolution.
    /// * `t_min`        - Start of the time range.
    /// * `t_max`        - End of the time range.
    pub fn new(num_bins: u32, u_resolution: u32, v_resolution: u32, t_min: f32, t_max: f32) -> Self {
        Self {
            magic: MAGIC_V01,
            num_bins,
            u_resolution,
            v_resolution,
            t_min,
            t_max,
        }
    }

    /// Number of pixel values described by the header.
    pub fn num_values(&self) -> Option<usize> {
        (self.u_resolution as usize)
            .checked_mul(self.v_resolution as usize)?
            .checked_mul(self.num_bins as usize)
    }

    /// Reads the header, undoing the TI00 field order. TI00 files stored the
    /// dimensions rotated (XYT instead of TXY); the rotation is reversed
    /// exactly and is not applied to any other version.
    ///
    /// * `r` - The reader.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, FormatError> {
        let mut magic = [0_u8; 4];
        r.read_exact(&mut magic)?;
        let stored = Self {
            magic,
            num_bins: r.read_u32::<LittleEndian>()?,
            u_resolution: r.read_u32::<LittleEndian>()?,
            v_resolution: r.read_u32::<LittleEndian>()?,
            t_min: r.read_f32::<LittleEndian>()?,
            t_max: r.read_f32::<LittleEndian>()?,
        };

        match magic {
            MAGIC_V00 => Ok(Self {
                num_bins: stored.u_resolution,
                u_resolution: stored.v_resolution,
                v_resolution: stored.num_bins,
                ..stored
            }),
            MAGIC_V01 => Ok(stored),
            _ => Err(FormatError::UnknownVersion(magic_to_string(&magic))),
        }
    }

    /// Writes the header exactly as stored in the struct.
    ///
    /// * `w` - The writer.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), FormatError> {
        w.write_all(&self.magic)?;
        w.write_u32::<LittleEndian>(self.num_bins)?;
        w.write_u32::<LittleEndian>(self.u_resolution)?;
        w.write_u32::<LittleEndian>(self.v_resolution)?;
        w.write_f32::<LittleEndian>(self.t_min)?;
        w.write_f32::<LittleEndian>(self.t_max)?;
        Ok(())
    }
}

/// A TI00 / TI01 transient image. Only used to read old files and to
/// produce fixtures for tools that predate TI04.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacyTransientImage {
    /// Header with dimensions in TXY order.
    pub header: LegacyHeader,

    /// Pixel data indexed by `t + num_bins * (u + u_resolution * v)`.
    pub data: Vec<f32>,

    /// Trailing free-form properties.
    pub image_properties: Vec<u8>,
}

impl LegacyTransientImage {
    /// Reads a legacy image from a byte buffer.
    ///
    /// * `bytes` - The complete file content.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut cursor = Cursor::new(bytes);
        let header = LegacyHeader::read_from(&mut cursor)?;
        let n = header.num_values().ok_or(FormatError::DataLength {
            expected: usize::MAX,
            actual: 0,
        })?;
        let data = read_f32s(&mut cursor, n)?;
        let image_properties = remaining_bytes(&cursor);
        Ok(Self {
            header,
            data,
            image_properties,
        })
    }

    /// Reads a legacy image file.
    ///
    /// * `filename` - The file.
    pub fn read_file(filename: &str) -> Result<Self, TransientImageError> {
        let bytes = fs::read(filename).map_err(|e| TransientImageError::read(filename, e))?;
        Self::from_bytes(&bytes).map_err(|e| TransientImageError::read(filename, e))
    }

    /// Serializes the image with its header as stored.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let expected = self.header.num_values().unwrap_or(usize::MAX);
        if self.data.len() != expected {
            return Err(FormatError::DataLength {
                expected,
                actual: self.data.len(),
            });
        }

        let mut out = Vec::with_capacity(LegacyHeader::SIZE + 4 * self.data.len());
        self.header.write_to(&mut out)?;
        write_f32s(&mut out, &self.data)?;
        out.extend_from_slice(&self.image_properties);
        Ok(out)
    }

    /// Writes the image to a file.
    ///
    /// * `filename` - The file.
    pub fn write_file(&self, filename: &str) -> Result<(), TransientImageError> {
        let bytes = self
            .to_bytes()
            .map_err(|e| TransientImageError::write(filename, e))?;
        fs::write(filename, bytes).map_err(|e| TransientImageError::write(filename, e))
    }
}

impl From<LegacyTransientImage> for TransientImage {
    /// Converts to the current format. Corner positions are unknown for
    /// legacy images and stay zero.
    fn from(img: LegacyTransientImage) -> Self {
        let LegacyTransientImage {
            header: h,
            data,
            image_properties,
        } = img;

        let header = TransientImageHeader {
            pixel_mode: PIXEL_MODE_REFLECTOR_GRID,
            num_pixels: h.u_resolution.wrapping_mul(h.v_resolution),
            num_bins: h.num_bins,
            t_min: h.t_min,
            t_delta: (h.t_max - h.t_min) / h.num_bins as f32,
            pixel_interpretation_block_size: PIXEL_INTERPRETATION_BLOCK_SIZE,
        };

        let pixel_interpretation = PixelInterpretationBlock {
            u_resolution: h.u_resolution,
            v_resolution: h.v_resolution,
            ..Default::default()
        };

        Self {
            header,
            data,
            pixel_interpretation,
            image_properties,
        }
    }
}
