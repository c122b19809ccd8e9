// Single-frame icon/cursor resource decoding

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use image::{ImageFormat, RgbaImage};
use std::io::{Cursor, Write};

use super::error::{CursorError, CursorResult};

const ICO_TYPE_ICON: u16 = 1;
const ICO_TYPE_CUR: u16 = 2;
const ICONDIR_SIZE: usize = 6;
const ICONDIR_ENTRY_SIZE: usize = 16;
const HOTSPOT_OFFSET: usize = 10;
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const DIB_HEADER_MIN: usize = 40;

/// Smallest blob that can hold a directory header and one entry.
pub const MIN_BLOB_SIZE: usize = ICONDIR_SIZE + ICONDIR_ENTRY_SIZE;

#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub image: RgbaImage,
    pub hotspot: (u16, u16),
}

impl DecodedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconDirEntry {
    pub width: u8,
    pub height: u8,
    pub color_count: u8,
    pub reserved: u8,
    pub hotspot_x: u16,
    pub hotspot_y: u16,
    pub size_bytes: u32,
    pub offset: u32,
}

impl IconDirEntry {
    /// A stored dimension of 0 means 256.
    pub fn real_width(&self) -> u32 {
        if self.width == 0 { 256 } else { self.width as u32 }
    }

    pub fn real_height(&self) -> u32 {
        if self.height == 0 { 256 } else { self.height as u32 }
    }

    pub fn area(&self) -> u32 {
        self.real_width() * self.real_height()
    }
}

pub struct CurParser;

impl CurParser {
    pub fn can_parse(data: &[u8]) -> bool {
        data.len() >= 4
            && data[0..2] == [0, 0]
            && matches!(
                LittleEndian::read_u16(&data[2..4]),
                ICO_TYPE_ICON | ICO_TYPE_CUR
            )
    }

    /// Hotspot of the first directory entry, `(0, 0)` when the blob is too short.
    pub fn read_hotspot(data: &[u8]) -> (u16, u16) {
        match data.get(HOTSPOT_OFFSET..HOTSPOT_OFFSET + 4) {
            Some(bytes) => (
                LittleEndian::read_u16(&bytes[0..2]),
                LittleEndian::read_u16(&bytes[2..4]),
            ),
            None => (0, 0),
        }
    }

    pub fn read_directory(data: &[u8]) -> CursorResult<Vec<IconDirEntry>> {
        if data.len() < MIN_BLOB_SIZE {
            return Err(CursorError::invalid_frame(format!(
                "blob is {} bytes, icon header needs at least {}",
                data.len(),
                MIN_BLOB_SIZE
            )));
        }

        let mut cursor = Cursor::new(data);
        let reserved = cursor.read_u16::<LittleEndian>()?;
        let ico_type = cursor.read_u16::<LittleEndian>()?;
        let image_count = cursor.read_u16::<LittleEndian>()?;

        if reserved != 0 {
            return Err(CursorError::invalid_frame("reserved header field is not zero"));
        }
        if ico_type != ICO_TYPE_CUR && ico_type != ICO_TYPE_ICON {
            return Err(CursorError::invalid_frame(format!(
                "unknown resource type {}",
                ico_type
            )));
        }
        if image_count == 0 {
            return Err(CursorError::invalid_frame("resource holds no images"));
        }

        let dir_end = ICONDIR_SIZE + image_count as usize * ICONDIR_ENTRY_SIZE;
        if dir_end > data.len() {
            return Err(CursorError::invalid_frame(format!(
                "directory of {} entries is truncated",
                image_count
            )));
        }

        let mut entries = Vec::with_capacity(image_count as usize);
        for _ in 0..image_count {
            entries.push(Self::read_dir_entry(&mut cursor)?);
        }
        Ok(entries)
    }

    fn read_dir_entry(cursor: &mut Cursor<&[u8]>) -> CursorResult<IconDirEntry> {
        Ok(IconDirEntry {
            width: cursor.read_u8()?,
            height: cursor.read_u8()?,
            color_count: cursor.read_u8()?,
            reserved: cursor.read_u8()?,
            hotspot_x: cursor.read_u16::<LittleEndian>()?,
            hotspot_y: cursor.read_u16::<LittleEndian>()?,
            size_bytes: cursor.read_u32::<LittleEndian>()?,
            offset: cursor.read_u32::<LittleEndian>()?,
        })
    }

    /// Index of the entry with the strictly largest area; ties keep the first.
    pub fn select_largest(entries: &[IconDirEntry]) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, entry) in entries.iter().enumerate() {
            let area = entry.area();
            match best {
                Some((_, best_area)) if area <= best_area => {}
                _ => best = Some((idx, area)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub fn decode(data: &[u8]) -> CursorResult<DecodedFrame> {
        let entries = Self::read_directory(data)?;
        let hotspot = Self::read_hotspot(data);

        let best = Self::select_largest(&entries)
            .ok_or_else(|| CursorError::invalid_frame("resource holds no images"))?;
        let entry = &entries[best];
        log::debug!(
            "Selected variant {}/{} ({}x{}), hotspot {:?}",
            best + 1,
            entries.len(),
            entry.real_width(),
            entry.real_height(),
            hotspot
        );

        let image = Self::decode_entry(data, entry)?;
        Ok(DecodedFrame { image, hotspot })
    }

    fn decode_entry(data: &[u8], entry: &IconDirEntry) -> CursorResult<RgbaImage> {
        let offset = entry.offset as usize;
        let end = offset
            .checked_add(entry.size_bytes as usize)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                CursorError::invalid_frame("image data extends beyond resource bounds")
            })?;
        let image_data = &data[offset..end];

        let img = if image_data.starts_with(PNG_MAGIC) {
            image::load_from_memory_with_format(image_data, ImageFormat::Png)
        } else {
            let icon = wrap_single_entry(entry, image_data)?;
            image::load_from_memory_with_format(&icon, ImageFormat::Ico)
        }
        .map_err(|e| CursorError::invalid_frame(format!("bitmap decode failed: {}", e)))?;

        Ok(img.to_rgba8())
    }
}

/// Re-wrap one DIB payload as a standalone single-entry icon so the codec
/// applies the AND mask and half-height convention itself. Hotspot fields are
/// replaced with neutral plane/bit-count values.
fn wrap_single_entry(entry: &IconDirEntry, dib_data: &[u8]) -> CursorResult<Vec<u8>> {
    let (width, height) = dib_dimensions(dib_data).unwrap_or((entry.width, entry.height));

    let mut icon = Vec::with_capacity(MIN_BLOB_SIZE + dib_data.len());
    icon.write_u16::<LittleEndian>(0)?;
    icon.write_u16::<LittleEndian>(ICO_TYPE_ICON)?;
    icon.write_u16::<LittleEndian>(1)?;

    icon.write_u8(width)?;
    icon.write_u8(height)?;
    icon.write_u8(entry.color_count)?;
    icon.write_u8(0)?;
    icon.write_u16::<LittleEndian>(1)?;
    icon.write_u16::<LittleEndian>(0)?;
    icon.write_u32::<LittleEndian>(dib_data.len() as u32)?;
    icon.write_u32::<LittleEndian>(MIN_BLOB_SIZE as u32)?;

    icon.write_all(dib_data)?;
    Ok(icon)
}

/// Directory-style dimensions read from a BITMAPINFOHEADER, whose height
/// covers both the color and mask planes.
fn dib_dimensions(dib_data: &[u8]) -> Option<(u8, u8)> {
    if dib_data.len() < DIB_HEADER_MIN {
        return None;
    }
    let width = LittleEndian::read_i32(&dib_data[4..8]).unsigned_abs();
    let height = LittleEndian::read_i32(&dib_data[8..12]).unsigned_abs() / 2;
    if width == 0 || height == 0 || width > 256 || height > 256 {
        return None;
    }
    Some(((width % 256) as u8, (height % 256) as u8))
}
