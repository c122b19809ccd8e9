// In-memory cursor files for tests

use byteorder::{LittleEndian, WriteBytesExt};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::{Cursor, Write};

use super::ani::{ICON_FLAG, SEQUENCE_FLAG};

pub fn solid_image(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// 32bpp BITMAPINFOHEADER payload with bottom-up BGRA rows and an empty AND mask.
pub fn dib_bytes(image: &RgbaImage) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let mut dib = Vec::new();
    dib.write_u32::<LittleEndian>(40).unwrap();
    dib.write_i32::<LittleEndian>(width as i32).unwrap();
    dib.write_i32::<LittleEndian>(height as i32 * 2).unwrap();
    dib.write_u16::<LittleEndian>(1).unwrap();
    dib.write_u16::<LittleEndian>(32).unwrap();
    for _ in 0..6 {
        dib.write_u32::<LittleEndian>(0).unwrap();
    }

    for y in (0..height).rev() {
        for x in 0..width {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            dib.write_all(&[b, g, r, a]).unwrap();
        }
    }

    let mask_row = width.div_ceil(32) * 4;
    dib.extend(std::iter::repeat_n(0u8, (mask_row * height) as usize));
    dib
}

/// Icon directory with one entry per `(width, height, payload)`, all sharing a hotspot.
pub fn icon_blob(ico_type: u16, hotspot: (u16, u16), entries: &[(u32, u32, Vec<u8>)]) -> Vec<u8> {
    let mut blob = Vec::new();
    blob.write_u16::<LittleEndian>(0).unwrap();
    blob.write_u16::<LittleEndian>(ico_type).unwrap();
    blob.write_u16::<LittleEndian>(entries.len() as u16).unwrap();

    let mut offset = 6 + 16 * entries.len() as u32;
    for (width, height, payload) in entries {
        blob.write_u8((*width % 256) as u8).unwrap();
        blob.write_u8((*height % 256) as u8).unwrap();
        blob.write_u8(0).unwrap();
        blob.write_u8(0).unwrap();
        blob.write_u16::<LittleEndian>(hotspot.0).unwrap();
        blob.write_u16::<LittleEndian>(hotspot.1).unwrap();
        blob.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
        blob.write_u32::<LittleEndian>(offset).unwrap();
        offset += payload.len() as u32;
    }

    for (_, _, payload) in entries {
        blob.write_all(payload).unwrap();
    }
    blob
}

/// `.cur` resource with PNG-encoded variants.
pub fn cur_blob(hotspot: (u16, u16), images: &[RgbaImage]) -> Vec<u8> {
    let entries: Vec<_> = images
        .iter()
        .map(|img| (img.width(), img.height(), png_bytes(img)))
        .collect();
    icon_blob(2, hotspot, &entries)
}

fn chunk(tag: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 9);
    out.write_all(tag).unwrap();
    out.write_u32::<LittleEndian>(body.len() as u32).unwrap();
    out.write_all(body).unwrap();
    if body.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn u32_list(values: &[u32]) -> Vec<u8> {
    let mut out = Vec::new();
    for value in values {
        out.write_u32::<LittleEndian>(*value).unwrap();
    }
    out
}

pub struct AniBuilder {
    frames: Vec<Vec<u8>>,
    rates: Option<Vec<u32>>,
    sequence: Option<Vec<u32>>,
    default_rate: u32,
    flags: u32,
    declared_frames: Option<u32>,
    with_header: bool,
    extra: Vec<Vec<u8>>,
}

impl AniBuilder {
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self {
            frames,
            rates: None,
            sequence: None,
            default_rate: 10,
            flags: ICON_FLAG,
            declared_frames: None,
            with_header: true,
            extra: Vec::new(),
        }
    }

    pub fn rates(mut self, rates: Vec<u32>) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn sequence(mut self, sequence: Vec<u32>) -> Self {
        self.sequence = Some(sequence);
        self.flags |= SEQUENCE_FLAG;
        self
    }

    pub fn default_rate(mut self, ticks: u32) -> Self {
        self.default_rate = ticks;
        self
    }

    pub fn flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn declared_frames(mut self, count: u32) -> Self {
        self.declared_frames = Some(count);
        self
    }

    pub fn without_header(mut self) -> Self {
        self.with_header = false;
        self
    }

    pub fn extra_chunk(mut self, tag: [u8; 4], body: Vec<u8>) -> Self {
        self.extra.push(chunk(&tag, &body));
        self
    }

    pub fn info_list(mut self, entries: Vec<([u8; 4], Vec<u8>)>) -> Self {
        let mut list = b"INFO".to_vec();
        for (tag, body) in &entries {
            list.extend(chunk(tag, body));
        }
        self.extra.push(chunk(b"LIST", &list));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let frame_count = self.declared_frames.unwrap_or(self.frames.len() as u32);
        let step_count = self
            .sequence
            .as_ref()
            .map_or(self.frames.len(), Vec::len) as u32;

        let mut body = b"ACON".to_vec();
        if self.with_header {
            let anih = u32_list(&[
                36,
                frame_count,
                step_count,
                0,
                0,
                0,
                0,
                self.default_rate,
                self.flags,
            ]);
            body.extend(chunk(b"anih", &anih));
        }
        for extra in &self.extra {
            body.extend_from_slice(extra);
        }
        if let Some(rates) = &self.rates {
            body.extend(chunk(b"rate", &u32_list(rates)));
        }
        if let Some(sequence) = &self.sequence {
            body.extend(chunk(b"seq ", &u32_list(sequence)));
        }

        let mut list = b"fram".to_vec();
        for frame in &self.frames {
            list.extend(chunk(b"icon", frame));
        }
        body.extend(chunk(b"LIST", &list));

        chunk(b"RIFF", &body)
    }
}
