// Animated cursor (RIFF/ACON) container parsing

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};

use super::error::{CursorError, CursorResult};

const SIGNATURE: &[u8; 4] = b"RIFF";
const ANI_TYPE: &[u8; 4] = b"ACON";
const HEADER_CHUNK: &[u8; 4] = b"anih";
const LIST_CHUNK: &[u8; 4] = b"LIST";
const SEQ_CHUNK: &[u8; 4] = b"seq ";
const RATE_CHUNK: &[u8; 4] = b"rate";
const FRAME_TYPE: &[u8; 4] = b"fram";
const ICON_CHUNK: &[u8; 4] = b"icon";

const CHUNK_HEADER_SIZE: usize = 8;
const ANIH_SIZE: usize = 36;

pub const ICON_FLAG: u32 = 0x1;
pub const SEQUENCE_FLAG: u32 = 0x2;

/// Duration of one display-rate tick ("jiffy").
pub const TICK_SECONDS: f64 = 1.0 / 60.0;

pub struct AniParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnihHeader {
    pub size: u32,
    pub frame_count: u32,
    pub step_count: u32,
    pub width: u32,
    pub height: u32,
    pub bit_count: u32,
    pub planes: u32,
    pub display_rate: u32,
    pub flags: u32,
}

impl AnihHeader {
    pub fn has_icon_frames(&self) -> bool {
        self.flags & ICON_FLAG != 0
    }

    pub fn has_sequence(&self) -> bool {
        self.flags & SEQUENCE_FLAG != 0
    }
}

/// Parsed container. Frame blobs are copied verbatim out of the `fram` list
/// and stay in storage order; the sequence list is recorded, not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedCursor {
    pub header: AnihHeader,
    pub rates: Vec<u32>,
    pub sequence: Vec<u32>,
    pub frames: Vec<Vec<u8>>,
}

impl AnimatedCursor {
    pub fn frame_count(&self) -> u32 {
        self.header.frame_count
    }

    pub fn default_rate_ticks(&self) -> u32 {
        self.header.display_rate
    }

    /// One tick count per stored frame, falling back to the header's default
    /// rate when no rate list was present.
    pub fn frame_rates(&self) -> Vec<u32> {
        let count = self.frames.len();
        if self.rates.is_empty() {
            return vec![self.default_rate_ticks(); count];
        }

        if self.rates.len() < count {
            log::warn!(
                "Rate list has {} entries for {} frames, using default rate {} for the gap",
                self.rates.len(),
                count,
                self.default_rate_ticks()
            );
        } else if self.rates.len() > count {
            log::warn!(
                "Rate list has {} entries for {} frames, ignoring the extra rates",
                self.rates.len(),
                count
            );
        }

        (0..count)
            .map(|idx| {
                self.rates
                    .get(idx)
                    .copied()
                    .unwrap_or(self.default_rate_ticks())
            })
            .collect()
    }
}

struct Chunk<'a> {
    tag: [u8; 4],
    body: &'a [u8],
}

#[derive(Default)]
struct ContainerParts {
    header: Option<AnihHeader>,
    rates: Option<Vec<u32>>,
    sequence: Option<Vec<u32>>,
    frames: Vec<Vec<u8>>,
}

impl AniParser {
    pub fn can_parse(data: &[u8]) -> bool {
        data.len() >= 12 && &data[0..4] == SIGNATURE && &data[8..12] == ANI_TYPE
    }

    pub fn parse(data: &[u8]) -> CursorResult<AnimatedCursor> {
        if data.len() < 12 {
            return Err(CursorError::malformed(format!(
                "{} bytes is too short for a RIFF header",
                data.len()
            )));
        }
        if &data[0..4] != SIGNATURE {
            return Err(CursorError::malformed("missing RIFF signature"));
        }

        let mut cursor = Cursor::new(data);
        let riff = Self::read_chunk(&mut cursor)?;
        if riff.body.len() < 4 {
            return Err(CursorError::malformed("RIFF chunk has no form type"));
        }
        let (form_type, body) = riff.body.split_at(4);
        if form_type != ANI_TYPE {
            return Err(CursorError::malformed(format!(
                "form type '{}' is not an animated cursor",
                tag_name(form_type)
            )));
        }

        let mut parts = ContainerParts::default();
        Self::walk_chunks(body, &mut parts)?;

        let header = parts
            .header
            .ok_or_else(|| CursorError::malformed("missing 'anih' header chunk"))?;

        if parts.frames.is_empty() {
            return Err(CursorError::malformed("container holds no icon frames"));
        }
        if !header.has_icon_frames() {
            log::warn!("Header does not flag icon frames, decoding them as icons anyway");
        }
        if parts.frames.len() != header.frame_count as usize {
            log::warn!(
                "Header declares {} frames but the frame list holds {}, using the frames found",
                header.frame_count,
                parts.frames.len()
            );
        }

        log::debug!(
            "Parsed container: {} frames, {} steps, default rate {}, flags {:#x}",
            header.frame_count,
            header.step_count,
            header.display_rate,
            header.flags
        );

        Ok(AnimatedCursor {
            header,
            rates: parts.rates.unwrap_or_default(),
            sequence: parts.sequence.unwrap_or_default(),
            frames: parts.frames,
        })
    }

    /// Reads one tagged chunk and seeks past its body and pad byte.
    fn read_chunk<'a>(cursor: &mut Cursor<&'a [u8]>) -> CursorResult<Chunk<'a>> {
        let data: &'a [u8] = cursor.get_ref();
        let start = cursor.position() as usize;
        if data.len().saturating_sub(start) < CHUNK_HEADER_SIZE {
            return Err(CursorError::malformed(format!(
                "truncated chunk header at offset {}",
                start
            )));
        }

        let mut tag = [0u8; 4];
        cursor.read_exact(&mut tag)?;
        let size = cursor.read_u32::<LittleEndian>()? as usize;

        let body_start = start + CHUNK_HEADER_SIZE;
        let remaining = data.len() - body_start;
        if size > remaining {
            return Err(CursorError::malformed(format!(
                "chunk '{}' declares {} bytes but only {} remain",
                tag_name(&tag),
                size,
                remaining
            )));
        }

        let mut next = body_start + size;
        if size % 2 == 1 {
            if next < data.len() {
                next += 1;
            } else {
                log::warn!("Chunk '{}' is missing its pad byte", tag_name(&tag));
            }
        }
        cursor.seek(SeekFrom::Start(next as u64))?;

        Ok(Chunk {
            tag,
            body: &data[body_start..body_start + size],
        })
    }

    fn walk_chunks(body: &[u8], parts: &mut ContainerParts) -> CursorResult<()> {
        let mut cursor = Cursor::new(body);

        while (cursor.position() as usize) < body.len() {
            let chunk = Self::read_chunk(&mut cursor)?;

            match &chunk.tag {
                HEADER_CHUNK => {
                    parts.header = Some(Self::read_anih_header(chunk.body)?);
                }
                RATE_CHUNK => {
                    parts.rates = Some(read_u32_list(chunk.body, "rate"));
                }
                SEQ_CHUNK => {
                    parts.sequence = Some(read_u32_list(chunk.body, "seq "));
                }
                LIST_CHUNK => {
                    if chunk.body.len() < 4 {
                        return Err(CursorError::malformed("LIST chunk without a list type"));
                    }
                    let (list_type, children) = chunk.body.split_at(4);
                    if list_type == FRAME_TYPE {
                        Self::read_frames(children, parts)?;
                    } else {
                        log::debug!("Descending into LIST '{}'", tag_name(list_type));
                        Self::walk_chunks(children, parts)?;
                    }
                }
                _ => {
                    log::debug!(
                        "Skipping chunk '{}' ({} bytes)",
                        tag_name(&chunk.tag),
                        chunk.body.len()
                    );
                }
            }
        }

        Ok(())
    }

    fn read_anih_header(body: &[u8]) -> CursorResult<AnihHeader> {
        if body.len() < ANIH_SIZE {
            return Err(CursorError::malformed(format!(
                "'anih' chunk is {} bytes, expected {}",
                body.len(),
                ANIH_SIZE
            )));
        }

        let mut cursor = Cursor::new(body);
        let header = AnihHeader {
            size: cursor.read_u32::<LittleEndian>()?,
            frame_count: cursor.read_u32::<LittleEndian>()?,
            step_count: cursor.read_u32::<LittleEndian>()?,
            width: cursor.read_u32::<LittleEndian>()?,
            height: cursor.read_u32::<LittleEndian>()?,
            bit_count: cursor.read_u32::<LittleEndian>()?,
            planes: cursor.read_u32::<LittleEndian>()?,
            display_rate: cursor.read_u32::<LittleEndian>()?,
            flags: cursor.read_u32::<LittleEndian>()?,
        };

        if header.size as usize != ANIH_SIZE {
            log::warn!("Unusual 'anih' size field: {}", header.size);
        }

        Ok(header)
    }

    fn read_frames(children: &[u8], parts: &mut ContainerParts) -> CursorResult<()> {
        let mut cursor = Cursor::new(children);

        while (cursor.position() as usize) < children.len() {
            let chunk = Self::read_chunk(&mut cursor)?;
            if &chunk.tag == ICON_CHUNK {
                parts.frames.push(chunk.body.to_vec());
            } else {
                log::debug!(
                    "Skipping '{}' chunk inside frame list",
                    tag_name(&chunk.tag)
                );
            }
        }

        Ok(())
    }
}

fn read_u32_list(body: &[u8], tag: &str) -> Vec<u32> {
    let values = body.chunks_exact(4);
    if !values.remainder().is_empty() {
        log::warn!(
            "'{}' chunk has {} trailing bytes",
            tag,
            values.remainder().len()
        );
    }
    values.map(LittleEndian::read_u32).collect()
}

fn tag_name(tag: &[u8]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::{AniBuilder, cur_blob, solid_image};

    fn frame(color: u8) -> Vec<u8> {
        cur_blob((2, 3), &[solid_image(8, 8, [color, 0, 0, 255])])
    }

    #[test]
    fn test_ani_detection() {
        let valid = b"RIFF\x00\x00\x00\x00ACON";
        assert!(AniParser::can_parse(valid));

        let invalid = b"RIFF\x00\x00\x00\x00WAVE";
        assert!(!AniParser::can_parse(invalid));
    }

    #[test]
    fn test_parse_frames_rates_and_sequence() {
        let frames = vec![frame(1), frame(2), frame(3)];
        let data = AniBuilder::new(frames.clone())
            .rates(vec![6, 6, 12])
            .sequence(vec![0, 2, 1])
            .build();

        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.frame_count(), 3);
        assert_eq!(ani.rates, vec![6, 6, 12]);
        assert_eq!(ani.sequence, vec![0, 2, 1]);
        assert!(ani.header.has_sequence());
        assert_eq!(ani.frames, frames);
        assert_eq!(ani.frame_rates(), vec![6, 6, 12]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let data = AniBuilder::new(vec![frame(1), frame(2)])
            .rates(vec![3, 9])
            .build();
        assert_eq!(
            AniParser::parse(&data).unwrap(),
            AniParser::parse(&data).unwrap()
        );
    }

    #[test]
    fn test_default_rate_without_rate_chunk() {
        let data = AniBuilder::new(vec![frame(1), frame(2)])
            .default_rate(4)
            .build();
        let ani = AniParser::parse(&data).unwrap();

        assert!(ani.rates.is_empty());
        assert!(ani.sequence.is_empty());
        assert_eq!(ani.frame_rates(), vec![4, 4]);
    }

    #[test]
    fn test_short_rate_list_is_padded() {
        let data = AniBuilder::new(vec![frame(1), frame(2), frame(3)])
            .rates(vec![5])
            .default_rate(8)
            .build();
        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.frame_rates(), vec![5, 8, 8]);
    }

    #[test]
    fn test_odd_length_frames_are_padded() {
        let mut odd = frame(7);
        odd.push(0xEE);
        if odd.len() % 2 == 0 {
            odd.push(0xEE);
        }
        let frames = vec![odd, frame(8)];
        let data = AniBuilder::new(frames.clone()).build();

        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.frames, frames);
    }

    #[test]
    fn test_unknown_chunks_are_skipped() {
        let data = AniBuilder::new(vec![frame(1)])
            .extra_chunk(*b"xtra", vec![1, 2, 3])
            .info_list(vec![(*b"INAM", b"arrow\0".to_vec())])
            .build();
        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.frames.len(), 1);
    }

    #[test]
    fn test_bad_signature_is_malformed() {
        let mut data = AniBuilder::new(vec![frame(1)]).build();
        data[0..4].copy_from_slice(b"RIFX");
        let err = AniParser::parse(&data).unwrap_err();
        assert!(matches!(err, CursorError::MalformedContainer(_)));
    }

    #[test]
    fn test_bad_form_type_is_malformed() {
        let mut data = AniBuilder::new(vec![frame(1)]).build();
        data[8..12].copy_from_slice(b"WAVE");
        let err = AniParser::parse(&data).unwrap_err();
        assert!(matches!(err, CursorError::MalformedContainer(_)));
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let data = AniBuilder::new(vec![frame(1)]).without_header().build();
        let err = AniParser::parse(&data).unwrap_err();
        assert!(matches!(err, CursorError::MalformedContainer(_)));
    }

    #[test]
    fn test_overflowing_chunk_is_malformed() {
        let mut data = AniBuilder::new(vec![frame(1)]).build();
        // 'anih' length field sits right after the form type
        data[16..20].copy_from_slice(&0xFFFF_u32.to_le_bytes());
        let err = AniParser::parse(&data).unwrap_err();
        assert!(matches!(err, CursorError::MalformedContainer(_)));
    }

    #[test]
    fn test_truncated_file_is_malformed() {
        let data = AniBuilder::new(vec![frame(1), frame(2)]).build();
        let err = AniParser::parse(&data[..data.len() - 20]).unwrap_err();
        assert!(matches!(err, CursorError::MalformedContainer(_)));
    }

    #[test]
    fn test_frame_count_mismatch_uses_found_frames() {
        let frames = vec![frame(1), frame(2)];
        let data = AniBuilder::new(frames.clone())
            .declared_frames(3)
            .rates(vec![2, 4])
            .build();
        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.frame_count(), 3);
        assert_eq!(ani.frames, frames);
        assert_eq!(ani.frame_rates(), vec![2, 4]);
    }

    #[test]
    fn test_missing_icon_flag_still_parses() {
        let data = AniBuilder::new(vec![frame(1)]).flags(0).build();
        let ani = AniParser::parse(&data).unwrap();
        assert!(!ani.header.has_icon_frames());
        assert_eq!(ani.frames, vec![frame(1)]);
    }

    #[test]
    fn test_empty_frame_list_is_malformed() {
        let data = AniBuilder::new(Vec::new()).build();
        let err = AniParser::parse(&data).unwrap_err();
        assert!(matches!(err, CursorError::MalformedContainer(_)));
    }

    #[test]
    fn test_long_rate_list_is_truncated() {
        let data = AniBuilder::new(vec![frame(1), frame(2)])
            .rates(vec![4, 5, 6, 7])
            .build();
        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.rates, vec![4, 5, 6, 7]);
        assert_eq!(ani.frame_rates(), vec![4, 5]);
    }

    #[test]
    fn test_missing_final_pad_byte_is_tolerated() {
        let mut odd = frame(5);
        if odd.len() % 2 == 0 {
            odd.push(0xEE);
        }
        let mut data = AniBuilder::new(vec![frame(4), odd.clone()]).build();
        assert_eq!(data.pop(), Some(0));

        // RIFF and LIST sizes both counted the dropped pad byte
        let list_at = data.windows(4).position(|w| w == b"fram").unwrap() - 8;
        for size_at in [4, list_at + 4] {
            let size = LittleEndian::read_u32(&data[size_at..size_at + 4]);
            data[size_at..size_at + 4].copy_from_slice(&(size - 1).to_le_bytes());
        }

        let ani = AniParser::parse(&data).unwrap();
        assert_eq!(ani.frames, vec![frame(4), odd]);
    }
}
