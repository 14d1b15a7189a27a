use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref, Str};
use ttf_parser::Face;

use crate::error::Error;

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) widths_1000: Vec<f32>,
    pub(crate) ascender_ratio: f32,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
    pub(crate) char_widths_1000: Option<HashMap<char, f32>>,
}

impl FontEntry {
    /// Width of a single character in 1000-units. Embedded fonts answer from the glyph
    /// advances of the characters in use; anything else goes through the WinAnsi table.
    pub(crate) fn char_width_1000(&self, ch: char) -> f32 {
        if let Some(w) = self.char_widths_1000.as_ref().and_then(|m| m.get(&ch)) {
            return *w;
        }
        let byte = char_to_winansi(ch);
        if byte >= 32 {
            self.widths_1000[(byte - 32) as usize]
        } else {
            0.0
        }
    }

    /// Width of `text` as drawn, spaces included.
    pub(crate) fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(ch) * font_size / 1000.0)
            .sum()
    }

    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Regular and bold faces used by a document.
pub(crate) struct FontPair {
    pub(crate) regular: FontEntry,
    pub(crate) bold: FontEntry,
}

impl FontPair {
    pub(crate) fn get(&self, bold: bool) -> &FontEntry {
        if bold { &self.bold } else { &self.regular }
    }

    pub(crate) fn resources(&self) -> [(&str, Ref); 2] {
        [
            (self.regular.pdf_name.as_str(), self.regular.font_ref),
            (self.bold.pdf_name.as_str(), self.bold.font_ref),
        ]
    }
}

/// (lowercase family name, bold) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool), (PathBuf, u32)>;

fn font_family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
        .find_map(|name| name.to_string())
}

fn font_directories(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = extra.to_vec();

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        dirs.push("C:\\Windows\\Fonts".into());
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

/// Index upright faces of `family` found under the font directories.
fn scan_for_family(family: &str, extra_dirs: &[PathBuf]) -> FontLookup {
    let t0 = std::time::Instant::now();
    let wanted = family.to_lowercase();
    let mut index = FontLookup::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut files_parsed = 0u32;

    let mut stack = font_directories(extra_dirs);
    // Earlier directories win; popping from the back would reverse that.
    stack.reverse();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut subdirs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
                continue;
            }
            if !is_font_file(&path) {
                continue;
            }
            let Ok(file) = std::fs::File::open(&path) else {
                continue;
            };
            // SAFETY: the mapping is read-only and dropped before this iteration ends.
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            files_parsed += 1;
            let face_count = if is_font_collection(&path) {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            for face_idx in 0..face_count {
                let Ok(face) = Face::parse(&data, face_idx) else {
                    continue;
                };
                if face.is_italic() {
                    continue;
                }
                if font_family_name(&face).is_some_and(|f| f.to_lowercase() == wanted) {
                    index
                        .entry((wanted.clone(), face.is_bold()))
                        .or_insert((path.clone(), face_idx));
                }
            }
        }
        subdirs.sort();
        stack.extend(subdirs.into_iter().rev());
    }

    log::info!(
        "Font scan for {family:?}: {:.1}ms, {files_parsed} files parsed → {} faces",
        t0.elapsed().as_secs_f64() * 1000.0,
        index.len(),
    );
    index
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    WINANSI_HIGH
        .iter()
        .find(|&&(b, _)| b == byte)
        .map(|&(_, c)| c)
        .unwrap_or(byte as char)
}

const WINANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        _ => WINANSI_HIGH
            .iter()
            .find(|&&(_, ch)| ch == c)
            .map(|&(b, _)| b)
            .unwrap_or(0),
    }
}

/// Convert a UTF-8 string to WinAnsi bytes; unmappable characters become `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match char_to_winansi(c) {
            0 => b'?',
            b => b,
        })
        .collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| char_to_gid.get(&ch).copied().unwrap_or(0).to_be_bytes())
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths(bold: bool) -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| {
            let w: f32 = match b {
                32 => 278.0,                          // space
                33..=47 => 333.0,                     // punctuation
                48..=57 => 556.0,                     // digits
                58..=64 => 333.0,                     // more punctuation
                73 | 74 => 278.0,                     // I J
                77 => 833.0,                          // M
                65..=90 => 667.0,                     // uppercase average
                91..=96 => 333.0,                     // brackets etc.
                102 | 105 | 106 | 108 | 116 => 278.0, // f i j l t
                109 | 119 => 833.0,                   // m w
                97..=122 => 556.0,                    // lowercase average
                _ => 556.0,
            };
            if bold && b != 32 { w * 1.06 } else { w }
        })
        .collect()
}

struct EmbeddedMetrics {
    widths_1000: Vec<f32>,
    ascender_ratio: f32,
    char_to_gid: HashMap<char, u16>,
    char_widths_1000: HashMap<char, f32>,
}

/// Embed a TrueType/OpenType face as a Type0 composite font with Identity-H encoding,
/// subsetted to the characters the document draws.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<EmbeddedMetrics, Error> {
    let face = Face::parse(font_data, face_index)
        .map_err(|e| Error::Font(format!("{font_name}: {e}")))?;

    let units = face.units_per_em() as f32;
    let to_1000 = |v: f32| v / units * 1000.0;
    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        to_1000(bb.x_min as f32),
        to_1000(bb.y_min as f32),
        to_1000(bb.x_max as f32),
        to_1000(bb.y_max as f32),
    );

    let advance = |ch: char| {
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(|adv| to_1000(adv as f32))
    };

    let widths_1000: Vec<f32> = (32u8..=255u8)
        .map(|byte| advance(winansi_to_char(byte)).unwrap_or(0.0))
        .collect();

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut char_widths_1000 = HashMap::new();
    // Sorted so glyph ids, and with them the output bytes, do not depend on hash order.
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        if let Some(gid) = face.glyph_index(ch) {
            char_to_gid.insert(ch, remapper.remap(gid.0));
            char_widths_1000.insert(ch, advance(ch).unwrap_or(0.0));
        }
    }

    let subset_data = subsetter::subset(font_data, face_index, &remapper).unwrap_or_else(|e| {
        log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
        font_data.to_vec()
    });
    let data_len = i32::try_from(subset_data.len())
        .map_err(|_| Error::Backend(format!("{font_name}: font program too large")))?;

    let descriptor_ref = alloc();
    let data_ref = alloc();
    let cid_font_ref = alloc();
    let tounicode_ref = alloc();
    let ps_name = font_name.replace(' ', "");

    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(to_1000(face.ascender() as f32))
        .descent(to_1000(face.descender() as f32))
        .cap_height(face.capital_height().map_or(700.0, |h| to_1000(h as f32)))
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: Str(b"Adobe"),
        ordering: Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .map(|(ch, &new_gid)| (new_gid, char_widths_1000.get(ch).copied().unwrap_or(0.0)))
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    let mut pairs: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    pairs.sort_unstable();
    for (new_gid, ch) in pairs {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Ok(EmbeddedMetrics {
        widths_1000,
        ascender_ratio: face.ascender() as f32 / units,
        char_to_gid,
        char_widths_1000,
    })
}

fn builtin_helvetica(pdf: &mut Pdf, font_ref: Ref, pdf_name: String, bold: bool) -> FontEntry {
    let base: &[u8] = if bold { b"Helvetica-Bold" } else { b"Helvetica" };
    pdf.type1_font(font_ref)
        .base_font(Name(base))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    FontEntry {
        pdf_name,
        font_ref,
        widths_1000: helvetica_widths(bold),
        ascender_ratio: 0.718,
        char_to_gid: None,
        char_widths_1000: None,
    }
}

/// Register the regular and bold faces for a document.
///
/// A requested family that cannot be found falls back to built-in Helvetica with a warning; a
/// family that is found but cannot be embedded is an error.
pub(crate) fn register_fonts(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    family: Option<&str>,
    font_dirs: &[PathBuf],
    used_chars: &HashSet<char>,
) -> Result<FontPair, Error> {
    let t0 = std::time::Instant::now();
    let index = family
        .map(|f| scan_for_family(f, font_dirs))
        .unwrap_or_default();

    let mut register = |bold: bool, pdf_name: &str| -> Result<FontEntry, Error> {
        let font_ref = alloc();
        let found = family.and_then(|f| {
            let key = f.to_lowercase();
            index
                .get(&(key.clone(), bold))
                .or_else(|| index.get(&(key, false)))
                .map(|hit| (f, hit.clone()))
        });
        let Some((name, (path, face_index))) = found else {
            if let Some(f) = family {
                log::warn!("Font not found: {f} bold={bold}, using Helvetica");
            }
            return Ok(builtin_helvetica(pdf, font_ref, pdf_name.to_string(), bold));
        };
        let data = std::fs::read(&path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let m = embed_truetype(pdf, font_ref, name, &data, face_index, used_chars, alloc)?;
        Ok(FontEntry {
            pdf_name: pdf_name.to_string(),
            font_ref,
            widths_1000: m.widths_1000,
            ascender_ratio: m.ascender_ratio,
            char_to_gid: Some(m.char_to_gid),
            char_widths_1000: Some(m.char_widths_1000),
        })
    };

    let regular = register(false, "F1")?;
    let bold = register(true, "F2")?;

    log::debug!(
        "register_fonts: {family:?} → {:.1}ms",
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    Ok(FontPair { regular, bold })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winansi_maps_latin1_and_smart_quotes() {
        assert_eq!(to_winansi_bytes("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(to_winansi_bytes("\u{2019}"), vec![0x92]);
        assert_eq!(to_winansi_bytes("\u{0915}"), vec![b'?']);
        assert_eq!(winansi_to_char(0x95), '\u{2022}');
    }

    #[test]
    fn gid_encoding_is_big_endian() {
        let map = HashMap::from([('a', 0x0102u16)]);
        assert_eq!(encode_as_gids("ab", &map), vec![0x01, 0x02, 0x00, 0x00]);
    }
}
