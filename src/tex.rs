//! Texture-atlas interpreter: parses a `texturelist` prop tree and
//! materializes one image's pixels from its LZ-framed payload.

use crate::error::{Error, Result};
use crate::lz;
use crate::prop::{PropNode, PropType};

const REQUIRED_COMPRESSION: &str = "avslz";

/// A point within a texture-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

/// A `4u16` rectangle, `p1` the low corner and `p2` the high corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub p1: Point,
    pub p2: Point,
}

#[derive(Debug, Clone)]
pub struct Image {
    pub name: String,
    /// Lowercase hex MD5 of `name`, the on-disk blob identifier.
    pub name_md5: String,
    pub uvrect: Rect,
    pub imgrect: Rect,
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub format: String,
    pub width: u16,
    pub height: u16,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone)]
pub struct TextureList {
    pub textures: Vec<Texture>,
}

/// Parse a decoded prop tree as a texture list.
pub fn parse(root: &PropNode) -> Result<TextureList> {
    if root.name() != "texturelist" {
        return Err(Error::Malformed("root is not named texturelist".into()));
    }
    if root.get_attr("compress") != Some(REQUIRED_COMPRESSION) {
        return Err(Error::UnsupportedCompression);
    }

    let mut textures = Vec::with_capacity(root.children().len());
    for child in root.children() {
        if child.name() != "texture" {
            return Err(Error::Malformed(format!("unexpected child '{}' under texturelist", child.name())));
        }
        textures.push(parse_texture(child)?);
    }
    Ok(TextureList { textures })
}

fn parse_texture(node: &PropNode) -> Result<Texture> {
    let format = node
        .get_attr("format")
        .ok_or_else(|| Error::Malformed("texture missing format attribute".into()))?
        .to_string();

    let size_node = node
        .search_child("size")
        .ok_or_else(|| Error::Malformed("texture missing size child".into()))?;
    if size_node.ptype() != PropType::TwoU16 {
        return Err(Error::Malformed("texture size child is not 2u16".into()));
    }
    let mut cur = size_node.value_cursor();
    let width = cur.read_u16_be()?;
    let height = cur.read_u16_be()?;

    let mut images = Vec::new();
    for child in node.children() {
        if child.name() == "size" {
            continue;
        }
        if child.name() != "image" {
            return Err(Error::Malformed(format!("unexpected child '{}' under texture", child.name())));
        }
        images.push(parse_image(child)?);
    }

    Ok(Texture { format, width, height, images })
}

fn parse_image(node: &PropNode) -> Result<Image> {
    let name = node
        .get_attr("name")
        .ok_or_else(|| Error::Malformed("image missing name attribute".into()))?
        .to_string();
    let name_md5 = format!("{:x}", md5::compute(name.as_bytes()));

    let uvrect = parse_rect(
        node.search_child("uvrect").ok_or_else(|| Error::Malformed("image missing uvrect".into()))?,
    )?;
    let imgrect = parse_rect(
        node.search_child("imgrect").ok_or_else(|| Error::Malformed("image missing imgrect".into()))?,
    )?;

    Ok(Image { name, name_md5, uvrect, imgrect })
}

fn parse_rect(node: &PropNode) -> Result<Rect> {
    if node.ptype() != PropType::FourU16 {
        return Err(Error::Malformed(format!("{} is not 4u16", node.name())));
    }
    let mut cur = node.value_cursor();
    let x1 = cur.read_u16_be()?;
    let x2 = cur.read_u16_be()?;
    let y1 = cur.read_u16_be()?;
    let y2 = cur.read_u16_be()?;
    if x1 > x2 || y1 > y2 {
        return Err(Error::Malformed(format!("{} has inverted rectangle", node.name())));
    }
    Ok(Rect { p1: Point { x: x1, y: y1 }, p2: Point { x: x2, y: y2 } })
}

/// Decompress `lz_frame` and interpret it as `image`'s BGRA pixel grid,
/// applying the coordinate-halving rule. Returns `(width, height, pixels)`.
pub fn read_pixels(image: &Image, lz_frame: &[u8]) -> Result<(u16, u16, Vec<u8>)> {
    let decompressed = lz::decode_frame(lz_frame)?;

    let width = (image.imgrect.p2.x - image.imgrect.p1.x) / 2;
    let height = (image.imgrect.p2.y - image.imgrect.p1.y) / 2;
    let expected = width as usize * height as usize * 4;

    if decompressed.len() != expected {
        return Err(Error::Malformed(format!(
            "image '{}' pixel payload {} bytes, expected {}",
            image.name,
            decompressed.len(),
            expected
        )));
    }

    Ok((width, height, decompressed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prop::PropNode;

    fn u16pair(a: u16, b: u16) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(&a.to_be_bytes());
        v.extend_from_slice(&b.to_be_bytes());
        v
    }

    fn rect_payload(x1: u16, x2: u16, y1: u16, y2: u16) -> Vec<u8> {
        let mut v = Vec::new();
        for n in [x1, x2, y1, y2] {
            v.extend_from_slice(&n.to_be_bytes());
        }
        v
    }

    #[test]
    fn wrong_compression_is_rejected() {
        let mut root = PropNode::new("texturelist", PropType::Void, vec![]).unwrap();
        root.set_attr("compress", "zlib");
        assert!(matches!(parse(&root), Err(Error::UnsupportedCompression)));
    }

    #[test]
    fn texture_halving_scenario() {
        let mut image = PropNode::new("image", PropType::Void, vec![]).unwrap();
        image.set_attr("name", "foo");
        let uvrect = PropNode::new("uvrect", PropType::FourU16, rect_payload(0, 1, 0, 1)).unwrap();
        let imgrect = PropNode::new("imgrect", PropType::FourU16, rect_payload(0, 32, 0, 16)).unwrap();
        image.append_child(uvrect);
        image.append_child(imgrect);
        let img = parse_image(&image).unwrap();
        assert_eq!(img.imgrect.p2.x - img.imgrect.p1.x, 32);

        // 512 bytes of zeroed BGRA pixels, framed as an LZ stream of raw bytes.
        let raw = vec![0u8; 512];
        let mut frame = Vec::new();
        frame.extend_from_slice(&(raw.len() as u32).to_be_bytes());
        // build a trivial LZ-compressed-equivalent payload: all raw bytes then EOF marker
        let mut comp = Vec::new();
        let mut i = 0;
        while i < raw.len() {
            let chunk = &raw[i..(i + 8).min(raw.len())];
            comp.push(if chunk.len() == 8 { 0xFF } else { (1u16.wrapping_shl(chunk.len() as u32) - 1) as u8 });
            comp.extend_from_slice(chunk);
            i += chunk.len();
        }
        comp.extend_from_slice(&[0x00, 0x00, 0x00]); // flag byte (backref) + zero-offset EOF marker
        frame.extend_from_slice(&(comp.len() as u32).to_be_bytes());
        frame.extend_from_slice(&comp);

        let (width, height, pixels) = read_pixels(&img, &frame).unwrap();
        assert_eq!((width, height), (16, 8));
        assert_eq!(pixels.len(), 512);
    }

    #[test]
    fn inverted_rect_is_malformed() {
        let node = PropNode::new("uvrect", PropType::FourU16, rect_payload(5, 1, 0, 1)).unwrap();
        assert!(parse_rect(&node).is_err());
    }
}
