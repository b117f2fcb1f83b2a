//! The binary prop decoder: split head/body layout, recursive descent, and
//! the alignment-cave allocator for 1- and 2-byte payloads.

use crate::error::{Error, Result};
use crate::io::Cursor;
use crate::name::decode_name;
use crate::prop::{PropNode, PropType, CODE_ATTR, CODE_CHILD_END, CODE_EOF};

/// Decode a binary prop stream into its root node.
///
/// Any short read anywhere in the stream surfaces here as `Malformed`,
/// matching this format's documented failure contract: callers of the
/// binary decoder never observe a bare `ShortRead`.
pub fn decode(bytes: &[u8]) -> Result<PropNode> {
    decode_inner(bytes).map_err(|e| match e {
        Error::ShortRead => Error::Malformed("short read while decoding prop stream".into()),
        other => other,
    })
}

fn decode_inner(bytes: &[u8]) -> Result<PropNode> {
    let mut top = Cursor::new(bytes);
    top.read(4)?; // magic, not validated

    let head_nbytes = top.read_u32_be()? as usize;
    let mut head = top.slice(head_nbytes)?;

    top.align(4)?;

    let body_nbytes = top.read_u32_be()? as usize;
    let mut body = top.slice(body_nbytes)?;

    let mut caves = Caves::default();

    let root_code = head.read_u8()?;
    if root_code == CODE_EOF {
        return Err(Error::Malformed("no root node".into()));
    }
    let root = read_node(&mut head, &mut body, &mut caves, root_code)?;

    let trailer = head.read_u8()?;
    if trailer != CODE_EOF {
        return Err(Error::Malformed("missing trailing head EOF marker".into()));
    }

    Ok(root)
}

/// The two "alignment cave" windows, one for 1-byte draws, one for 2-byte
/// draws. Each holds whatever is left of the most recently sliced 4-byte
/// body window of that width.
#[derive(Default)]
struct Caves<'a> {
    one: Option<Cursor<'a>>,
    two: Option<Cursor<'a>>,
}

fn read_node<'a>(
    head: &mut Cursor<'a>,
    body: &mut Cursor<'a>,
    caves: &mut Caves<'a>,
    type_code: u8,
) -> Result<PropNode> {
    let ptype = PropType::from_code(type_code)?;
    let name = decode_name(head)?;
    let value = slice_value(body, caves, ptype)?;
    let mut node = PropNode::new(name, ptype, value.to_vec())?;

    loop {
        let code = head.read_u8()?;
        match code {
            CODE_CHILD_END => return Ok(node),
            CODE_ATTR => {
                let (key, val) = read_attr(head, body)?;
                node.set_attr(key, val);
            }
            other => {
                let child = read_node(head, body, caves, other)?;
                node.append_child(child);
            }
        }
    }
}

fn read_attr<'a>(head: &mut Cursor<'a>, body: &mut Cursor<'a>) -> Result<(String, String)> {
    let key = decode_name(head)?;
    let raw = read_variable_value(body)?;
    if raw.is_empty() || *raw.last().unwrap() != 0 {
        return Err(Error::Malformed("attribute value not NUL-terminated".into()));
    }
    let val = String::from_utf8_lossy(&raw[..raw.len() - 1]).into_owned();
    Ok((key, val))
}

/// Slice a length-prefixed (variable-size) value from BODY: align to 4,
/// read a u32 BE length, then slice that many bytes directly.
fn read_variable_value<'a>(body: &mut Cursor<'a>) -> Result<&'a [u8]> {
    body.align(4)?;
    let n = body.read_u32_be()? as usize;
    body.read(n)
}

fn slice_value<'a>(body: &mut Cursor<'a>, caves: &mut Caves<'a>, ptype: PropType) -> Result<&'a [u8]> {
    match ptype.fixed_size() {
        None => read_variable_value(body),
        Some(n) if n >= 4 => {
            body.align(4)?;
            body.read(n)
        }
        Some(0) => {
            body.align(4)?;
            body.read(0)
        }
        Some(n @ (1 | 2)) => {
            body.align(4)?;
            draw_from_cave(body, caves, n)
        }
        Some(n) => unreachable!("no prop type has fixed size {n}"),
    }
}

fn draw_from_cave<'a>(body: &mut Cursor<'a>, caves: &mut Caves<'a>, n: usize) -> Result<&'a [u8]> {
    let slot = if n == 1 { &mut caves.one } else { &mut caves.two };
    if slot.is_none() || slot.as_ref().unwrap().remaining() < n {
        *slot = Some(body.slice(4)?);
    }
    slot.as_mut().unwrap().read(n)
}
