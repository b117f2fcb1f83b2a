//! Two-pass prop-to-XML emitter: type-dispatched text rendering plus a
//! locally invented `__type`/`__value` extension for mixed-content nodes.

use crate::error::{Error, Result};
use crate::io::WriteCursor;
use crate::prop::{PropNode, PropType};

const INDENT: &str = "  ";

/// Render a decoded prop tree as UTF-8 XML text.
///
/// Runs the emitter twice: once against a sizing cursor to determine the
/// exact output length, then again into a buffer allocated to that length.
/// The two passes must agree on length, or this is a bug in the emitter
/// rather than a malformed tree.
pub fn write(root: &PropNode) -> Result<String> {
    let mut sizing = WriteCursor::sizing();
    write_node(root, 0, &mut sizing)?;
    let expected_len = sizing.pos();

    let mut real = WriteCursor::with_capacity(expected_len);
    write_node(root, 0, &mut real)?;
    if real.pos() != expected_len {
        return Err(Error::Malformed("xml emitter sizing/rendering pass length mismatch".into()));
    }

    String::from_utf8(real.into_bytes()).map_err(|_| Error::Malformed("xml output is not valid utf-8".into()))
}

fn write_node(node: &PropNode, depth: usize, out: &mut WriteCursor) -> Result<()> {
    write_indent(depth, out);

    if node.ptype() == PropType::Void {
        out.write_str("<");
        out.write_str(node.name());
        write_attrs(node, out);
        if node.children().is_empty() {
            out.write_str("/>\n");
        } else {
            out.write_str(">\n");
            for child in node.children() {
                write_node(child, depth + 1, out)?;
            }
            write_indent(depth, out);
            out.write_str("</");
            out.write_str(node.name());
            out.write_str(">\n");
        }
        return Ok(());
    }

    out.write_str("<");
    out.write_str(node.name());
    out.write_str(" __type=\"");
    out.write_str(node.ptype().tag());
    out.write_str("\"");

    if !node.children().is_empty() {
        out.write_str(" __value=\"");
        write_escaped(&render_text(node)?, true, out);
        out.write_str("\"");
        write_attrs(node, out);
        out.write_str(">\n");
        for child in node.children() {
            write_node(child, depth + 1, out)?;
        }
        write_indent(depth, out);
        out.write_str("</");
        out.write_str(node.name());
        out.write_str(">\n");
    } else {
        write_attrs(node, out);
        out.write_str(">");
        write_escaped(&render_text(node)?, false, out);
        out.write_str("</");
        out.write_str(node.name());
        out.write_str(">\n");
    }

    Ok(())
}

fn write_indent(depth: usize, out: &mut WriteCursor) {
    for _ in 0..depth {
        out.write_str(INDENT);
    }
}

fn write_attrs(node: &PropNode, out: &mut WriteCursor) {
    for (key, value) in node.attrs() {
        out.write_str(" ");
        out.write_str(key);
        out.write_str("=\"");
        write_escaped(value, true, out);
        out.write_str("\"");
    }
}

fn write_escaped(s: &str, attr_context: bool, out: &mut WriteCursor) {
    for c in s.chars() {
        match c {
            '<' => out.write_str("&lt;"),
            '>' => out.write_str("&gt;"),
            '&' => out.write_str("&amp;"),
            '\'' if attr_context => out.write_str("&apos;"),
            '"' if attr_context => out.write_str("&quot;"),
            other => {
                let mut buf = [0u8; 4];
                out.write_str(other.encode_utf8(&mut buf));
            }
        }
    }
}

fn render_text(node: &PropNode) -> Result<String> {
    let mut cur = node.value_cursor();
    Ok(match node.ptype() {
        PropType::Void => String::new(),
        PropType::S8 => (cur.read_u8()? as i8).to_string(),
        PropType::U8 => cur.read_u8()?.to_string(),
        PropType::S16 => (cur.read_u16_be()? as i16).to_string(),
        PropType::U16 => cur.read_u16_be()?.to_string(),
        PropType::S32 => (cur.read_u32_be()? as i32).to_string(),
        PropType::U32 | PropType::Time => cur.read_u32_be()?.to_string(),
        PropType::S64 => (cur.read_u64_be()? as i64).to_string(),
        PropType::U64 => cur.read_u64_be()?.to_string(),
        PropType::Bin => hex::encode(node.payload()),
        PropType::Str => {
            let payload = node.payload();
            String::from_utf8_lossy(&payload[..payload.len() - 1]).into_owned()
        }
        PropType::Ip4 => {
            let b = node.payload();
            format!("{}.{}.{}.{}", b[0], b[1], b[2], b[3])
        }
        PropType::Bool => if cur.read_u8()? != 0 { "1" } else { "0" }.to_string(),
        PropType::TwoU16 => {
            let a = cur.read_u16_be()?;
            let b = cur.read_u16_be()?;
            format!("{a},{b}")
        }
        PropType::ThreeS32 => {
            let a = cur.read_u32_be()? as i32;
            let b = cur.read_u32_be()? as i32;
            let c = cur.read_u32_be()? as i32;
            format!("{a},{b},{c}")
        }
        PropType::FourU16 => {
            let a = cur.read_u16_be()?;
            let b = cur.read_u16_be()?;
            let c = cur.read_u16_be()?;
            let d = cur.read_u16_be()?;
            format!("{a},{b},{c},{d}")
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn void_leaf_self_closes() {
        let node = PropNode::new("root", PropType::Void, vec![]).unwrap();
        let xml = write(&node).unwrap();
        assert_eq!(xml, "<root/>\n");
    }

    #[test]
    fn u8_leaf_renders_decimal_text() {
        let node = PropNode::new("n", PropType::U8, vec![0x42]).unwrap();
        let xml = write(&node).unwrap();
        assert_eq!(xml, "<n __type=\"u8\">66</n>\n");
    }

    #[test]
    fn str_leaf_strips_trailing_nul() {
        let node = PropNode::new("n", PropType::Str, b"hi\0".to_vec()).unwrap();
        let xml = write(&node).unwrap();
        assert_eq!(xml, "<n __type=\"str\">hi</n>\n");
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut node = PropNode::new("n", PropType::Void, vec![]).unwrap();
        node.set_attr("a", "x\"y'z<w>&v");
        let xml = write(&node).unwrap();
        assert!(xml.contains("a=\"x&quot;y&apos;z&lt;w&gt;&amp;v\""));
    }

    #[test]
    fn void_with_children_nests_and_closes() {
        let mut root = PropNode::new("root", PropType::Void, vec![]).unwrap();
        root.append_child(PropNode::new("child", PropType::U8, vec![1]).unwrap());
        let xml = write(&root).unwrap();
        assert_eq!(xml, "<root>\n  <child __type=\"u8\">1</child>\n</root>\n");
    }
}
