//! ASCII DXF reader.
//!
//! Reads the ENTITIES section into [`RawEntity`] records. Only geometry the
//! pipeline consumes is decoded (LINE, LWPOLYLINE, POLYLINE/VERTEX); every
//! other entity is kept by name as [`EntityKind::Other`] so the extractor
//! can report it. Paper-space entities (group 67 = 1) are skipped.

use std::path::Path;

use tracing::debug;

use crate::error::DxfError;
use crate::geometry::{EntityKind, PlineVertex, RawEntity};

const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF";

/// POLYLINE flag bits for 3D meshes and polyface meshes.
const POLYLINE_MESH_FLAGS: i32 = 16 | 64;
/// VERTEX flag bit for spline frame control points.
const VERTEX_SPLINE_FRAME: i32 = 16;

#[derive(Debug, Clone, Copy)]
struct Group<'a> {
    code: i32,
    value: &'a str,
}

/// Parses an ASCII DXF document.
///
/// # Errors
///
/// Returns a [`DxfError`] when the group-code structure is broken, a
/// coordinate is not a number, or there is no ENTITIES section.
pub fn parse_str(input: &str) -> Result<Vec<RawEntity>, DxfError> {
    if input.as_bytes().starts_with(BINARY_SENTINEL) {
        return Err(DxfError::Binary);
    }
    let groups = parse_groups(input)?;
    let entities = parse_entities(&groups)?;
    debug!(groups = groups.len(), entities = entities.len(), "parsed DXF");
    Ok(entities)
}

/// Reads and parses a DXF file.
///
/// Non-UTF-8 bytes (legacy code pages) are replaced rather than rejected;
/// they only occur in text, never in coordinates.
///
/// # Errors
///
/// Returns `DxfError::Io` if the file cannot be read, `DxfError::Binary`
/// for binary DXF, otherwise as [`parse_str`].
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<RawEntity>, DxfError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DxfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.starts_with(BINARY_SENTINEL) {
        return Err(DxfError::Binary);
    }
    parse_str(&String::from_utf8_lossy(&bytes))
}

fn parse_groups(input: &str) -> Result<Vec<Group<'_>>, DxfError> {
    let mut lines: Vec<&str> = input.lines().collect();
    // Tolerate one trailing blank line after EOF.
    if lines.len() % 2 == 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.len() % 2 == 1 {
        return Err(DxfError::OddNumberOfLines);
    }

    lines
        .chunks_exact(2)
        .enumerate()
        .map(|(pair, chunk)| {
            let raw = chunk[0].trim();
            let code = raw.parse().map_err(|_| DxfError::InvalidGroupCode {
                raw: raw.to_owned(),
                line: pair * 2 + 1,
            })?;
            Ok(Group {
                code,
                value: chunk[1].trim(),
            })
        })
        .collect()
}

fn parse_entities(groups: &[Group<'_>]) -> Result<Vec<RawEntity>, DxfError> {
    let mut i = 0usize;
    let mut in_entities = false;
    let mut saw_entities_section = false;
    let mut entities = Vec::new();

    while i < groups.len() {
        let g = groups[i];
        if g.code == 0 && g.value == "SECTION" {
            i += 1;
            let Some(name) = groups.get(i) else {
                return Err(DxfError::UnexpectedEof {
                    context: "SECTION name",
                });
            };
            if name.code == 2 && name.value == "ENTITIES" {
                in_entities = true;
                saw_entities_section = true;
            }
            i += 1;
            continue;
        }

        if in_entities && g.code == 0 {
            if g.value == "ENDSEC" {
                in_entities = false;
                i += 1;
                continue;
            }

            let kind = g.value;
            i += 1;
            let start = i;
            if kind == "POLYLINE" {
                // Runs over nested VERTEX records up to and including SEQEND.
                while i < groups.len() && !(groups[i].code == 0 && groups[i].value == "SEQEND") {
                    i += 1;
                }
                let end = i;
                i += 1;
                while i < groups.len() && groups[i].code != 0 {
                    i += 1;
                }
                let body = &groups[start..end.min(groups.len())];
                if !in_paper_space(header(body)) {
                    entities.push(parse_polyline(body)?);
                }
            } else {
                while i < groups.len() && groups[i].code != 0 {
                    i += 1;
                }
                let body = &groups[start..i];
                if !in_paper_space(body) {
                    entities.push(parse_entity(kind, body)?);
                }
            }
            continue;
        }

        i += 1;
    }

    if saw_entities_section {
        Ok(entities)
    } else {
        Err(DxfError::MissingEntitiesSection)
    }
}

fn parse_entity(kind: &str, groups: &[Group<'_>]) -> Result<RawEntity, DxfError> {
    match kind {
        "LINE" => parse_line(groups),
        "LWPOLYLINE" => parse_lwpolyline(groups),
        other => Ok(RawEntity {
            kind: EntityKind::Other(other.to_owned()),
            layer: layer_of(groups),
            vertices: Vec::new(),
            closed: false,
        }),
    }
}

/// A LINE missing an endpoint keeps the endpoints it has; the extractor
/// reports it as malformed.
fn parse_line(groups: &[Group<'_>]) -> Result<RawEntity, DxfError> {
    let entity = "LINE";
    let mut vertices = Vec::with_capacity(2);
    for (cx, cy) in [(10, 20), (11, 21)] {
        if let (Some(x), Some(y)) = (
            find_f64(entity, groups, cx)?,
            find_f64(entity, groups, cy)?,
        ) {
            vertices.push(PlineVertex::line(x, y));
        }
    }
    Ok(RawEntity {
        kind: EntityKind::Line,
        layer: layer_of(groups),
        vertices,
        closed: false,
    })
}

fn parse_lwpolyline(groups: &[Group<'_>]) -> Result<RawEntity, DxfError> {
    let entity = "LWPOLYLINE";
    let mut vertices: Vec<PlineVertex> = Vec::new();
    let mut last_x: Option<f64> = None;
    for g in groups {
        match g.code {
            10 => last_x = Some(parse_f64(entity, 10, g.value)?),
            20 => {
                let Some(x) = last_x.take() else {
                    continue;
                };
                vertices.push(PlineVertex::line(x, parse_f64(entity, 20, g.value)?));
            }
            42 => {
                if let Some(last) = vertices.last_mut() {
                    last.bulge = parse_f64(entity, 42, g.value)?;
                }
            }
            _ => {}
        }
    }
    Ok(RawEntity {
        kind: EntityKind::LwPolyline,
        layer: layer_of(groups),
        vertices,
        closed: flags_of(groups) & 1 != 0,
    })
}

/// POLYLINE header followed by VERTEX records. SEQEND is not included.
fn parse_polyline(groups: &[Group<'_>]) -> Result<RawEntity, DxfError> {
    let entity = "POLYLINE";
    let head = header(groups);
    let flags = flags_of(head);
    let layer = layer_of(head);
    if flags & POLYLINE_MESH_FLAGS != 0 {
        return Ok(RawEntity {
            kind: EntityKind::Other("POLYLINE (mesh)".to_owned()),
            layer,
            vertices: Vec::new(),
            closed: false,
        });
    }

    let mut vertices = Vec::new();
    let mut rest = &groups[head.len()..];
    while let Some((marker, tail)) = rest.split_first() {
        let len = tail.iter().take_while(|g| g.code != 0).count();
        let body = &tail[..len];
        rest = &tail[len..];
        if marker.value != "VERTEX" || flags_of(body) & VERTEX_SPLINE_FRAME != 0 {
            continue;
        }
        if let (Some(x), Some(y)) = (find_f64(entity, body, 10)?, find_f64(entity, body, 20)?) {
            let bulge = find_f64(entity, body, 42)?.unwrap_or(0.0);
            vertices.push(PlineVertex::new(x, y, bulge));
        }
    }

    Ok(RawEntity {
        kind: EntityKind::Polyline,
        layer,
        vertices,
        closed: flags & 1 != 0,
    })
}

/// Groups before the first nested 0-group.
fn header<'g, 'a>(groups: &'g [Group<'a>]) -> &'g [Group<'a>] {
    let len = groups.iter().take_while(|g| g.code != 0).count();
    &groups[..len]
}

fn in_paper_space(groups: &[Group<'_>]) -> bool {
    groups.iter().any(|g| g.code == 67 && g.value == "1")
}

fn layer_of(groups: &[Group<'_>]) -> String {
    groups
        .iter()
        .find(|g| g.code == 8)
        .map_or_else(|| "0".to_owned(), |g| g.value.to_owned())
}

fn flags_of(groups: &[Group<'_>]) -> i32 {
    groups
        .iter()
        .find(|g| g.code == 70)
        .and_then(|g| g.value.parse().ok())
        .unwrap_or(0)
}

fn find_f64(entity: &'static str, groups: &[Group<'_>], code: i32) -> Result<Option<f64>, DxfError> {
    groups
        .iter()
        .find(|g| g.code == code)
        .map(|g| parse_f64(entity, code, g.value))
        .transpose()
}

fn parse_f64(entity: &'static str, code: i32, raw: &str) -> Result<f64, DxfError> {
    raw.trim().parse::<f64>().map_err(|_| DxfError::InvalidFloat {
        entity,
        code,
        raw: raw.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dxf(body: &[&str]) -> String {
        let mut lines = vec!["0", "SECTION", "2", "ENTITIES"];
        lines.extend_from_slice(body);
        lines.extend_from_slice(&["0", "ENDSEC", "0", "EOF"]);
        lines.join("\n")
    }

    #[test]
    fn reads_line_with_layer() {
        let input = dxf(&[
            "0", "LINE", "8", "WALLS", "10", "1.5", "20", "2.0", "30", "0.0", "11", "4.0", "21",
            "2.0", "31", "0.0",
        ]);
        let entities = parse_str(&input).unwrap();
        assert_eq!(
            entities,
            vec![RawEntity::line("WALLS", 1.5, 2.0, 4.0, 2.0)]
        );
    }

    #[test]
    fn reads_closed_lwpolyline_with_bulge() {
        let input = dxf(&[
            "0",
            "LWPOLYLINE",
            "8",
            "0",
            "90",
            "3",
            "70",
            "1",
            "10",
            "0.0",
            "20",
            "0.0",
            "42",
            "0.5",
            "10",
            "3.0",
            "20",
            "0.0",
            "10",
            "3.0",
            "20",
            "2.0",
        ]);
        let entities = parse_str(&input).unwrap();
        assert_eq!(entities.len(), 1);
        let e = &entities[0];
        assert_eq!(e.kind, EntityKind::LwPolyline);
        assert!(e.closed);
        assert_eq!(e.vertices.len(), 3);
        assert!((e.vertices[0].bulge - 0.5).abs() < 1e-12);
        assert!(e.vertices[1].bulge.abs() < 1e-12);
    }

    #[test]
    fn reads_polyline_vertices_until_seqend() {
        let input = dxf(&[
            "0", "POLYLINE", "8", "PLAN", "66", "1", "70", "1", "0", "VERTEX", "8", "PLAN", "10",
            "0", "20", "0", "0", "VERTEX", "8", "PLAN", "10", "5", "20", "0", "0", "VERTEX", "8",
            "PLAN", "10", "5", "20", "5", "0", "SEQEND", "8", "PLAN", "0", "LINE", "10", "9",
            "20", "9", "11", "10", "21", "9",
        ]);
        let entities = parse_str(&input).unwrap();
        assert_eq!(entities.len(), 2);
        let poly = &entities[0];
        assert_eq!(poly.kind, EntityKind::Polyline);
        assert_eq!(poly.layer, "PLAN");
        assert!(poly.closed);
        assert_eq!(poly.vertices.len(), 3);
        assert_eq!(entities[1].kind, EntityKind::Line);
        assert_eq!(entities[1].layer, "0");
    }

    #[test]
    fn other_entities_are_kept_by_name() {
        let input = dxf(&[
            "0", "CIRCLE", "8", "FIX", "10", "0", "20", "0", "40", "1", "0", "TEXT", "8", "TEXT",
            "1", "Kitchen",
        ]);
        let entities = parse_str(&input).unwrap();
        let kinds: Vec<&str> = entities.iter().map(|e| e.kind.name()).collect();
        assert_eq!(kinds, ["CIRCLE", "TEXT"]);
        assert_eq!(entities[0].layer, "FIX");
    }

    #[test]
    fn paper_space_entities_are_skipped() {
        let input = dxf(&[
            "0", "LINE", "67", "1", "10", "0", "20", "0", "11", "1", "21", "0",
        ]);
        assert!(parse_str(&input).unwrap().is_empty());
    }

    #[test]
    fn line_missing_endpoint_keeps_what_it_has() {
        let input = dxf(&["0", "LINE", "10", "0", "20", "0"]);
        let entities = parse_str(&input).unwrap();
        assert_eq!(entities[0].vertices.len(), 1);
    }

    #[test]
    fn structural_errors() {
        assert!(matches!(
            parse_str("0\nSECTION\n2\nHEADER\n0\nENDSEC\n0\nEOF"),
            Err(DxfError::MissingEntitiesSection)
        ));
        assert!(matches!(
            parse_str("0\nSECTION\n2"),
            Err(DxfError::OddNumberOfLines)
        ));
        assert!(matches!(
            parse_str("zero\nSECTION"),
            Err(DxfError::InvalidGroupCode { line: 1, .. })
        ));
        assert!(matches!(
            parse_str(&dxf(&["0", "LINE", "10", "abc", "20", "0"])),
            Err(DxfError::InvalidFloat { code: 10, .. })
        ));
        assert!(matches!(
            parse_str("AutoCAD Binary DXF\r\n"),
            Err(DxfError::Binary)
        ));
    }

    #[test]
    fn tolerates_crlf_and_indented_codes() {
        let input = "  0\r\nSECTION\r\n  2\r\nENTITIES\r\n  0\r\nLINE\r\n 10\r\n0\r\n 20\r\n0\r\n 11\r\n2\r\n 21\r\n0\r\n  0\r\nENDSEC\r\n  0\r\nEOF\r\n";
        let entities = parse_str(input).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].vertices.len(), 2);
    }
}
