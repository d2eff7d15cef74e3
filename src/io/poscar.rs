// src/io/poscar.rs

use crate::error::{FailResult, StructureError};
use crate::model::{CoordinateMode, Species, Structure};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a structure file. The handle is closed before returning on every path.
pub fn parse(path: impl AsRef<Path>) -> FailResult<Structure> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StructureError::io(path, e))?;
    let structure = from_reader(BufReader::new(file)).map_err(|e| match e {
        // attach the path to read errors surfacing from the line iterator
        StructureError::Io { source, .. } => StructureError::io(path, source),
        other => other,
    })?;
    log::debug!("Read {} atoms from {}", structure.total_atoms(), path.display());
    Ok(structure)
}

pub fn parse_str(text: &str) -> FailResult<Structure> {
    from_reader(text.as_bytes())
}

pub fn from_reader(reader: impl BufRead) -> FailResult<Structure> {
    let mut lines = Lines { inner: reader.lines(), line_no: 0 };

    // Line 1: comment
    let comment = lines.next_line()?;

    // Line 2: scale
    let scale_line = lines.next_line()?;
    let scale = parse_floats(&scale_line, 1, lines.line_no, "scale factor")?[0];

    // Lines 3-5: lattice vectors
    let mut lattice = [[0.0; 3]; 3];
    for row in &mut lattice {
        let line = lines.next_line()?;
        let v = parse_floats(&line, 3, lines.line_no, "lattice vector component")?;
        row.copy_from_slice(&v);
    }

    // Line 6: element labels, line 7: counts
    let labels_line = lines.next_line()?;
    let labels: Vec<&str> = labels_line.split_whitespace().collect();
    if labels.is_empty() {
        return Err(StructureError::MissingField { line: lines.line_no, what: "element labels" });
    }

    let counts_line = lines.next_line()?;
    let counts = counts_line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<usize>().map_err(|_| StructureError::InvalidNumber {
                line: lines.line_no,
                token: tok.to_string(),
            })
        })
        .collect::<FailResult<Vec<usize>>>()?;
    if counts.len() != labels.len() {
        return Err(StructureError::SpeciesCountMismatch { labels: labels.len(), counts: counts.len() });
    }

    let species: Vec<Species> = labels.iter().zip(&counts).map(|(l, &c)| Species::new(*l, c)).collect();

    // Optional selective dynamics, then the mode line
    let mode_line = lines.next_line()?;
    if starts_with_any(&mode_line, &['S', 's']) {
        return Err(StructureError::SelectiveDynamicsUnsupported);
    }
    let coordinate_mode = if starts_with_any(&mode_line, &['D', 'd']) {
        CoordinateMode::Direct
    } else {
        CoordinateMode::Cartesian
    };

    let total: usize = counts.iter().sum();
    let mut positions = Vec::with_capacity(total);
    for _ in 0..total {
        let line = lines.next_line()?;
        let v = parse_floats(&line, 3, lines.line_no, "coordinate")?;
        positions.push([v[0], v[1], v[2]]);
    }

    let structure = Structure {
        comment,
        scale,
        lattice,
        species,
        coordinate_mode,
        selective_dynamics: false,
        positions,
    };
    structure.check_invariants()?;
    Ok(structure)
}

/// Writes a structure file, warning when an existing file gets replaced.
pub fn write(path: impl AsRef<Path>, structure: &Structure) -> FailResult<()> {
    let path = path.as_ref();
    if path.exists() {
        log::warn!("file \"{}\" already exists and will be overwritten.", path.display());
    }

    let file = File::create(path).map_err(|e| StructureError::io(path, e))?;
    let mut w = BufWriter::new(file);
    to_writer(&mut w, structure).map_err(|e| match e {
        StructureError::Io { source, .. } => StructureError::io(path, source),
        other => other,
    })?;
    w.flush().map_err(|e| StructureError::io(path, e))?;
    Ok(())
}

pub fn to_string(structure: &Structure) -> FailResult<String> {
    let mut buf = Vec::new();
    to_writer(&mut buf, structure)?;
    // only ever contains what we formatted from `str`s and numbers
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn to_writer(mut w: impl Write, structure: &Structure) -> FailResult<()> {
    if structure.selective_dynamics {
        return Err(StructureError::SelectiveDynamicsUnsupported);
    }
    structure.check_invariants()?;
    dump(&mut w, structure).map_err(|e| StructureError::io("<writer>", e))
}

fn dump(w: &mut dyn Write, s: &Structure) -> io::Result<()> {
    writeln!(w, "{}", s.comment)?;
    writeln!(w, "{:.10}", s.scale)?;
    for v in &s.lattice {
        writeln!(w, "{:.10} {:.10} {:.10}", v[0], v[1], v[2])?;
    }

    let labels: Vec<&str> = s.species.iter().map(|sp| sp.label.as_str()).collect();
    writeln!(w, "{}", labels.join(" "))?;
    let counts: Vec<String> = s.species.iter().map(|sp| sp.count.to_string()).collect();
    writeln!(w, "{}", counts.join(" "))?;

    match s.coordinate_mode {
        CoordinateMode::Direct => writeln!(w, "Direct")?,
        CoordinateMode::Cartesian => writeln!(w, "Cartesian")?,
    }

    for p in &s.positions {
        writeln!(w, "{:.10} {:.10} {:.10}", p[0], p[1], p[2])?;
    }
    Ok(())
}

//--------------------------------------------------------------------------------------
// helpers

struct Lines<L> {
    inner: L,
    line_no: usize,
}

impl<L: Iterator<Item = io::Result<String>>> Lines<L> {
    fn next_line(&mut self) -> FailResult<String> {
        self.line_no += 1;
        match self.inner.next() {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(StructureError::io("<reader>", e)),
            None => Err(StructureError::UnexpectedEof { line: self.line_no }),
        }
    }
}

fn starts_with_any(line: &str, chars: &[char]) -> bool {
    line.trim_start().starts_with(chars)
}

/// First `n` whitespace-separated floats of a line; further tokens are ignored.
fn parse_floats(line: &str, n: usize, line_no: usize, what: &'static str) -> FailResult<Vec<f64>> {
    let tokens: Vec<&str> = line.split_whitespace().take(n).collect();
    if tokens.len() < n {
        return Err(StructureError::MissingField { line: line_no, what });
    }
    tokens
        .into_iter()
        .map(|tok| {
            tok.parse::<f64>().map_err(|_| StructureError::InvalidNumber {
                line: line_no,
                token: tok.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NACL: &str = include_str!("../../tests/data/NaCl_conv_fcc.poscar");
    const A: f64 = 5.5881264354399347;

    fn header(mode: &str) -> String {
        format!("title\n1.0\n2.0 0 0\n0 2.0 0\n0 0 2.0\nH O\n1 1\n{}\n", mode)
    }

    #[test]
    fn test_read_nacl() {
        let s = parse_str(NACL).unwrap();

        assert_eq!(s.comment, "Na4 Cl4");
        assert_eq!(s.scale, 1.0);
        assert!(s.is_direct());
        assert!(!s.selective_dynamics);
        assert_eq!(s.total_atoms(), 8);
        assert_eq!(s.species, vec![Species::new("Na", 4), Species::new("Cl", 4)]);
        assert_eq!(s.positions.len(), 8);

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { A } else { 0.0 };
                assert!((s.lattice[i][j] - expected).abs() < 1e-10);
            }
        }

        assert_eq!(s.positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(s.positions[1], [0.0, 0.5, 0.5]);
        assert_eq!(s.positions[7], [0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_mode_line() {
        let text = header("cartesian") + "0 0 0\n1 1 1\n";
        assert_eq!(parse_str(&text).unwrap().coordinate_mode, CoordinateMode::Cartesian);

        let text = header("direct") + "0 0 0\n0.5 0.5 0.5\n";
        assert_eq!(parse_str(&text).unwrap().coordinate_mode, CoordinateMode::Direct);

        // anything that doesn't start with D is Cartesian
        let text = header("Kartesisch") + "0 0 0\n1 1 1\n";
        assert_eq!(parse_str(&text).unwrap().coordinate_mode, CoordinateMode::Cartesian);
    }

    #[test]
    fn test_extra_tokens_ignored() {
        let text = header("Direct") + "0 0 0 H\n0.5 0.5 0.5 O  T T T\n";
        let s = parse_str(&text).unwrap();
        assert_eq!(s.positions[1], [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_selective_dynamics_rejected() {
        let text = header("Selective dynamics") + "Direct\n0 0 0 T T T\n0.5 0.5 0.5 F F F\n";
        assert!(matches!(parse_str(&text), Err(StructureError::SelectiveDynamicsUnsupported)));
    }

    #[test]
    fn test_not_enough_coordinates() {
        let text = header("Direct") + "0 0 0\n";
        assert!(matches!(parse_str(&text), Err(StructureError::UnexpectedEof { line: 10 })));
    }

    #[test]
    fn test_bad_numbers() {
        let text = header("Direct") + "0 0 0\n0.5 abc 0.5\n";
        match parse_str(&text) {
            Err(StructureError::InvalidNumber { line, token }) => {
                assert_eq!(line, 10);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected {:?}", other),
        }

        let text = "t\nx\n1 0 0\n0 1 0\n0 0 1\nH\n1\nD\n0 0 0\n";
        assert!(matches!(parse_str(text), Err(StructureError::InvalidNumber { line: 2, .. })));

        let text = "t\n1\n1 0 0\n0 1\n0 0 1\nH\n1\nD\n0 0 0\n";
        assert!(matches!(parse_str(text), Err(StructureError::MissingField { line: 4, .. })));

        let text = "t\n1\n1 0 0\n0 1 0\n0 0 1\nH\n-1\nD\n";
        assert!(matches!(parse_str(text), Err(StructureError::InvalidNumber { line: 7, .. })));
    }

    #[test]
    fn test_label_count_mismatch() {
        let text = "t\n1\n1 0 0\n0 1 0\n0 0 1\nH O\n1\nD\n0 0 0\n";
        assert!(matches!(
            parse_str(text),
            Err(StructureError::SpeciesCountMismatch { labels: 2, counts: 1 })
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(parse_str("only a comment\n"), Err(StructureError::UnexpectedEof { line: 2 })));
        assert!(matches!(parse_str(""), Err(StructureError::UnexpectedEof { line: 1 })));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse(dir.path().join("nonexistent_file.poscar")).unwrap_err();
        assert!(matches!(err, StructureError::Io { .. }));
    }

    #[test]
    fn test_write_format() {
        let s = parse_str(&(header("Direct") + "0 0 0\n0.5 0.25 0.125\n")).unwrap();
        let text = to_string(&s).unwrap();
        let expected = "title\n\
                        1.0000000000\n\
                        2.0000000000 0.0000000000 0.0000000000\n\
                        0.0000000000 2.0000000000 0.0000000000\n\
                        0.0000000000 0.0000000000 2.0000000000\n\
                        H O\n\
                        1 1\n\
                        Direct\n\
                        0.0000000000 0.0000000000 0.0000000000\n\
                        0.5000000000 0.2500000000 0.1250000000\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_write_refuses_inconsistent_structure() {
        let mut s = parse_str(NACL).unwrap();
        s.positions.pop();
        assert!(matches!(to_string(&s), Err(StructureError::AtomCountMismatch { .. })));

        let mut s = parse_str(NACL).unwrap();
        s.selective_dynamics = true;
        assert!(matches!(to_string(&s), Err(StructureError::SelectiveDynamicsUnsupported)));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.poscar");

        let original = parse_str(NACL).unwrap();
        write(&path, &original).unwrap();
        // overwriting is allowed
        write(&path, &original).unwrap();
        let reloaded = parse(&path).unwrap();

        assert_eq!(original.comment, reloaded.comment);
        assert_eq!(original.scale, reloaded.scale);
        assert_eq!(original.coordinate_mode, reloaded.coordinate_mode);
        assert_eq!(original.total_atoms(), reloaded.total_atoms());
        assert_eq!(original.species, reloaded.species);
        for i in 0..3 {
            for j in 0..3 {
                assert!((original.lattice[i][j] - reloaded.lattice[i][j]).abs() < 1e-9);
            }
        }
        for (p, q) in original.positions.iter().zip(&reloaded.positions) {
            for k in 0..3 {
                assert!((p[k] - q[k]).abs() < 1e-9);
            }
        }
    }
}
