//! Streaming mesh assembler with (position, texcoord) pair deduplication.
//!
//! Every distinct raw face token (`"12/7"`) becomes one output vertex with a
//! dense index assigned in first-seen order. Tokens are compared verbatim, so
//! `"1/1"` and `"01/1"` are distinct vertices even though they resolve to the
//! same attributes.
//!
//! Faces may only reference attributes declared on earlier lines.

use std::{borrow::Cow, collections::HashMap};

use meshcore::{Attribute, FormatError, FormatResult, Position, TexCoord};

use crate::{
    line::{Directive, Line, classify},
    mesh::MeshBuffers,
};

/// A unique vertex: 0-based indices into the raw attribute lists.
/// Its dense index is its position in `MeshAssembler::pairs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pair {
    position: usize,
    texcoord: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MeshAssembler {
    positions: Vec<Position>,
    texcoords: Vec<TexCoord>,
    pairs: Vec<Pair>,
    unique: HashMap<String, u32>,
    indices: Vec<u32>,
    object_name: Option<String>,
    material_library: Option<String>,
}

impl MeshAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and feed one raw line. Comments and blank lines are no-ops.
    pub fn feed_line(&mut self, line: &str) -> FormatResult<()> {
        match classify(line) {
            Line::Directive(directive) => self.feed(&directive),
            Line::Comment | Line::Blank => Ok(()),
        }
    }

    /// Apply one directive. On error the assembler is left untouched.
    pub fn feed(&mut self, directive: &Directive<'_>) -> FormatResult<()> {
        match directive.keyword() {
            "mtllib" => {
                let [name] = required::<1>(directive)?;
                replace_name(&mut self.material_library, name, "material library");
            }
            "o" => {
                let [name] = required::<1>(directive)?;
                replace_name(&mut self.object_name, name, "object name");
            }
            "v" => {
                let [x, y, z] = required::<3>(directive)?;
                let position = [parse_f32(x)?, parse_f32(y)?, parse_f32(z)?];
                self.positions.push(position);
            }
            "vt" => {
                let [u, v] = required::<2>(directive)?;
                let texcoord = [parse_f32(u)?, parse_f32(v)?];
                self.texcoords.push(texcoord);
            }
            "f" => self.feed_face(&directive.args)?,
            "usemtl" | "s" => {}
            other => log::trace!("Ignoring OBJ directive '{}'", other),
        }
        Ok(())
    }

    fn feed_face(&mut self, tokens: &[Cow<'_, str>]) -> FormatResult<()> {
        if tokens.len() != 3 {
            return Err(FormatError::UnsupportedTopology {
                found: tokens.len(),
            });
        }

        // New pairs are staged and only committed once all three tokens resolve.
        let mut staged: Vec<(&str, Pair, u32)> = Vec::new();
        let mut face = [0u32; 3];

        for (slot, token) in face.iter_mut().zip(tokens) {
            let token: &str = token;
            if let Some(&idx) = self.unique.get(token) {
                *slot = idx;
            } else if let Some(&(_, _, idx)) = staged.iter().find(|(t, _, _)| *t == token) {
                *slot = idx;
            } else {
                let pair = self.resolve(token)?;
                let idx = u32::try_from(self.pairs.len() + staged.len())
                    .map_err(|_| FormatError::TooManyVertices)?;
                staged.push((token, pair, idx));
                *slot = idx;
            }
        }

        for (token, pair, idx) in staged {
            self.unique.insert(token.to_owned(), idx);
            self.pairs.push(pair);
        }
        self.indices.extend_from_slice(&face);
        Ok(())
    }

    fn resolve(&self, token: &str) -> FormatResult<Pair> {
        let (pos, rest) = token
            .split_once('/')
            .ok_or_else(|| FormatError::MalformedFaceVertex {
                token: token.to_owned(),
            })?;
        // Anything after a second '/' (a normal index) is ignored.
        let tex = rest.split_once('/').map_or(rest, |(tex, _)| tex);

        let pos = parse_index(pos)?;
        let tex = parse_index(tex)?;

        Ok(Pair {
            position: resolve_index(pos, self.positions.len(), Attribute::Position)?,
            texcoord: resolve_index(tex, self.texcoords.len(), Attribute::TexCoord)?,
        })
    }

    /// Flattened output buffers for everything fed so far.
    ///
    /// Only vertices referenced by at least one face are emitted, each once.
    pub fn finish(&self) -> MeshBuffers {
        let (positions, texcoords) = self.flatten_pairs();
        MeshBuffers {
            positions,
            texcoords,
            indices: self.indices.clone(),
            object_name: self.object_name.clone(),
            material_library: self.material_library.clone(),
        }
    }

    pub fn into_buffers(self) -> MeshBuffers {
        let (positions, texcoords) = self.flatten_pairs();
        MeshBuffers {
            positions,
            texcoords,
            indices: self.indices,
            object_name: self.object_name,
            material_library: self.material_library,
        }
    }

    fn flatten_pairs(&self) -> (Vec<f32>, Vec<f32>) {
        let mut positions = Vec::with_capacity(self.pairs.len() * 3);
        let mut texcoords = Vec::with_capacity(self.pairs.len() * 2);
        for pair in &self.pairs {
            positions.extend_from_slice(&self.positions[pair.position]);
            texcoords.extend_from_slice(&self.texcoords[pair.texcoord]);
        }
        (positions, texcoords)
    }

    /// Number of unique vertices created so far.
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn raw_position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn raw_texcoord_count(&self) -> usize {
        self.texcoords.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn object_name(&self) -> Option<&str> {
        self.object_name.as_deref()
    }

    pub fn material_library(&self) -> Option<&str> {
        self.material_library.as_deref()
    }
}

/// First `N` arguments of `directive`; extra arguments are ignored.
fn required<'d, const N: usize>(directive: &'d Directive<'_>) -> FormatResult<[&'d str; N]> {
    if directive.args.len() < N {
        return Err(FormatError::MissingArgument {
            keyword: directive.keyword().to_owned(),
            expected: N,
            found: directive.args.len(),
        });
    }
    Ok(std::array::from_fn(|i| &*directive.args[i]))
}

// Last one wins.
fn replace_name(slot: &mut Option<String>, name: &str, what: &str) {
    if let Some(previous) = slot.replace(name.to_owned()) {
        log::debug!("Replacing {} '{}' with '{}'", what, previous, name);
    }
}

fn parse_f32(token: &str) -> FormatResult<f32> {
    token.parse::<f32>().map_err(|_| FormatError::NumericFormat {
        token: token.to_owned(),
        expected: "float",
    })
}

fn parse_index(token: &str) -> FormatResult<i64> {
    token.parse::<i64>().map_err(|_| FormatError::NumericFormat {
        token: token.to_owned(),
        expected: "index",
    })
}

/// 1-based `index` into a list of `len` items, as a 0-based offset.
fn resolve_index(index: i64, len: usize, attribute: Attribute) -> FormatResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| (1..=len).contains(&i))
        .map(|i| i - 1)
        .ok_or(FormatError::IndexOutOfRange {
            attribute,
            index,
            len,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler_with(lines: &[&str]) -> MeshAssembler {
        let mut asm = MeshAssembler::new();
        for line in lines {
            asm.feed_line(line).expect("feed line");
        }
        asm
    }

    const TRIANGLE_ATTRIBS: &[&str] = &[
        "v 0 0 0", "v 1 0 0", "v 0 1 0", "vt 0 0", "vt 1 0", "vt 0 1",
    ];

    #[test]
    fn attributes_without_faces_produce_empty_buffers() {
        let asm = assembler_with(TRIANGLE_ATTRIBS);
        assert_eq!(asm.raw_position_count(), 3);
        assert_eq!(asm.raw_texcoord_count(), 3);

        let out = asm.finish();
        assert!(out.positions.is_empty());
        assert!(out.texcoords.is_empty());
        assert!(out.indices.is_empty());
    }

    #[test]
    fn finish_on_fresh_assembler_is_empty() {
        assert_eq!(MeshAssembler::new().finish(), MeshBuffers::default());
    }

    #[test]
    fn repeated_token_reuses_index() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 1/1 2/2 3/3").unwrap();
        asm.feed_line("f 3/3 2/2 1/1").unwrap();

        assert_eq!(asm.pair_count(), 3);
        let out = asm.finish();
        assert_eq!(out.indices, vec![0, 1, 2, 2, 1, 0]);
        assert_eq!(out.positions.len(), 9);
        assert_eq!(out.texcoords.len(), 6);
    }

    #[test]
    fn dense_indices_follow_first_encounter_order() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 3/1 2/2 1/3").unwrap();
        asm.feed_line("f 1/1 3/1 2/3").unwrap();

        let out = asm.finish();
        // 3/1, 2/2, 1/3, then 1/1 and 2/3 are new; 3/1 is reused.
        assert_eq!(out.indices, vec![0, 1, 2, 3, 0, 4]);
        assert_eq!(
            out.positions,
            vec![0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0]
        );
        assert_eq!(out.texcoords, vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn tokens_are_compared_verbatim() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 1/1 01/1 1/01").unwrap();

        let out = asm.finish();
        assert_eq!(out.indices, vec![0, 1, 2]);
        assert_eq!(out.vertex(0), out.vertex(1));
        assert_eq!(out.vertex(1), out.vertex(2));
    }

    #[test]
    fn repeat_within_one_face_shares_index() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 1/1 1/1 2/2").unwrap();
        assert_eq!(asm.pair_count(), 2);
        assert_eq!(asm.finish().indices, vec![0, 0, 1]);
    }

    #[test]
    fn non_triangle_faces_are_rejected_without_side_effects() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 1/1 2/2 3/3").unwrap();
        let before = asm.finish();

        for line in ["f 1/1 2/2", "f 1/1 2/2 3/3 1/2", "f"] {
            let err = asm.feed_line(line).unwrap_err();
            assert!(matches!(err, FormatError::UnsupportedTopology { .. }), "{line}: {err}");
        }
        assert_eq!(
            asm.feed_line("f 1/1 2/2 3/3 1/2"),
            Err(FormatError::UnsupportedTopology { found: 4 })
        );
        assert_eq!(asm.finish(), before);
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);

        assert_eq!(
            asm.feed_line("f 0/1 2/2 3/3"),
            Err(FormatError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 0,
                len: 3,
            })
        );
        assert_eq!(
            asm.feed_line("f 1/1 2/2 4/3"),
            Err(FormatError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 4,
                len: 3,
            })
        );
        assert_eq!(
            asm.feed_line("f 1/1 2/-1 3/3"),
            Err(FormatError::IndexOutOfRange {
                attribute: Attribute::TexCoord,
                index: -1,
                len: 3,
            })
        );
        assert_eq!(asm.pair_count(), 0);
        assert_eq!(asm.index_count(), 0);
    }

    #[test]
    fn failed_face_does_not_commit_earlier_tokens() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        assert!(asm.feed_line("f 1/1 2/2 9/9").is_err());
        asm.feed_line("f 2/2 3/3 1/1").unwrap();
        assert_eq!(asm.finish().indices, vec![0, 1, 2]);
        assert_eq!(asm.finish().vertex(0), Some(([1.0, 0.0, 0.0], [1.0, 0.0])));
    }

    #[test]
    fn forward_references_are_rejected() {
        let mut asm = assembler_with(&["v 0 0 0", "vt 0 0"]);
        let err = asm.feed_line("f 1/1 2/1 1/1").unwrap_err();
        assert!(matches!(
            err,
            FormatError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 2,
                len: 1,
            }
        ));

        asm.feed_line("v 1 0 0").unwrap();
        asm.feed_line("f 1/1 2/1 1/1").unwrap();
        assert_eq!(asm.finish().indices, vec![0, 1, 0]);
    }

    #[test]
    fn numeric_errors() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        assert_eq!(
            asm.feed_line("v 1 abc 0"),
            Err(FormatError::NumericFormat {
                token: "abc".into(),
                expected: "float",
            })
        );
        assert_eq!(
            asm.feed_line("f 1/x 2/2 3/3"),
            Err(FormatError::NumericFormat {
                token: "x".into(),
                expected: "index",
            })
        );
        assert_eq!(
            asm.feed_line("f 1//1 2/2 3/3"),
            Err(FormatError::NumericFormat {
                token: "".into(),
                expected: "index",
            })
        );
        assert_eq!(asm.raw_position_count(), 3);
    }

    #[test]
    fn face_token_without_texcoord_is_malformed() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        assert_eq!(
            asm.feed_line("f 1 2 3"),
            Err(FormatError::MalformedFaceVertex { token: "1".into() })
        );
    }

    #[test]
    fn normal_field_is_ignored() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 1/1/1 2/2/1 3/3/1").unwrap();
        assert_eq!(asm.finish().indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_arguments_are_reported() {
        let mut asm = MeshAssembler::new();
        assert_eq!(
            asm.feed_line("v 1 2"),
            Err(FormatError::MissingArgument {
                keyword: "v".into(),
                expected: 3,
                found: 2,
            })
        );
        assert!(matches!(
            asm.feed_line("vt 0.5"),
            Err(FormatError::MissingArgument { expected: 2, .. })
        ));
        assert!(matches!(
            asm.feed_line("o"),
            Err(FormatError::MissingArgument { expected: 1, .. })
        ));
        assert_eq!(asm.raw_position_count(), 0);
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let asm = assembler_with(&["v 1 2 3 1.0", "vt 0.5 0.5 0", "o cube extra"]);
        assert_eq!(asm.raw_position_count(), 1);
        assert_eq!(asm.raw_texcoord_count(), 1);
        assert_eq!(asm.object_name(), Some("cube"));
    }

    #[test]
    fn metadata_last_value_wins() {
        let asm = assembler_with(&["mtllib a.mtl", "o first", "o second", "mtllib b.mtl"]);
        assert_eq!(asm.object_name(), Some("second"));
        assert_eq!(asm.material_library(), Some("b.mtl"));

        let out = asm.into_buffers();
        assert_eq!(out.object_name.as_deref(), Some("second"));
        assert_eq!(out.material_library.as_deref(), Some("b.mtl"));
    }

    #[test]
    fn ignored_and_unknown_directives_are_no_ops() {
        let asm = assembler_with(&[
            "usemtl Material.001",
            "s off",
            "s 1",
            "vn 0 0 1",
            "g group",
            "  #indented comment",
            "# real comment",
            "",
        ]);
        assert_eq!(asm.finish(), MeshBuffers::default());
    }

    #[test]
    fn programmatic_directives() {
        let mut asm = MeshAssembler::new();
        asm.feed(&Directive::new("v", ["0", "0", "1"])).unwrap();
        asm.feed(&Directive::new("vt", [String::from("0.25"), String::from("0.75")]))
            .unwrap();
        asm.feed(&Directive::new("f", ["1/1", "1/1", "1/1"])).unwrap();

        let out = asm.finish();
        assert_eq!(out.positions, vec![0.0, 0.0, 1.0]);
        assert_eq!(out.texcoords, vec![0.25, 0.75]);
        assert_eq!(out.indices, vec![0, 0, 0]);
    }

    #[test]
    fn finish_is_idempotent() {
        let mut asm = assembler_with(TRIANGLE_ATTRIBS);
        asm.feed_line("f 1/1 2/2 3/3").unwrap();
        assert_eq!(asm.finish(), asm.finish());
        assert_eq!(asm.finish(), asm.clone().into_buffers());
    }
}
