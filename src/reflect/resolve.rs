//! Resolution of node names and key paths against descriptors.

use super::{FieldDescriptor, StructDescriptor, TypeDescriptor};

/// Location of a field inside a struct, through flattened members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRoute {
    /// Rust field keys from the outer struct down to the field
    pub keys: Vec<&'static str>,
    /// The name matched exactly, case included
    pub exact: bool,
}

/// How the segments of a key path map onto field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentMode {
    /// One segment per field (`server.read_timeout`).
    Exact,
    /// Field names may span several segments joined by the separator
    /// (`SERVER_READ_TIMEOUT`).
    Joined(char),
}

/// A key path rewritten to canonical field names.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    /// Canonical segments
    pub segments: Vec<String>,
    /// Descriptor of the addressed value
    pub target: TypeDescriptor,
}

impl StructDescriptor {
    /// Locates the field a node called `name` decodes into.
    ///
    /// Exact-case matches win over case-insensitive ones; direct fields win
    /// over promoted ones.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<FieldRoute> {
        if let Some(keys) = self.route_matching(&|field| field == name) {
            return Some(FieldRoute { keys, exact: true });
        }
        self.route_matching(&|field| field.eq_ignore_ascii_case(name))
            .map(|keys| FieldRoute { keys, exact: false })
    }

    /// Finds a visible field by name, exact case first.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<FieldDescriptor> {
        let fields = self.visible_fields();
        let exact = fields.iter().position(|f| f.name == name);
        let index = exact.or_else(|| fields.iter().position(|f| f.name.eq_ignore_ascii_case(name)))?;
        fields.into_iter().nth(index)
    }

    fn route_matching(&self, matches: &dyn Fn(&str) -> bool) -> Option<Vec<&'static str>> {
        for field in &self.fields {
            if promoted_struct(field).is_none() && matches(field.name) {
                return Some(vec![field.key]);
            }
        }
        for field in &self.fields {
            if let Some(inner) = promoted_struct(field) {
                if let Some(mut keys) = inner.route_matching(matches) {
                    keys.insert(0, field.key);
                    return Some(keys);
                }
            }
        }
        None
    }
}

fn promoted_struct(field: &FieldDescriptor) -> Option<StructDescriptor> {
    if !field.is_promoted() {
        return None;
    }
    match field.descriptor() {
        TypeDescriptor::Struct(inner) => Some(inner),
        _ => None,
    }
}

/// Rewrites `segments` into canonical field names against `descriptor`.
///
/// Returns `None` if the path addresses nothing in the type. Map keys and
/// raw sections accept any segment; list items need a decimal index.
#[must_use]
pub fn resolve_path(
    descriptor: &TypeDescriptor,
    segments: &[String],
    mode: SegmentMode,
) -> Option<ResolvedPath> {
    if segments.is_empty() {
        return Some(ResolvedPath {
            segments: Vec::new(),
            target: descriptor.clone(),
        });
    }

    match descriptor {
        TypeDescriptor::Scalar(_) | TypeDescriptor::CustomCodec(_) => None,
        TypeDescriptor::Raw => Some(ResolvedPath {
            segments: segments.to_vec(),
            target: TypeDescriptor::Raw,
        }),
        TypeDescriptor::Pointer(inner) => resolve_path(inner, segments, mode),
        TypeDescriptor::Slice(element) => {
            let (first, rest) = segments.split_first()?;
            if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            resolve_path(element, rest, mode).map(|path| prepend(first.clone(), path))
        }
        TypeDescriptor::Map(value) => prefix_lengths(segments.len(), mode).find_map(|len| {
            resolve_path(value, &segments[len..], mode)
                .map(|path| prepend(join(&segments[..len], mode), path))
        }),
        TypeDescriptor::Struct(desc) => prefix_lengths(segments.len(), mode)
            .rev()
            .find_map(|len| {
                let field = desc.find_field(&join(&segments[..len], mode))?;
                resolve_path(&field.descriptor(), &segments[len..], mode)
                    .map(|path| prepend(field.name.to_string(), path))
            }),
    }
}

fn prefix_lengths(len: usize, mode: SegmentMode) -> std::ops::RangeInclusive<usize> {
    match mode {
        SegmentMode::Exact => 1..=1,
        SegmentMode::Joined(_) => 1..=len,
    }
}

fn join(segments: &[String], mode: SegmentMode) -> String {
    match mode {
        SegmentMode::Exact => segments.concat(),
        SegmentMode::Joined(separator) => segments.join(&separator.to_string()),
    }
}

fn prepend(head: String, mut path: ResolvedPath) -> ResolvedPath {
    path.segments.insert(0, head);
    path
}
