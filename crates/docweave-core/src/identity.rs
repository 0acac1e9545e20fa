//! Declaration identities.
//!
//! An [`Identity`] names what a declaration or a type usage refers to. It is
//! either a [`PlainIdentity`] (`Foo`) or a [`GenericIdentity`] (`List<Foo>`),
//! whose name, hash and resolution slot all delegate to its main type.
//!
//! Every plain identity carries a write-once resolution slot. The slot stays
//! empty while the model is being built and is filled by
//! [`ReferenceTable::finalize`](crate::reference::ReferenceTable::finalize).

use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use sha2::{Digest, Sha256};

use crate::element::ElementId;

/// Deterministic short identifier derived from a qualified name.
///
/// Rendered as eight upper-case hexadecimal digits. The same text always
/// produces the same hash, in every run and on every platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StableHash([u8; 4]);

impl StableHash {
    /// Hashes `text` (the first four bytes of its SHA-256 digest).
    pub fn of(text: &str) -> Self {
        let digest = Sha256::digest(text.as_bytes());
        Self([digest[0], digest[1], digest[2], digest[3]])
    }
}

impl fmt::Display for StableHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// A single, non-parameterized name.
#[derive(Debug, Clone)]
pub struct PlainIdentity {
    name: String,
    qualified_name: Option<String>,
    hash: StableHash,
    target: Arc<OnceLock<ElementId>>,
}

impl PlainIdentity {
    /// Creates an unresolved identity.
    ///
    /// The hash is computed from `qualified_name` when present, otherwise
    /// from `name`.
    pub fn new(name: impl Into<String>, qualified_name: Option<String>) -> Self {
        let name = name.into();
        let hash = StableHash::of(qualified_name.as_deref().unwrap_or(&name));
        Self {
            name,
            qualified_name,
            hash,
            target: Arc::new(OnceLock::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.qualified_name.as_deref()
    }

    pub fn hash(&self) -> StableHash {
        self.hash
    }

    /// The element this identity was linked to, if resolution found one.
    pub fn resolved_target(&self) -> Option<ElementId> {
        self.target.get().copied()
    }

    /// Shared handle to the resolution slot. Clones of an identity share it.
    pub(crate) fn slot(&self) -> Arc<OnceLock<ElementId>> {
        Arc::clone(&self.target)
    }
}

/// A name parameterized by an ordered list of type arguments or parameters.
#[derive(Debug, Clone)]
pub struct GenericIdentity {
    main: PlainIdentity,
    sub_types: Vec<Identity>,
}

impl GenericIdentity {
    pub fn new(main: PlainIdentity, sub_types: Vec<Identity>) -> Self {
        Self { main, sub_types }
    }

    pub fn main(&self) -> &PlainIdentity {
        &self.main
    }

    pub fn sub_types(&self) -> &[Identity] {
        &self.sub_types
    }

    pub fn arity(&self) -> usize {
        self.sub_types.len()
    }
}

/// What a declaration or usage denotes.
#[derive(Debug, Clone)]
pub enum Identity {
    Plain(PlainIdentity),
    Generic(GenericIdentity),
}

impl Identity {
    /// Shorthand for a [`PlainIdentity`].
    pub fn plain(name: impl Into<String>, qualified_name: Option<String>) -> Self {
        Self::Plain(PlainIdentity::new(name, qualified_name))
    }

    /// Shorthand for a [`GenericIdentity`] with a plain main type.
    pub fn generic(main: PlainIdentity, sub_types: Vec<Identity>) -> Self {
        Self::Generic(GenericIdentity::new(main, sub_types))
    }

    /// The plain identity carrying name, hash and resolution slot.
    pub fn main(&self) -> &PlainIdentity {
        match self {
            Self::Plain(plain) => plain,
            Self::Generic(generic) => &generic.main,
        }
    }

    pub fn name(&self) -> &str {
        self.main().name()
    }

    pub fn qualified_name(&self) -> Option<&str> {
        self.main().qualified_name()
    }

    pub fn hash(&self) -> StableHash {
        self.main().hash()
    }

    pub fn resolved_target(&self) -> Option<ElementId> {
        self.main().resolved_target()
    }

    /// Type arguments or parameters; empty for plain identities.
    pub fn sub_types(&self) -> &[Identity] {
        match self {
            Self::Plain(_) => &[],
            Self::Generic(generic) => &generic.sub_types,
        }
    }

    pub fn arity(&self) -> usize {
        self.sub_types().len()
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic(_))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(plain) => f.write_str(plain.name()),
            Self::Generic(generic) => {
                write!(f, "{}<", generic.main.name())?;
                for (i, sub) in generic.sub_types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{sub}")?;
                }
                f.write_str(">")
            }
        }
    }
}

/// Normalizes a display name reported by the front end into the key used
/// for reference lookups.
///
/// Every dotted segment keeps its name; type arguments collapse to their
/// count, so `A.Outer<T>.Inner` becomes `A.Outer<1>.Inner`. The last segment
/// takes `arity` instead, so `A.List<T>` with one type parameter becomes
/// `A.List<1>`. Array and pointer suffixes are dropped, and a trailing
/// parameter list is kept with its types separated by `", "`.
pub fn normalize_full_name(full_name: &str, arity: usize) -> String {
    let (path, parameters) = match find_top_level(full_name, |c| c == '(') {
        Some(open) => {
            let close = full_name.rfind(')').filter(|&close| close > open).unwrap_or(full_name.len());
            (&full_name[..open], Some(&full_name[open + 1..close]))
        }
        None => (full_name, None),
    };
    let path = match find_top_level(path, |c| c == '[' || c == '*') {
        Some(end) => &path[..end],
        None => path,
    };

    let segments = split_top_level(path, '.');
    let last = segments.len().saturating_sub(1);
    let mut key = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let (base, arguments) = generic_segment(segment);
            let segment_arity = if i == last { arity } else { arguments };
            if segment_arity > 0 {
                format!("{base}<{segment_arity}>")
            } else {
                base.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".");

    if let Some(parameters) = parameters {
        let parameters: Vec<_> = split_top_level(parameters, ',')
            .into_iter()
            .map(str::trim)
            .filter(|parameter| !parameter.is_empty())
            .collect();
        key.push_str(&format!("({})", parameters.join(", ")));
    }
    key
}

/// Name of a path segment and the number of its type arguments.
fn generic_segment(segment: &str) -> (&str, usize) {
    match segment.find('<') {
        Some(open) => {
            let close = segment.rfind('>').filter(|&close| close > open).unwrap_or(segment.len());
            let arguments = split_top_level(&segment[open + 1..close], ',').len();
            (segment[..open].trim(), arguments)
        }
        None => (segment.trim(), 0),
    }
}

/// Byte offset of the first character outside angle brackets matching
/// `pred`.
fn find_top_level(text: &str, pred: impl Fn(char) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 && pred(c) => return Some(i),
            _ => {}
        }
    }
    None
}

fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(i) = find_top_level(rest, |c| c == separator) {
        parts.push(&rest[..i]);
        rest = &rest[i + separator.len_utf8()..];
    }
    parts.push(rest);
    parts
}
