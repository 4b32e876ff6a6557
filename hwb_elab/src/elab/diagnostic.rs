use crate::elab::connect::Connectable;
use crate::elab::elaborator::Elaborator;
use hwb_util::{swrite, swriteln};

/// Error raised when the construction API itself is misused.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ElabError {
    DuplicateField { field: String },
    WhenClosedOutOfOrder,
}

/// One step of the structural path from a top-level connection statement
/// down to the failing leaf.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// A rejected connection. Carries the error kind, the structural path to the
/// failing leaf and the identities of the original top-level endpoints.
#[derive(Debug, Clone, Eq, PartialEq)]
#[must_use]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    /// Segments in innermost-first order, prepended as the recursion unwinds.
    path_rev: Vec<PathSegment>,
    sink: Connectable,
    source: Connectable,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ConnectionErrorKind {
    /// Incompatible leaf kinds, vector length mismatch or element/aggregate mismatch.
    StructuralMismatch { sink_ty: String, source_ty: String },
    /// Strict-mode record connection where the sink has a field absent from the source.
    MissingField { field: String },
    /// The don't-care wildcard was used on the sink side.
    WildcardAsSink,
    /// An analog signal outside the wildcard-broadcast case.
    MultiDriverKindUnsupported,
    SinkNotWritable,
    SourceNotReadable,
    /// A leaf's declaring conditional construct has already closed.
    ScopeEscaped,
    /// No module-hierarchy relation allows this connection in the context module.
    UnrelatedContext,
}

impl ConnectionErrorKind {
    pub fn title(&self) -> &'static str {
        match self {
            ConnectionErrorKind::StructuralMismatch { .. } => "structural type mismatch",
            ConnectionErrorKind::MissingField { .. } => "record connection is missing a sink field",
            ConnectionErrorKind::WildcardAsSink => "don't-care cannot be used as a connection sink",
            ConnectionErrorKind::MultiDriverKindUnsupported => {
                "analog signals require a multi-driver connection"
            }
            ConnectionErrorKind::SinkNotWritable => "sink signal is not writable from this module",
            ConnectionErrorKind::SourceNotReadable => "source signal is not readable from this module",
            ConnectionErrorKind::ScopeEscaped => "signal escaped the conditional scope it was declared in",
            ConnectionErrorKind::UnrelatedContext => {
                "signals are unrelated to the module the connection appears in"
            }
        }
    }
}

impl ConnectionError {
    pub(crate) fn new(kind: ConnectionErrorKind, sink: Connectable, source: Connectable) -> Self {
        ConnectionError {
            kind,
            path_rev: vec![],
            sink,
            source,
        }
    }

    pub(crate) fn push_path(mut self, segment: PathSegment) -> Self {
        self.path_rev.push(segment);
        self
    }

    /// Replace the endpoints with the original top-level sink/source,
    /// called once at the public entry point. The kind is never rewritten.
    pub(crate) fn with_endpoints(mut self, sink: Connectable, source: Connectable) -> Self {
        self.sink = sink;
        self.source = source;
        self
    }

    pub fn sink(&self) -> Connectable {
        self.sink
    }

    pub fn source(&self) -> Connectable {
        self.source
    }

    pub fn path(&self) -> impl Iterator<Item = &PathSegment> {
        self.path_rev.iter().rev()
    }

    /// The dotted/indexed path from the top-level statement to the failing leaf,
    /// e.g. `.out(1).flag`. Empty for a failure at the top level itself.
    pub fn path_string(&self) -> String {
        let mut f = String::new();
        for segment in self.path() {
            match segment {
                PathSegment::Field(name) => swrite!(&mut f, ".{}", name),
                PathSegment::Index(index) => swrite!(&mut f, "({})", index),
            }
        }
        f
    }

    pub fn to_diagnostic_string(&self, s: &Elaborator) -> String {
        let mut f = String::new();
        swrite!(&mut f, "connection error: {}", self.kind.title());
        match &self.kind {
            ConnectionErrorKind::StructuralMismatch { sink_ty, source_ty } => {
                swrite!(&mut f, ": sink has type `{sink_ty}`, source has type `{source_ty}`");
            }
            ConnectionErrorKind::MissingField { field } => {
                swrite!(&mut f, ": sink field `{field}` is absent from the source");
            }
            _ => {}
        }
        swriteln!(&mut f);

        if !self.path_rev.is_empty() {
            swriteln!(&mut f, "  at `{}{}`", endpoint_name(s, self.sink), self.path_string());
        }
        swriteln!(&mut f, "  sink: {}", describe_endpoint(s, self.sink));
        swriteln!(&mut f, "  source: {}", describe_endpoint(s, self.source));
        f
    }
}

fn endpoint_name(s: &Elaborator, endpoint: Connectable) -> String {
    match endpoint {
        Connectable::Signal(signal) => s.signals[signal].name.clone(),
        Connectable::DontCare => "dont_care".to_owned(),
    }
}

fn describe_endpoint(s: &Elaborator, endpoint: Connectable) -> String {
    let signal = match endpoint {
        Connectable::Signal(signal) => signal,
        Connectable::DontCare => return "don't-care".to_owned(),
    };
    let info = &s.signals[signal];
    match info.binding.kind.module() {
        Some(module) => format!(
            "{} `{}.{}`",
            info.binding.kind.describe(),
            s.module_path_string(module),
            info.name
        ),
        None => format!("{} `{}`", info.binding.kind.describe(), info.name),
    }
}
