//! The connection resolver.
//!
//! Given a sink signal, a source (a signal or the don't-care wildcard) and the
//! module whose body the connection statement appears in, this decides whether
//! the assignment is legal, recursing structurally through aggregates, and
//! either emits the per-leaf low-level operations or fails with a
//! path-annotated [ConnectionError]. A failing statement emits nothing:
//! operations pushed before the failure are rolled back.

use crate::elab::binding::Direction;
use crate::elab::diagnostic::{ConnectionError, ConnectionErrorKind, PathSegment};
use crate::elab::elaborator::Elaborator;
use crate::elab::ir::IrOp;
use crate::elab::module::{Module, ModuleRelation};
use crate::elab::signal::{Signal, SignalShape};
use crate::throw;
use unwrap_match::unwrap_match;

/// Either endpoint of a connection statement. The don't-care wildcard is only
/// ever legal on the source side, where it broadcasts structurally.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Connectable {
    Signal(Signal),
    DontCare,
}

impl From<Signal> for Connectable {
    fn from(signal: Signal) -> Self {
        Connectable::Signal(signal)
    }
}

/// Per-call configuration supplied by the embedding elaboration pass.
/// All leniencies are off by default.
#[derive(Debug, Copy, Clone, Default)]
pub struct ConnectOptions {
    /// Fail a record connection when a sink field is absent from the source,
    /// instead of silently skipping that field.
    pub strict_field_matching: bool,
    /// Permit the input-sink/output-source case by connecting source as sink
    /// and sink as source (the emitted operation has reversed references).
    pub allow_swapped_direction: bool,
    /// Treat internal nodes of child modules as readable sources.
    pub assume_internal_readable: bool,
}

impl Elaborator {
    /// Resolves one user-level connection statement appearing in the body of
    /// `context`. On success the corresponding leaf operations have been
    /// appended to the operation log, on failure nothing was emitted.
    pub fn connect(
        &mut self,
        sink: impl Into<Connectable>,
        source: impl Into<Connectable>,
        context: Module,
        options: &ConnectOptions,
    ) -> Result<(), ConnectionError> {
        let sink = sink.into();
        let source = source.into();

        let sink_signal = match sink {
            Connectable::Signal(signal) => signal,
            Connectable::DontCare => throw!(ConnectionError::new(
                ConnectionErrorKind::WildcardAsSink,
                sink,
                source
            )),
        };

        let checkpoint = self.ops.len();
        self.connect_node(sink_signal, source, context, options).map_err(|e| {
            self.ops.truncate(checkpoint);
            e.with_endpoints(sink, source)
        })
    }

    fn connect_node(
        &mut self,
        sink: Signal,
        source: Connectable,
        context: Module,
        options: &ConnectOptions,
    ) -> Result<(), ConnectionError> {
        let source_signal = match source {
            Connectable::DontCare => {
                self.invalidate_tree(sink);
                return Ok(());
            }
            Connectable::Signal(signal) => signal,
        };

        // TODO avoid cloning the shapes here
        let sink_shape = self.signals[sink].shape.clone();
        let source_shape = self.signals[source_signal].shape.clone();

        match (sink_shape, source_shape) {
            (SignalShape::Element { .. }, SignalShape::Element { .. }) => {
                self.connect_element(sink, source_signal, context, options)
            }
            (SignalShape::Vector(sink_elements), SignalShape::Vector(source_elements)) => {
                if sink_elements.len() != source_elements.len() {
                    throw!(self.structural_mismatch(sink, source_signal));
                }
                for (index, (sink_element, source_element)) in
                    sink_elements.into_iter().zip(source_elements).enumerate()
                {
                    self.connect_node(sink_element, source_element.into(), context, options)
                        .map_err(|e| e.push_path(PathSegment::Index(index)))?;
                }
                Ok(())
            }
            (SignalShape::Record(sink_fields), SignalShape::Record(source_fields)) => {
                // sink field order decides both recursion and emission order
                for (field, sink_child) in sink_fields {
                    match source_fields.get(&field) {
                        Some(&source_child) => {
                            self.connect_node(sink_child, source_child.into(), context, options)
                                .map_err(|e| e.push_path(PathSegment::Field(field)))?;
                        }
                        None => {
                            if options.strict_field_matching {
                                throw!(ConnectionError::new(
                                    ConnectionErrorKind::MissingField { field },
                                    sink.into(),
                                    source_signal.into(),
                                ));
                            }
                            // lenient mode: absent source fields are a per-field no-op
                        }
                    }
                }
                Ok(())
            }
            _ => Err(self.structural_mismatch(sink, source_signal)),
        }
    }

    /// Terminal don't-care case: every leaf under the sink is marked
    /// intentionally undefined, no value flows and no directional check applies.
    fn invalidate_tree(&mut self, sink: Signal) {
        // TODO avoid cloning the shape here
        match self.signals[sink].shape.clone() {
            SignalShape::Element { ir, .. } => self.ops.push(IrOp::Invalidate { target: ir }),
            SignalShape::Vector(children) => {
                for child in children {
                    self.invalidate_tree(child);
                }
            }
            SignalShape::Record(children) => {
                for (_, child) in children {
                    self.invalidate_tree(child);
                }
            }
        }
    }

    fn connect_element(
        &mut self,
        sink: Signal,
        source: Signal,
        context: Module,
        options: &ConnectOptions,
    ) -> Result<(), ConnectionError> {
        let err = |kind: ConnectionErrorKind| ConnectionError::new(kind, sink.into(), source.into());

        let (sink_kind, sink_ref) = unwrap_match!(
            &self.signals[sink].shape,
            SignalShape::Element { kind, ir } => (kind.clone(), *ir)
        );
        let (source_kind, source_ref) = unwrap_match!(
            &self.signals[source].shape,
            SignalShape::Element { kind, ir } => (kind.clone(), *ir)
        );

        // analog signals need the separate attach-style multi-driver form
        if sink_kind.is_analog() || source_kind.is_analog() {
            throw!(err(ConnectionErrorKind::MultiDriverKindUnsupported));
        }
        if !sink_kind.connectable_from(&source_kind) {
            throw!(self.structural_mismatch(sink, source));
        }

        // scope-escaped references are rejected before any directional check
        if !self.is_conditionally_visible(sink) || !self.is_conditionally_visible(source) {
            throw!(err(ConnectionErrorKind::ScopeEscaped));
        }

        let sink_binding = self.signals[sink].binding;
        let source_binding = self.signals[source].binding;

        let sink_module = match sink_binding.kind.module() {
            Some(module) => module,
            // a literal can never be driven
            None => throw!(err(ConnectionErrorKind::SinkNotWritable)),
        };
        let rel_sink = self.relation_to(context, sink_module);
        let sink_dir = sink_binding.kind.direction();

        // a literal source reads as an always-readable internal value of the context module
        let source_dir = source_binding.kind.direction();
        let rel_source = match source_binding.kind.module() {
            Some(module) => self.relation_to(context, module),
            None => ModuleRelation::Current,
        };
        match (rel_sink, rel_source) {
            // both endpoints declared in the context module itself
            (ModuleRelation::Current, ModuleRelation::Current) => match sink_dir {
                Direction::Output | Direction::Internal => {
                    self.ops.push(IrOp::Connect {
                        target: sink_ref,
                        source: source_ref,
                    });
                    Ok(())
                }
                Direction::Input => Err(err(ConnectionErrorKind::SinkNotWritable)),
            },

            // sink in the context module, source in a direct child
            (ModuleRelation::Current, ModuleRelation::ChildOfContext) => match (sink_dir, source_dir) {
                (Direction::Internal | Direction::Output, Direction::Output | Direction::Input) => {
                    self.ops.push(IrOp::Connect {
                        target: sink_ref,
                        source: source_ref,
                    });
                    Ok(())
                }
                (_, Direction::Internal) => {
                    if options.assume_internal_readable {
                        self.ops.push(IrOp::Connect {
                            target: sink_ref,
                            source: source_ref,
                        });
                        Ok(())
                    } else {
                        Err(err(ConnectionErrorKind::SourceNotReadable))
                    }
                }
                (Direction::Input, Direction::Output) => {
                    if options.allow_swapped_direction {
                        // legacy leniency: source becomes the sink, references reversed
                        self.ops.push(IrOp::Connect {
                            target: source_ref,
                            source: sink_ref,
                        });
                        Ok(())
                    } else {
                        Err(err(ConnectionErrorKind::SourceNotReadable))
                    }
                }
                (Direction::Input, Direction::Input) => Err(err(ConnectionErrorKind::SinkNotWritable)),
            },

            // sink in a direct child, source in the context module
            (ModuleRelation::ChildOfContext, ModuleRelation::Current) => match sink_dir {
                Direction::Input => {
                    self.ops.push(IrOp::Connect {
                        target: sink_ref,
                        source: source_ref,
                    });
                    Ok(())
                }
                Direction::Output | Direction::Internal => Err(err(ConnectionErrorKind::SinkNotWritable)),
            },

            // both endpoints in direct children of the context module
            (ModuleRelation::ChildOfContext, ModuleRelation::ChildOfContext) => {
                match (sink_dir, source_dir) {
                    (Direction::Input, Direction::Input | Direction::Output) => {
                        self.ops.push(IrOp::Connect {
                            target: sink_ref,
                            source: source_ref,
                        });
                        Ok(())
                    }
                    (Direction::Input, Direction::Internal) => {
                        if options.assume_internal_readable {
                            self.ops.push(IrOp::Connect {
                                target: sink_ref,
                                source: source_ref,
                            });
                            Ok(())
                        } else {
                            Err(err(ConnectionErrorKind::SourceNotReadable))
                        }
                    }
                    (Direction::Output | Direction::Internal, _) => {
                        Err(err(ConnectionErrorKind::SinkNotWritable))
                    }
                }
            }

            _ => Err(err(ConnectionErrorKind::UnrelatedContext)),
        }
    }

    fn structural_mismatch(&self, sink: Signal, source: Signal) -> ConnectionError {
        ConnectionError::new(
            ConnectionErrorKind::StructuralMismatch {
                sink_ty: self.signal_type(sink).to_diagnostic_string(self),
                source_ty: self.signal_type(source).to_diagnostic_string(self),
            },
            sink.into(),
            source.into(),
        )
    }
}
