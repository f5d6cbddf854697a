//! Driver: runs discovery and generation over a set of source files

use crate::descriptor::{self, ResolvedField};
use crate::discovery::{self, Declaration, DeclarationKind, Discovery, Skipped};
use crate::error::CodegenError;
use crate::schema::{self, Schema};
use crate::service::synthesize_service;
use crate::sink::UnitSink;
use crate::synth::synthesize_message;
use crate::types::KnownMessages;
use proc_macro2::TokenStream;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use wirekit_core::MessageDescriptor;

/// Runtime path used by generated units unless configured otherwise
pub const DEFAULT_RUNTIME_PATH: &str = "::wirekit";

/// Suffix of every unit name
pub const UNIT_SUFFIX: &str = ".g";

/// One generated unit, ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// `{schema_name}.g`; sinks persist it as `{name}.rs`
    pub name: String,
    pub schema_name: String,
    pub kind: DeclarationKind,
    pub source: String,
}

impl GeneratedUnit {
    fn new(declaration: &Declaration, tokens: TokenStream) -> Self {
        Self {
            name: unit_name(&declaration.name),
            schema_name: declaration.name.clone(),
            kind: declaration.kind,
            source: render(declaration, &tokens),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.rs", self.name)
    }
}

/// Name of the unit generated for `schema_name`
pub fn unit_name(schema_name: &str) -> String {
    format!("{schema_name}{UNIT_SUFFIX}")
}

/// A message whose unit could not be generated
#[derive(Debug)]
pub struct MessageFailure {
    pub schema_name: String,
    pub error: CodegenError,
}

/// Outcome of a generator run
#[derive(Debug, Default)]
pub struct Report {
    /// Names of the units handed to the sink, in emission order
    pub emitted: Vec<String>,
    /// Descriptors of the messages that were emitted
    pub descriptors: Vec<MessageDescriptor>,
    pub services: Vec<String>,
    pub failures: Vec<MessageFailure>,
    pub skipped: Vec<Skipped>,
}

impl Report {
    /// True when no message failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn descriptor(&self, schema_name: &str) -> Option<&MessageDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.schema_name() == schema_name)
    }

    /// One line per failure, `Schema: error`
    pub fn failure_lines(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("{}: {}", f.schema_name, f.error))
            .collect()
    }
}

/// A message that made it through extraction and descriptor building
struct Prepared<'a> {
    declaration: &'a Declaration,
    schema: Schema,
    fields: Vec<ResolvedField>,
    descriptor: MessageDescriptor,
}

/// Code generator
///
/// # Example
///
/// ```no_run
/// use wirekit_codegen::{Generator, MemorySink, parse_file};
/// use std::path::Path;
///
/// let file = parse_file(Path::new("src/model.rs"))?;
/// let mut sink = MemorySink::new();
/// let report = Generator::new().run(&[file], &mut sink)?;
///
/// for name in &report.emitted {
///     println!("{name}");
/// }
/// # Ok::<(), wirekit_codegen::CodegenError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    runtime: syn::Path,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self {
            runtime: syn::parse_quote!(::wirekit),
        }
    }

    /// Use a different path to the runtime crate, e.g. `::wirekit_core`
    pub fn with_runtime_path(runtime_path: &str) -> Result<Self, CodegenError> {
        let runtime = syn::parse_str::<syn::Path>(runtime_path)
            .map_err(|_| CodegenError::InvalidRuntimePath(runtime_path.to_string()))?;
        Ok(Self { runtime })
    }

    pub fn runtime_path(&self) -> &syn::Path {
        &self.runtime
    }

    /// Discover declarations across all files, in order
    pub fn discover(&self, files: &[syn::File]) -> Discovery {
        let mut discovery = Discovery::default();
        for file in files {
            discovery.extend(discovery::discover(file));
        }
        discovery
    }

    /// Generate a unit for every accepted declaration and hand it to `sink`.
    ///
    /// Message-scoped errors are collected in [`Report::failures`] and the
    /// run continues; sink errors abort it.
    pub fn run(
        &self,
        files: &[syn::File],
        sink: &mut dyn UnitSink,
    ) -> Result<Report, CodegenError> {
        let discovery = self.discover(files);
        let mut report = Report {
            skipped: discovery.skipped.clone(),
            ..Report::default()
        };

        let (prepared, failures) = prepare_messages(&discovery.messages);
        report.failures = failures;

        for message in prepared {
            let tokens = synthesize_message(
                message.declaration,
                &message.schema,
                &message.fields,
                &message.descriptor,
                &self.runtime,
            );
            match tokens {
                Ok(tokens) => {
                    let unit = GeneratedUnit::new(message.declaration, tokens);
                    let name = unit.name.clone();
                    debug!(unit = %name, fields = message.fields.len(), "emitting message unit");
                    sink.accept(unit)?;
                    report.emitted.push(name);
                    report.descriptors.push(message.descriptor);
                }
                Err(error) => report.failures.push(MessageFailure {
                    schema_name: message.declaration.name.clone(),
                    error,
                }),
            }
        }

        for service in &discovery.services {
            let unit = GeneratedUnit::new(service, synthesize_service(service, &self.runtime));
            let name = unit.name.clone();
            debug!(unit = %name, "emitting service unit");
            sink.accept(unit)?;
            report.emitted.push(name);
            report.services.push(service.name.clone());
        }

        for failure in &report.failures {
            warn!(message = %failure.schema_name, error = %failure.error, "message skipped");
        }
        info!(
            emitted = report.emitted.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "code generation finished"
        );

        Ok(report)
    }
}

/// Extract and resolve every message.
///
/// A message that fails is removed from the known set and the remaining ones
/// are resolved again, so messages that embed it fail too instead of
/// referring to a type without a `Message` impl.
fn prepare_messages(messages: &[Declaration]) -> (Vec<Prepared<'_>>, Vec<MessageFailure>) {
    let mut known = KnownMessages::new();
    for message in messages {
        known.insert(&message.module_path, message.ident.to_string(), &message.name);
    }

    let mut failed: BTreeMap<usize, CodegenError> = BTreeMap::new();
    loop {
        let mut prepared = Vec::new();
        let mut newly_failed = Vec::new();

        for (index, declaration) in messages.iter().enumerate() {
            if failed.contains_key(&index) {
                continue;
            }
            match prepare(declaration, &known) {
                Ok(message) => prepared.push(message),
                Err(error) => newly_failed.push((index, error)),
            }
        }

        if newly_failed.is_empty() {
            let failures = failed
                .into_iter()
                .map(|(index, error)| MessageFailure {
                    schema_name: messages[index].name.clone(),
                    error,
                })
                .collect();
            return (prepared, failures);
        }

        for (index, error) in newly_failed {
            let message = &messages[index];
            known.remove(&message.module_path, &message.ident.to_string(), &message.name);
            failed.insert(index, error);
        }
    }
}

fn prepare<'a>(
    declaration: &'a Declaration,
    known: &KnownMessages,
) -> Result<Prepared<'a>, CodegenError> {
    let schema = schema::extract(declaration)?;
    let fields = descriptor::resolve(&schema, known)?;
    let descriptor = descriptor::build(&declaration.name, &fields)?;
    Ok(Prepared {
        declaration,
        schema,
        fields,
        descriptor,
    })
}

fn render(declaration: &Declaration, tokens: &TokenStream) -> String {
    format!(
        "// @generated by wirekit-codegen for {} `{}`. Do not edit.\n\n{}\n",
        declaration.kind,
        declaration.qualified_ident(),
        tokens
    )
}

/// Read and parse one source file
pub fn parse_file(path: &Path) -> Result<syn::File, CodegenError> {
    let source = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
    syn::parse_file(&source).map_err(|source| CodegenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
