/*
Host-facing entry point.

Inputs:

    a type model (TypeTable, or any TypeMetadata), optionally as a TOON document

    a synthesis config (simple-type allow-list, cycle policy), optionally as TOON

    a mapping source resolver (NameMatchResolver unless the host brings its own)

Outputs:

    the statement sequence for one mapping request, streamed, collected,
    rendered for diagnostics, or encoded as TOON for hand-off
*/
use serde::Serialize;

use crate::core::config::SynthesisConfig;
use crate::core::error::{ConfigError, SynthesisError};
use crate::core::metadata::TypeMetadata;
use crate::core::syntax::Stmt;
use crate::core::table::TypeTable;
use crate::mapping::source::{MappingSourceResolver, NameMatchResolver};
use crate::mapping::synth::{StatementStream, SynthesisRequest, Synthesizer};

pub struct MappingGenerator<M = TypeTable, R = NameMatchResolver> {
    metadata: M,
    resolver: R,
    config: SynthesisConfig,
}

impl MappingGenerator {
    pub fn new(table: TypeTable, config: SynthesisConfig) -> Self {
        Self::with_resolver(table, NameMatchResolver::new(), config)
    }

    /// Builds a generator from a TOON type model and an optional TOON config.
    pub fn from_toon(model: &str, config: Option<&str>) -> Result<Self, ConfigError> {
        let table = TypeTable::from_toon(model)?;
        let config = match config {
            Some(doc) => SynthesisConfig::from_toon(doc)?,
            None => SynthesisConfig::default(),
        };
        Ok(Self::new(table, config))
    }
}

impl<M: TypeMetadata, R: MappingSourceResolver> MappingGenerator<M, R> {
    pub fn with_resolver(metadata: M, resolver: R, config: SynthesisConfig) -> Self {
        Self { metadata, resolver, config }
    }

    pub fn metadata(&self) -> &M {
        &self.metadata
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    pub fn synthesizer(&self) -> Synthesizer<'_> {
        Synthesizer::new(&self.metadata, &self.resolver, &self.config)
    }

    /// Lazy statement stream; drain it once.
    pub fn stream(&self, request: SynthesisRequest) -> StatementStream<'_> {
        self.synthesizer().synthesize(request)
    }

    pub fn generate(&self, request: SynthesisRequest) -> Result<Vec<Stmt>, SynthesisError> {
        self.stream(request).collect_all()
    }

    /// One rendered statement per line.
    pub fn render(&self, request: SynthesisRequest) -> Result<String, SynthesisError> {
        let lines: Vec<String> = self
            .stream(request)
            .map(|stmt| stmt.map(|s| s.to_string()))
            .collect::<Result<_, _>>()?;
        Ok(lines.join("\n"))
    }
}

#[derive(Serialize)]
struct StatementDocument<'s> {
    statements: &'s [Stmt],
}

pub fn to_toon(statements: &[Stmt]) -> Result<String, ConfigError> {
    toon_format::encode_default(&StatementDocument { statements })
        .map_err(|e| ConfigError::Encode(e.to_string()))
}
