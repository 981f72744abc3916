// collection-to-collection mapping expressions
use crate::core::error::SynthesisError;
use crate::core::naming;
use crate::core::shape::{self, CollectionKind, TypeShape};
use crate::core::syntax::{Expr, Materialization, ReturnStyle};
use crate::core::types::TypeId;
use crate::mapping::synth::{Scope, Synthesizer, Target, TypePath};

impl<'a> Synthesizer<'a> {
    /// Expression materializing `source` into the shape of `target_type`.
    ///
    /// Simple or identical element types are copied with a plain
    /// materialization; otherwise each element goes through a projection whose
    /// body is a full recursive mapping of the element types. `Ok(None)` only
    /// when the element mapping would re-enter itself and cycles are skipped.
    pub(crate) fn map_collection(
        self,
        source: &Expr,
        source_type: TypeId,
        target_type: TypeId,
        path: &TypePath,
        scope: &Scope,
    ) -> Result<Option<Expr>, SynthesisError> {
        let source_element = self.metadata.element_type(source_type)?;
        let target_element = self.metadata.element_type(target_type)?;
        let target_kind = match shape::classify(self.metadata, self.config, target_type)? {
            TypeShape::Collection { kind, .. } => kind,
            TypeShape::Simple | TypeShape::Complex => CollectionKind::List,
        };

        let elements = if shape::is_simple(self.metadata, self.config, source_element)?
            || source_element == target_element
        {
            source.clone()
        } else {
            if !self.may_enter(path, source_element, target_element)? {
                return Ok(None);
            }
            let element_name = naming::to_local_variable_name(self.metadata.type_name(source_element)?);
            let scope = scope.reading(source);
            let parameter = scope.fresh(&naming::to_singular(&element_name));
            let body = self
                .map_types(
                    source_element,
                    target_element,
                    Expr::ident(parameter.clone()),
                    Target::Produce(ReturnStyle::Return),
                    path.clone(),
                    scope.declare(&parameter),
                )
                .collect::<Result<Vec<_>, _>>()?;
            Expr::Projection { source: Box::new(source.clone()), parameter, body }
        };

        let into = match target_kind {
            CollectionKind::Array => Materialization::Array,
            //a list is assignable to every other sequence shape
            CollectionKind::List | CollectionKind::ReadOnly | CollectionKind::Enumerable => Materialization::List,
        };
        let materialized = Expr::Materialize { source: Box::new(elements), into };

        Ok(Some(match target_kind {
            CollectionKind::ReadOnly => Expr::AsReadOnly(Box::new(materialized)),
            _ => materialized,
        }))
    }
}
