// resolution of the source member feeding a target member
use crate::core::error::SynthesisError;
use crate::core::metadata::TypeMetadata;
use crate::core::syntax::Expr;
use crate::core::types::TypeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSource {
    pub expression: Expr,
    pub expression_type: TypeId,
}

pub trait MappingSourceResolver {
    /// `Ok(None)` means no match; the target member is then left alone.
    fn resolve(
        &self,
        metadata: &dyn TypeMetadata,
        target_name: &str,
        source_type: TypeId,
        source: &Expr,
    ) -> Result<Option<MappingSource>, SynthesisError>;
}

/// Matches by member name: a readable property, then a `GetName()` method,
/// then a flattened path (`CustomerName` from `source.Customer.Name`).
#[derive(Debug, Clone)]
pub struct NameMatchResolver {
    case_sensitive: bool,
}

impl Default for NameMatchResolver {
    fn default() -> Self {
        Self { case_sensitive: false }
    }
}

impl NameMatchResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    fn same(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    //remainder of `name` after `prefix`, if prefix is a proper prefix
    fn strip_prefix<'n>(&self, name: &'n str, prefix: &str) -> Option<&'n str> {
        if prefix.len() >= name.len() || !name.is_char_boundary(prefix.len()) {
            return None;
        }
        let (head, rest) = name.split_at(prefix.len());
        self.same(head, prefix).then_some(rest)
    }
}

impl MappingSourceResolver for NameMatchResolver {
    fn resolve(
        &self,
        metadata: &dyn TypeMetadata,
        target_name: &str,
        source_type: TypeId,
        source: &Expr,
    ) -> Result<Option<MappingSource>, SynthesisError> {
        let properties = metadata.public_readable_properties(source_type)?;

        if let Some(p) = properties.iter().find(|p| self.same(&p.name, target_name)) {
            return Ok(Some(MappingSource {
                expression: Expr::member(source.clone(), p.name.clone()),
                expression_type: p.ty,
            }));
        }

        let getter = format!("Get{target_name}");
        let methods = metadata.parameterless_methods(source_type)?;
        if let Some(m) = methods.iter().find(|m| self.same(&m.name, &getter)) {
            return Ok(Some(MappingSource {
                expression: Expr::invoke(Expr::member(source.clone(), m.name.clone()), vec![]),
                expression_type: m.returns,
            }));
        }

        //flattening: each step consumes a non-empty prefix so this terminates
        for p in &properties {
            let Some(rest) = self.strip_prefix(target_name, &p.name) else {
                continue;
            };
            let nested = Expr::member(source.clone(), p.name.clone());
            if let Some(found) = self.resolve(metadata, rest, p.ty, &nested)? {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }
}
