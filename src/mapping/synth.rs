// recursive type-to-type mapping synthesis
use std::iter;

use tracing::{debug, trace, warn};

use crate::core::config::{CyclePolicy, SynthesisConfig};
use crate::core::error::SynthesisError;
use crate::core::metadata::TypeMetadata;
use crate::core::naming;
use crate::core::shape::{self, TypeShape};
use crate::core::syntax::{Expr, ReturnStyle, Stmt};
use crate::core::types::{Conversion, PropertyDescriptor, TypeId};
use crate::mapping::source::{MappingSource, MappingSourceResolver};
use crate::mapping::wrapper::{WrapperInfo, detect_wrapper};

pub(crate) type StmtIter<'a> = Box<dyn Iterator<Item = Result<Stmt, SynthesisError>> + 'a>;

fn emit<'a, I>(stmts: I) -> StmtIter<'a>
where
    I: IntoIterator<Item = Stmt>,
    I::IntoIter: 'a,
{
    Box::new(stmts.into_iter().map(Ok::<Stmt, SynthesisError>))
}

fn fail<'a>(err: SynthesisError) -> StmtIter<'a> {
    Box::new(iter::once(Err::<Stmt, SynthesisError>(err)))
}

fn skip<'a>() -> StmtIter<'a> {
    Box::new(iter::empty::<Result<Stmt, SynthesisError>>())
}

/// Where the mapped value goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No accessor: the value is produced with a return statement.
    Produce(ReturnStyle),
    /// Accessor to a location that does not hold an object yet.
    Assign(Expr),
    /// Accessor to a live object whose members are assigned in place.
    InPlace(Expr),
}

impl Target {
    pub fn accessor(&self) -> Option<&Expr> {
        match self {
            Target::Produce(_) => None,
            Target::Assign(acc) | Target::InPlace(acc) => Some(acc),
        }
    }

    //statement handing a finished value over; None when the target was filled in place
    fn complete(&self, value: Expr) -> Option<Stmt> {
        match self {
            Target::Produce(style) => Some(Stmt::ret(value, *style)),
            Target::Assign(acc) => Some(Stmt::assign(acc.clone(), value)),
            Target::InPlace(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub source_type: TypeId,
    pub target_type: TypeId,
    pub source: Expr,
    pub target: Target,
}

impl SynthesisRequest {
    /// Produces the mapped value with a plain `return`.
    pub fn new(source_type: TypeId, target_type: TypeId, source: Expr) -> Self {
        Self {
            source_type,
            target_type,
            source,
            target: Target::Produce(ReturnStyle::Return),
        }
    }

    pub fn returning(mut self, style: ReturnStyle) -> Self {
        self.target = Target::Produce(style);
        self
    }

    pub fn assign_to(mut self, accessor: Expr) -> Self {
        self.target = Target::Assign(accessor);
        self
    }

    pub fn in_place(mut self, accessor: Expr) -> Self {
        self.target = Target::InPlace(accessor);
        self
    }
}

/// (source, target) type pairs entered on the way down.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypePath(Vec<(TypeId, TypeId)>);

impl TypePath {
    fn contains(&self, source: TypeId, target: TypeId) -> bool {
        self.0.contains(&(source, target))
    }

    fn enter(&self, source: TypeId, target: TypeId) -> TypePath {
        let mut next = self.0.clone();
        next.push((source, target));
        TypePath(next)
    }
}

/// Identifiers already in use where a new local is about to be declared.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope(Vec<String>);

impl Scope {
    //every identifier the expression reads is taken
    pub(crate) fn reading(&self, expr: &Expr) -> Scope {
        let mut next = self.0.clone();
        next.extend(expr.identifiers());
        Scope(next)
    }

    pub(crate) fn declare(&self, name: &str) -> Scope {
        let mut next = self.0.clone();
        next.push(name.to_string());
        Scope(next)
    }

    pub(crate) fn fresh(&self, proposal: &str) -> String {
        naming::to_unique_name(proposal, &self.0)
    }
}

/// Lazy, single-pass statement sequence. Yields at most one error, after
/// which it ends.
pub struct StatementStream<'a> {
    inner: StmtIter<'a>,
    failed: bool,
}

impl<'a> StatementStream<'a> {
    fn new(inner: StmtIter<'a>) -> Self {
        Self { inner, failed: false }
    }

    pub fn collect_all(self) -> Result<Vec<Stmt>, SynthesisError> {
        self.collect()
    }
}

impl Iterator for StatementStream<'_> {
    type Item = Result<Stmt, SynthesisError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.inner.next()?;
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

#[derive(Clone, Copy)]
pub struct Synthesizer<'a> {
    pub(crate) metadata: &'a dyn TypeMetadata,
    resolver: &'a dyn MappingSourceResolver,
    pub(crate) config: &'a SynthesisConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        metadata: &'a dyn TypeMetadata,
        resolver: &'a dyn MappingSourceResolver,
        config: &'a SynthesisConfig,
    ) -> Self {
        Self { metadata, resolver, config }
    }

    pub fn synthesize(self, request: SynthesisRequest) -> StatementStream<'a> {
        let SynthesisRequest { source_type, target_type, source, target } = request;
        StatementStream::new(self.map_types(
            source_type,
            target_type,
            source,
            target,
            TypePath::default(),
            Scope::default(),
        ))
    }

    pub(crate) fn map_types(
        self,
        source_type: TypeId,
        target_type: TypeId,
        source: Expr,
        target: Target,
        path: TypePath,
        scope: Scope,
    ) -> StmtIter<'a> {
        let path = path.enter(source_type, target_type);
        let mut scope = scope.reading(&source);
        if let Some(acc) = target.accessor() {
            scope = scope.reading(acc);
        }
        match self.plan(source_type, target_type, source, target, path, scope) {
            Ok(stmts) => stmts,
            Err(e) => fail(e),
        }
    }

    /// Whole-value decisions; per-property work stays lazy.
    ///
    /// A whole-value collection mapping always assigns its result, even into
    /// an in-place target: a collection is replaced, never filled member by
    /// member.
    fn plan(
        self,
        source_type: TypeId,
        target_type: TypeId,
        source: Expr,
        target: Target,
        path: TypePath,
        scope: Scope,
    ) -> Result<StmtIter<'a>, SynthesisError> {
        if shape::is_mapping_between_collections(self.metadata, self.config, target_type, source_type)? {
            let type_name = self.metadata.display_name(target_type)?;
            debug!(target_type = type_name, "whole-value collection mapping");
            let mapping = self.map_collection(&source, source_type, target_type, &path, &scope)?;
            let stmt = mapping.map(|m| match &target {
                Target::Produce(style) => Stmt::ret(m, *style),
                Target::Assign(acc) | Target::InPlace(acc) => Stmt::assign(acc.clone(), m),
            });
            return Ok(emit(stmt));
        }

        let is_self = matches!(target.accessor(), Some(acc) if acc.is_this());
        let mut head = None;
        let mut scope = scope;
        let receiver = match &target {
            Target::InPlace(acc) => acc.clone(),
            Target::Produce(_) | Target::Assign(_) => {
                let type_name = self.metadata.display_name(target_type)?;
                if self.metadata.single_arg_constructor(target_type, source_type)?.is_some() {
                    debug!(target_type = type_name, "copy constructor");
                    let init = Expr::new_object(type_name, vec![source]);
                    return Ok(emit(target.complete(init)));
                }

                let proposal = match target.accessor() {
                    Some(acc) => naming::to_local_variable_name(&acc.to_string()),
                    None => naming::to_local_variable_name(self.metadata.type_name(target_type)?),
                };
                let local = scope.fresh(&proposal);
                scope = scope.declare(&local);
                head = Some(Stmt::declare(local.clone(), Expr::new_object(type_name, vec![])));
                Expr::ident(local)
            }
        };

        let properties = self.metadata.public_writable_properties(target_type)?;
        let tail = target.complete(receiver.clone());
        let body = properties.into_iter().flat_map(move |prop| {
            match self.map_property(prop, &receiver, source_type, &source, is_self, &path, &scope) {
                Ok(stmts) => stmts,
                Err(e) => fail(e),
            }
        });

        Ok(Box::new(emit(head).chain(body).chain(emit(tail))))
    }

    fn map_property(
        self,
        prop: PropertyDescriptor,
        receiver: &Expr,
        source_type: TypeId,
        source: &Expr,
        is_self: bool,
        path: &TypePath,
        scope: &Scope,
    ) -> Result<StmtIter<'a>, SynthesisError> {
        if !prop.is_publicly_settable && !is_self {
            trace!(property = %prop.name, "setter is not public, skipped");
            return Ok(skip());
        }

        let Some(found) = self.resolver.resolve(self.metadata, &prop.name, source_type, source)? else {
            trace!(property = %prop.name, "no mapping source, skipped");
            return Ok(skip());
        };

        let target_access = Expr::member(receiver.clone(), prop.name.clone());

        match shape::classify(self.metadata, self.config, prop.ty)? {
            TypeShape::Collection { .. } => {
                if !shape::classify(self.metadata, self.config, found.expression_type)?.is_collection() {
                    let from = self.metadata.display_name(found.expression_type)?;
                    warn!(property = %prop.name, from, "collection member has no sequence source, skipped");
                    return Ok(skip());
                }
                let mapping =
                    self.map_collection(&found.expression, found.expression_type, prop.ty, path, scope)?;
                Ok(emit(mapping.map(|m| Stmt::assign(target_access, m))))
            }
            TypeShape::Simple => {
                let value = self.convert(found, prop.ty, &prop.name)?;
                Ok(emit(Some(Stmt::assign(target_access, value))))
            }
            TypeShape::Complex => {
                if !self.may_enter(path, found.expression_type, prop.ty)? {
                    return Ok(skip());
                }
                Ok(self.map_types(
                    found.expression_type,
                    prop.ty,
                    found.expression,
                    Target::Assign(target_access),
                    path.clone(),
                    scope.clone(),
                ))
            }
        }
    }

    fn convert(self, found: MappingSource, target_type: TypeId, property: &str) -> Result<Expr, SynthesisError> {
        let MappingSource { expression, expression_type } = found;
        if expression_type == target_type {
            return Ok(expression);
        }

        match self.metadata.classify_conversion(expression_type, target_type)? {
            Conversion::Implicit => Ok(expression),
            Conversion::Explicit => Ok(Expr::cast(self.metadata.display_name(target_type)?, expression)),
            Conversion::None => {
                let wrapper = detect_wrapper(self.metadata, expression_type, target_type)?;
                if wrapper == WrapperInfo::None {
                    let from = self.metadata.display_name(expression_type)?;
                    let to = self.metadata.display_name(target_type)?;
                    warn!(property, from, to, "no conversion or unwrapping path, assigning as is");
                }
                Ok(wrapper.unwrap_access(expression))
            }
        }
    }

    /// `Ok(false)` when the pair is already being mapped higher up and the
    /// policy says to skip it.
    pub(crate) fn may_enter(self, path: &TypePath, source: TypeId, target: TypeId) -> Result<bool, SynthesisError> {
        if !path.contains(source, target) {
            return Ok(true);
        }
        let source_type = self.metadata.display_name(source)?.to_string();
        let target_type = self.metadata.display_name(target)?.to_string();
        match self.config.cycle_policy {
            CyclePolicy::Skip => {
                warn!(%source_type, %target_type, "type cycle, member skipped");
                Ok(false)
            }
            CyclePolicy::Abort => Err(SynthesisError::CyclicTypeGraph { source_type, target_type }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::table::TypeTable;
    use crate::core::types::{Accessibility, PropertyDef};
    use crate::mapping::source::NameMatchResolver;

    fn run(t: &TypeTable, cfg: &SynthesisConfig, req: SynthesisRequest) -> Vec<String> {
        let resolver = NameMatchResolver::new();
        Synthesizer::new(t, &resolver, cfg)
            .synthesize(req)
            .collect_all()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn mk_person(t: &mut TypeTable, name: &str) -> TypeId {
        let string = t.lookup("String").unwrap();
        let int = t.lookup("Int").unwrap();
        let ty = t.declare_class(name).unwrap();
        t.add_property(ty, PropertyDef::new("Name", string)).unwrap();
        t.add_property(ty, PropertyDef::new("Age", int)).unwrap();
        ty
    }

    #[test]
    fn copy_constructor_short_circuits_property_mapping() {
        let mut t = TypeTable::with_primitives();
        let person = mk_person(&mut t, "Person");
        let dto = mk_person(&mut t, "PersonDto");
        t.add_constructor(dto, vec![person]).unwrap();
        let cfg = SynthesisConfig::default();

        let out = run(&t, &cfg, SynthesisRequest::new(person, dto, Expr::ident("source")));
        assert_eq!(out, ["return new PersonDto(source);"]);

        let out = run(
            &t,
            &cfg,
            SynthesisRequest::new(person, dto, Expr::ident("source")).assign_to(Expr::ident("target")),
        );
        assert_eq!(out, ["target = new PersonDto(source);"]);
    }

    #[test]
    fn in_place_target_skips_construction_and_final_assignment() {
        let mut t = TypeTable::with_primitives();
        let person = mk_person(&mut t, "Person");
        let dto = mk_person(&mut t, "PersonDto");
        t.add_constructor(dto, vec![person]).unwrap();
        let cfg = SynthesisConfig::default();

        let req = SynthesisRequest::new(person, dto, Expr::ident("source")).in_place(Expr::ident("existing"));
        let out = run(&t, &cfg, req);
        assert_eq!(out, ["existing.Name = source.Name;", "existing.Age = source.Age;"]);
    }

    #[test]
    fn assign_target_names_local_after_accessor() {
        let mut t = TypeTable::with_primitives();
        let person = mk_person(&mut t, "Person");
        let cfg = SynthesisConfig::default();

        let target = Expr::member(Expr::ident("order"), "Buyer");
        let out = run(&t, &cfg, SynthesisRequest::new(person, person, Expr::ident("p")).assign_to(target));
        assert_eq!(
            out,
            [
                "var orderBuyer = new Person();",
                "orderBuyer.Name = p.Name;",
                "orderBuyer.Age = p.Age;",
                "order.Buyer = orderBuyer;",
            ]
        );
    }

    #[test]
    fn non_public_setter_is_assigned_only_through_self() {
        let mut t = TypeTable::with_primitives();
        let string = t.lookup("String").unwrap();
        let account = t.declare_class("Account").unwrap();
        t.add_property(account, PropertyDef::new("Owner", string)).unwrap();
        t.add_property(account, PropertyDef::new("Secret", string).with_setter(Accessibility::NonPublic))
            .unwrap();
        let cfg = SynthesisConfig::default();

        let out = run(
            &t,
            &cfg,
            SynthesisRequest::new(account, account, Expr::ident("other")).in_place(Expr::This),
        );
        assert_eq!(out, ["this.Owner = other.Owner;", "this.Secret = other.Secret;"]);

        let out = run(
            &t,
            &cfg,
            SynthesisRequest::new(account, account, Expr::ident("other")).in_place(Expr::ident("target")),
        );
        assert_eq!(out, ["target.Owner = other.Owner;"]);
    }

    #[test]
    fn nested_complex_property_builds_its_own_local() {
        let mut t = TypeTable::with_primitives();
        let string = t.lookup("String").unwrap();
        let address = t.declare_class("Address").unwrap();
        t.add_property(address, PropertyDef::new("City", string)).unwrap();
        let address_dto = t.declare_class("AddressDto").unwrap();
        t.add_property(address_dto, PropertyDef::new("City", string)).unwrap();
        let user = t.declare_class("User").unwrap();
        t.add_property(user, PropertyDef::new("Home", address)).unwrap();
        let user_dto = t.declare_class("UserDto").unwrap();
        t.add_property(user_dto, PropertyDef::new("Home", address_dto)).unwrap();
        let cfg = SynthesisConfig::default();

        let out = run(&t, &cfg, SynthesisRequest::new(user, user_dto, Expr::ident("user")));
        assert_eq!(
            out,
            [
                "var userDto = new UserDto();",
                "var userDtoHome = new AddressDto();",
                "userDtoHome.City = user.Home.City;",
                "userDto.Home = userDtoHome;",
                "return userDto;",
            ]
        );
    }

    #[test]
    fn explicit_conversion_is_cast_and_implicit_is_not() {
        let mut t = TypeTable::with_primitives();
        let int = t.lookup("Int").unwrap();
        let long = t.lookup("Long").unwrap();
        let src = t.declare_class("Src").unwrap();
        t.add_property(src, PropertyDef::new("Small", int)).unwrap();
        t.add_property(src, PropertyDef::new("Big", long)).unwrap();
        let dst = t.declare_class("Dst").unwrap();
        t.add_property(dst, PropertyDef::new("Small", long)).unwrap();
        t.add_property(dst, PropertyDef::new("Big", int)).unwrap();
        let cfg = SynthesisConfig::default();

        let out = run(&t, &cfg, SynthesisRequest::new(src, dst, Expr::ident("s")).in_place(Expr::ident("d")));
        assert_eq!(out, ["d.Small = s.Small;", "d.Big = (Int)s.Big;"]);
    }

    #[test]
    fn yield_return_style_reaches_the_final_statement() {
        let mut t = TypeTable::with_primitives();
        let person = mk_person(&mut t, "Person");
        let cfg = SynthesisConfig::default();

        let req = SynthesisRequest::new(person, person, Expr::ident("p")).returning(ReturnStyle::YieldReturn);
        let out = run(&t, &cfg, req);
        assert_eq!(out.last().unwrap(), "yield return person;");
    }

    #[test]
    fn local_name_avoids_identifiers_the_source_reads() {
        let mut t = TypeTable::with_primitives();
        let string = t.lookup("String").unwrap();
        let address = t.declare_class("Address").unwrap();
        t.add_property(address, PropertyDef::new("City", string)).unwrap();
        let cfg = SynthesisConfig::default();

        let out = run(&t, &cfg, SynthesisRequest::new(address, address, Expr::ident("address")));
        assert_eq!(
            out,
            ["var address1 = new Address();", "address1.City = address.City;", "return address1;"]
        );
    }

    #[test]
    fn in_place_collection_target_is_reassigned() {
        let mut t = TypeTable::with_primitives();
        let int = t.lookup("Int").unwrap();
        let list = t.list_of(int).unwrap();
        let cfg = SynthesisConfig::default();

        let req = SynthesisRequest::new(list, list, Expr::ident("source")).in_place(Expr::ident("existing"));
        assert_eq!(run(&t, &cfg, req), ["existing = source.ToList();"]);
    }

    fn mk_orders(t: &mut TypeTable, money: TypeId) -> (TypeId, TypeId) {
        let decimal = t.lookup("Decimal").unwrap();
        let order = t.declare_class("Order").unwrap();
        t.add_property(order, PropertyDef::new("Total", money)).unwrap();
        let dto = t.declare_class("OrderDto").unwrap();
        t.add_property(dto, PropertyDef::new("Total", decimal)).unwrap();
        (order, dto)
    }

    #[test]
    fn wrapper_property_is_unwrapped_when_no_conversion_exists() {
        let mut t = TypeTable::with_primitives();
        let decimal = t.lookup("Decimal").unwrap();
        let money = t.declare_class("Money").unwrap();
        t.add_property(money, PropertyDef::read_only("Amount", decimal)).unwrap();
        let (order, dto) = mk_orders(&mut t, money);
        let cfg = SynthesisConfig::default();

        let req = SynthesisRequest::new(order, dto, Expr::ident("s")).in_place(Expr::ident("d"));
        assert_eq!(run(&t, &cfg, req), ["d.Total = s.Total.Amount;"]);
    }

    #[test]
    fn unconvertible_source_is_assigned_as_is() {
        let mut t = TypeTable::with_primitives();
        let money = t.declare_class("Money").unwrap();
        let (order, dto) = mk_orders(&mut t, money);
        let cfg = SynthesisConfig::default();

        let req = SynthesisRequest::new(order, dto, Expr::ident("s")).in_place(Expr::ident("d"));
        assert_eq!(run(&t, &cfg, req), ["d.Total = s.Total;"]);
    }

    fn mk_tree(t: &mut TypeTable) -> (TypeId, TypeId) {
        let string = t.lookup("String").unwrap();
        let node = t.declare_class("Node").unwrap();
        t.add_property(node, PropertyDef::new("Label", string)).unwrap();
        t.add_property(node, PropertyDef::new("Parent", node)).unwrap();
        let dto = t.declare_class("NodeDto").unwrap();
        t.add_property(dto, PropertyDef::new("Label", string)).unwrap();
        t.add_property(dto, PropertyDef::new("Parent", dto)).unwrap();
        (node, dto)
    }

    #[test]
    fn cyclic_type_graph_is_skipped_by_default() {
        let mut t = TypeTable::with_primitives();
        let (node, dto) = mk_tree(&mut t);
        let cfg = SynthesisConfig::default();

        let out = run(&t, &cfg, SynthesisRequest::new(node, dto, Expr::ident("n")));
        assert_eq!(out, ["var nodeDto = new NodeDto();", "nodeDto.Label = n.Label;", "return nodeDto;"]);
    }

    #[test]
    fn cyclic_type_graph_aborts_under_abort_policy() {
        let mut t = TypeTable::with_primitives();
        let (node, dto) = mk_tree(&mut t);
        let cfg = SynthesisConfig::default().with_cycle_policy(CyclePolicy::Abort);
        let resolver = NameMatchResolver::new();

        let mut stream = Synthesizer::new(&t, &resolver, &cfg)
            .synthesize(SynthesisRequest::new(node, dto, Expr::ident("n")));
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_ok());
        match stream.next().unwrap() {
            Err(SynthesisError::CyclicTypeGraph { source_type, target_type }) => {
                assert_eq!(source_type, "Node");
                assert_eq!(target_type, "NodeDto");
            }
            other => panic!("unexpected item: {:?}", other),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn stream_is_lazy_until_pulled() {
        let mut t = TypeTable::with_primitives();
        let (node, dto) = mk_tree(&mut t);
        let cfg = SynthesisConfig::default().with_cycle_policy(CyclePolicy::Abort);
        let resolver = NameMatchResolver::new();

        // the cycle sits in the second property; taking two items never reaches it
        let first: Vec<_> = Synthesizer::new(&t, &resolver, &cfg)
            .synthesize(SynthesisRequest::new(node, dto, Expr::ident("n")))
            .take(2)
            .collect();
        assert!(first.iter().all(Result::is_ok));
    }
}
